//! Records Table Widget
//! Filtered companies with per-column display formatting.

use crate::data::PreparedRecord;
use egui::{Color32, RichText, ScrollArea};

const TABLE_HEIGHT: f32 = 420.0;
const OUT_OF_RANGE: Color32 = Color32::from_rgb(220, 53, 69);

/// How a column's values are displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellFormat {
    Text,
    /// Whole number expected within `min..=max`.
    Integer { min: i32, max: i32 },
    /// Fixed precision, expected within `min..=max`.
    Decimal { precision: usize, min: f64, max: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct DisplayColumn {
    pub header: &'static str,
    pub help: &'static str,
    pub format: CellFormat,
}

pub const TABLE_COLUMNS: [DisplayColumn; 6] = [
    DisplayColumn {
        header: "Company",
        help: "The name of the company",
        format: CellFormat::Text,
    },
    DisplayColumn {
        header: "Vertical",
        help: "The industry vertical of the company",
        format: CellFormat::Text,
    },
    DisplayColumn {
        header: "Country",
        help: "The country where the company is based",
        format: CellFormat::Text,
    },
    DisplayColumn {
        header: "$1B Year",
        help: "The year the company was valued at $1B",
        format: CellFormat::Integer { min: 2000, max: 2024 },
    },
    DisplayColumn {
        header: "Valuation ($B)",
        help: "The valuation of the company in $B",
        format: CellFormat::Decimal { precision: 1, min: 1.0, max: 1000.0 },
    },
    DisplayColumn {
        header: "Total Funding ($B)",
        help: "The total funding raised by the company in $B",
        format: CellFormat::Decimal { precision: 2, min: 1.0, max: 1000.0 },
    },
];

/// A formatted cell and whether its value falls outside the column range.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub out_of_range: bool,
}

pub enum CellValue<'a> {
    Text(&'a str),
    Year(Option<i32>),
    Amount(f64),
}

impl CellFormat {
    pub fn format(&self, value: CellValue<'_>) -> Cell {
        match (self, value) {
            (CellFormat::Integer { min, max }, CellValue::Year(year)) => Cell {
                text: year.map(|y| y.to_string()).unwrap_or_default(),
                out_of_range: year.is_some_and(|y| y < *min || y > *max),
            },
            (CellFormat::Decimal { precision, min, max }, CellValue::Amount(v)) => Cell {
                text: format!("{:.*}", *precision, v),
                out_of_range: v < *min || v > *max,
            },
            (_, CellValue::Text(s)) => Cell {
                text: s.to_string(),
                out_of_range: false,
            },
            (_, CellValue::Year(year)) => Cell {
                text: year.map(|y| y.to_string()).unwrap_or_default(),
                out_of_range: false,
            },
            (_, CellValue::Amount(v)) => Cell {
                text: v.to_string(),
                out_of_range: false,
            },
        }
    }
}

/// Cells of one record, in [`TABLE_COLUMNS`] order.
pub fn record_cells(record: &PreparedRecord) -> Vec<Cell> {
    let values = [
        CellValue::Text(&record.company),
        CellValue::Text(&record.vertical),
        CellValue::Text(&record.country),
        CellValue::Year(record.unicorn_year),
        CellValue::Amount(record.valuation_usd),
        CellValue::Amount(record.raised_usd),
    ];
    TABLE_COLUMNS
        .iter()
        .zip(values)
        .map(|(column, value)| column.format.format(value))
        .collect()
}

/// Draw the records table
pub fn draw_records_table(ui: &mut egui::Ui, records: &[PreparedRecord]) {
    ui.label(RichText::new(format!("{} companies", records.len())).size(12.0));

    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ScrollArea::both()
                .id_salt("records_table_scroll")
                .max_height(TABLE_HEIGHT)
                .show(ui, |ui| {
                    egui::Grid::new("records_table")
                        .striped(true)
                        .min_col_width(70.0)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            for column in &TABLE_COLUMNS {
                                ui.label(RichText::new(column.header).strong().size(12.0))
                                    .on_hover_text(column.help);
                            }
                            ui.end_row();

                            let default_text_color = ui.visuals().text_color();
                            for record in records {
                                for cell in record_cells(record) {
                                    let color = if cell.out_of_range {
                                        OUT_OF_RANGE
                                    } else {
                                        default_text_color
                                    };
                                    ui.label(RichText::new(cell.text).size(11.0).color(color));
                                }
                                ui.end_row();
                            }
                        });
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PreparedRecord {
        PreparedRecord {
            company: "Northvolt".into(),
            country: "Sweden".into(),
            vertical: "Cleantech".into(),
            status: "Active".into(),
            raised_usd: 0.456,
            valuation_usd: 11.76,
            unicorn_year: Some(2019),
        }
    }

    #[test]
    fn test_cell_formats() {
        let cells = record_cells(&record());
        let texts: Vec<&str> = cells.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Northvolt", "Cleantech", "Sweden", "2019", "11.8", "0.46"]);
    }

    #[test]
    fn test_out_of_range_flags() {
        let cells = record_cells(&record());
        // Funding below the 1-1000 display range.
        assert!(cells[5].out_of_range);
        assert!(!cells[4].out_of_range);
        assert!(!cells[3].out_of_range);
    }

    #[test]
    fn test_missing_year_is_blank() {
        let mut r = record();
        r.unicorn_year = None;
        let cells = record_cells(&r);
        assert_eq!(cells[3], Cell { text: String::new(), out_of_range: false });
    }
}
