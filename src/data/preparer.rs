//! Dataset Preparer
//! Loads the unicorn CSV with Polars, keeps European Active/Exited companies
//! and derives the numeric amount and year columns.

use super::currency::billions_or_zero;
use super::reference::{ALLOWED_STATUSES, COUNTRY_RENAME, EUROPEAN_COUNTRIES};
use super::table::{
    COUNTRY, RAISED_USD, REQUIRED_COLUMNS, STATUS, UNICORN_MONTH, UNICORN_YEAR, VALUATION_USD,
};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV is missing required column '{0}'")]
    MissingColumn(String),
}

/// Read and clean the dataset at `path`.
///
/// Every column is read as text so the currency cells survive untouched until
/// the rule engine sees them.
pub fn prepare_dataset(path: &Path) -> Result<DataFrame, ParseError> {
    if !path.is_file() {
        return Err(ParseError::NotFound(path.to_path_buf()));
    }

    let mut lazy = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?;

    let schema = lazy.collect_schema()?;
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|name| schema.get(name).is_none())
    {
        return Err(ParseError::MissingColumn(missing.to_string()));
    }

    let countries = Series::new("countries".into(), EUROPEAN_COUNTRIES);
    let statuses = Series::new("statuses".into(), ALLOWED_STATUSES);

    let mut df = lazy
        .filter(col(COUNTRY).is_in(lit(countries)))
        .with_column(
            when(col(COUNTRY).eq(lit(COUNTRY_RENAME.0)))
                .then(lit(COUNTRY_RENAME.1))
                .otherwise(col(COUNTRY))
                .alias(COUNTRY),
        )
        .filter(col(STATUS).is_in(lit(statuses)))
        .collect()?;

    for name in [RAISED_USD, VALUATION_USD] {
        let amounts = normalize_amounts(&df, name)?;
        df.with_column(amounts)?;
    }
    let years = derive_years(&df)?;
    df.with_column(years)?;

    log::info!("Prepared {} unicorn rows from {}", df.height(), path.display());
    Ok(df)
}

/// Replace a currency text column with its value in billions of dollars.
fn normalize_amounts(df: &DataFrame, name: &str) -> PolarsResult<Column> {
    let raw = df.column(name)?.str()?;
    let mut coerced = 0usize;
    let values: Vec<f64> = raw
        .into_iter()
        .map(|cell| {
            let (value, fell_back) = billions_or_zero(cell);
            coerced += usize::from(fell_back);
            value
        })
        .collect();

    if coerced > 0 {
        log::warn!("{coerced} malformed '{name}' values treated as 0");
    }
    Ok(Column::new(name.into(), values))
}

fn derive_years(df: &DataFrame) -> PolarsResult<Column> {
    let months = df.column(UNICORN_MONTH)?.str()?;
    let years: Vec<Option<i32>> = months
        .into_iter()
        .map(|cell| cell.and_then(extract_year))
        .collect();
    Ok(Column::new(UNICORN_YEAR.into(), years))
}

/// First run of four ASCII digits in `text`, as a year.
pub fn extract_year(text: &str) -> Option<i32> {
    text.as_bytes()
        .windows(4)
        .find(|window| window.iter().all(u8::is_ascii_digit))
        .and_then(|window| std::str::from_utf8(window).ok()?.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reference::is_prepared_country;
    use crate::data::table::{records, COMPANY};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "company,country,vertical,status,raised_usd,valuation_usd,unicorn_month";

    fn write_csv(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("March 2015"), Some(2015));
        assert_eq!(extract_year("2021-07"), Some(2021));
        assert_eq!(extract_year("Unknown"), None);
        assert_eq!(extract_year("Q3 '19"), None);
    }

    #[test]
    fn test_keeps_only_european_active_or_exited() {
        let file = write_csv(&[
            "Klarna,Sweden,Fintech,Active,$3.7B,$6.7B,Aug 2011",
            "Stripe,United States,Fintech,Active,$8.7B,$50B,Jan 2014",
            "Wefox,Germany,Insurtech,Dead,$1.3B,$4.5B,Mar 2019",
            "Skype,Luxembourg,Telecom,Exited,$76M,$8.5B,Jan 2005",
        ]);
        let df = prepare_dataset(file.path()).unwrap();
        assert_eq!(df.height(), 2);

        for row in records(&df).unwrap() {
            assert!(is_prepared_country(&row.country));
            assert!(ALLOWED_STATUSES.contains(&row.status.as_str()));
            assert!(row.raised_usd >= 0.0 && row.valuation_usd >= 0.0);
        }
    }

    #[test]
    fn test_united_kingdom_renamed() {
        let file = write_csv(&[
            "Revolut,United Kingdom,Fintech,Active,$1.7B,$33B,Apr 2018",
            "Darktrace,United Kingdom,Cybersecurity,Exited,$230M,$1.7B,Sep 2018",
        ]);
        let df = prepare_dataset(file.path()).unwrap();
        let countries: Vec<_> = df.column(COUNTRY).unwrap().str().unwrap().into_iter().collect();
        assert_eq!(countries, vec![Some("UK"), Some("UK")]);
    }

    #[test]
    fn test_amounts_in_billions() {
        let file = write_csv(&[
            "A,France,SaaS,Active,$500M,$1B,March 2015",
            "B,France,SaaS,Active,$1.5B,N/A,June 2020",
            "C,France,SaaS,Active,undisclosed,,Unknown",
        ]);
        let df = prepare_dataset(file.path()).unwrap();
        let rows = records(&df).unwrap();
        assert_eq!(rows[0].raised_usd, 0.5);
        assert_eq!(rows[1].raised_usd, 1.5);
        assert_eq!(rows[0].valuation_usd, 1.0);
        assert_eq!(rows[1].valuation_usd, 0.0);
        assert_eq!(rows[2].raised_usd, 0.0);
        assert_eq!(rows[2].valuation_usd, 0.0);

        assert_eq!(rows[0].unicorn_year, Some(2015));
        assert_eq!(rows[1].unicorn_year, Some(2020));
        assert_eq!(rows[2].unicorn_year, None);
    }

    #[test]
    fn test_missing_file() {
        let err = prepare_dataset(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ParseError::NotFound(_)));
    }

    #[test]
    fn test_missing_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "company,country,vertical,status,raised_usd,valuation_usd").unwrap();
        writeln!(file, "Klarna,Sweden,Fintech,Active,$3.7B,$6.7B").unwrap();
        file.flush().unwrap();

        match prepare_dataset(file.path()) {
            Err(ParseError::MissingColumn(name)) => assert_eq!(name, UNICORN_MONTH),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_ragged_row_is_a_csv_error() {
        let file = write_csv(&[
            "Klarna,Sweden,Fintech,Active,$3.7B,$6.7B,Aug 2011",
            "Bolt,Estonia,Mobility,Active,$2B,$8.4B,May 2018,Sequoia,extra",
        ]);
        assert!(matches!(
            prepare_dataset(file.path()),
            Err(ParseError::CsvError(_))
        ));
    }

    #[test]
    fn test_extra_columns_carried_through() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER},investors").unwrap();
        writeln!(file, "Bolt,Estonia,Mobility,Active,$2B,$8.4B,May 2018,Sequoia").unwrap();
        file.flush().unwrap();

        let df = prepare_dataset(file.path()).unwrap();
        assert_eq!(df.height(), 1);
        assert!(df.column("investors").is_ok());
        assert_eq!(df.column(COMPANY).unwrap().str().unwrap().get(0), Some("Bolt"));
    }
}
