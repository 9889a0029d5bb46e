//! Reference Data
//! Static tables the preparer filters and cleans against.

/// Countries kept by the preparer, as spelled in the source file.
pub const EUROPEAN_COUNTRIES: [&str; 28] = [
    "Austria",
    "Belgium",
    "Bulgaria",
    "Croatia",
    "Cyprus",
    "Czech Republic",
    "Denmark",
    "Estonia",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Hungary",
    "Ireland",
    "Italy",
    "Latvia",
    "Lithuania",
    "Luxembourg",
    "Malta",
    "Netherlands",
    "Poland",
    "Portugal",
    "Romania",
    "Slovakia",
    "Slovenia",
    "Spain",
    "Sweden",
    "United Kingdom",
];

/// Country renamed after filtering: (source spelling, display spelling).
pub const COUNTRY_RENAME: (&str, &str) = ("United Kingdom", "UK");

/// Statuses that survive preparation. Anything else is dropped silently.
pub const ALLOWED_STATUSES: [&str; 2] = ["Active", "Exited"];

/// Ordered substitution rules turning "$1.5B" style text into "1.5e9".
///
/// Each rule replaces the first literal occurrence of its pattern, applied
/// left to right.
pub const CURRENCY_RULES: [(&str, &str); 4] = [("N/A", "0"), ("$", ""), ("M", "e6"), ("B", "e9")];

/// Prepared amounts are stored in billions of dollars.
pub const BILLION: f64 = 1e9;

/// Check a prepared (post-rename) country name against the allow-list.
#[cfg(test)]
pub fn is_prepared_country(country: &str) -> bool {
    if country == COUNTRY_RENAME.1 {
        return true;
    }
    country != COUNTRY_RENAME.0 && EUROPEAN_COUNTRIES.contains(&country)
}
