//! Data module - dataset preparation, caching and filtering
//!
//! ```text
//!  unicorns CSV ──▶ preparer ──▶ DatasetCache ──▶ filter ──▶ charts / records table
//! ```

mod cache;
mod currency;
mod filter;
mod preparer;
pub mod reference;
pub mod table;

pub use cache::DatasetCache;
pub use filter::{apply_filters, Choice, FilterSelection, YearRange, ALL};
pub use table::{records, PreparedRecord, Totals};
