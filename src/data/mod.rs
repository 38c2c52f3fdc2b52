//! Data module - CSV loading, cleaning and export

mod cleaner;
mod exporter;
mod loader;

pub use cleaner::{parse_date_text, CleanError, DataCleaner};
pub(crate) use cleaner::{has_column, list_values, numeric_values, text_values};
pub use exporter::{export_csv, ExportError};
pub use loader::{DataLoader, LoaderError};
