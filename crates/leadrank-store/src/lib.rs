//! Snapshot loading (CSV, Parquet) and CSV export.
//!
//! Every load failure is a data-unavailable condition: the caller gets a
//! [`StoreError`] and decides how to show it. Nothing here panics on bad
//! input.

mod error;
pub use error::StoreError;

pub mod export;
pub mod load;

pub use export::{ExportKind, export_bytes, export_csv, write_csv};
pub use load::{LoadReport, load_snapshot, read_csv, read_parquet, records_from_batches};
