use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("lead file not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("unsupported lead file type: {0} (expected .csv or .parquet)")]
    UnsupportedFormat(std::path::PathBuf),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}
