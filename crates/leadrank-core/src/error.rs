use thiserror::Error;

/// A filter configuration that cannot be turned into a [`FilterSpec`](crate::FilterSpec).
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("invalid filter spec: {field} must be a non-negative integer, got {value:?}")]
    InvalidBound { field: &'static str, value: String },

    #[error("invalid filter spec: unknown tier {0:?}")]
    UnknownTier(String),

    #[error("invalid filter spec: unknown segment {0:?}")]
    UnknownSegment(String),

    #[error("invalid filter spec: {0:?} is not a two-letter state code")]
    InvalidState(String),

    #[error("invalid filter spec: {0}")]
    Json(#[from] serde_json::Error),
}
