//! Error types for hkjc-extract.
//!
//! The extraction engine itself never fails on malformed markup; partial
//! extraction is always preferred over an error. The variants here cover
//! contract violations and serialization only.

/// Error type for page parsing and record emission.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller handed in an empty or whitespace-only document.
    #[error("empty document: nothing to extract from")]
    EmptyDocument,

    /// Serializing extracted records to JSON failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
