//! Error taxonomy for the decoder.
//!
//! Locator errors fire before any bytes are read; header errors
//! terminate the whole scope (no record can be interpreted without a
//! valid header); field errors are terminal for the offending record.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogReaderError {
    /// Malformed remote-object locator (unrecognized scheme, empty
    /// bucket or object path). Raised before any retrieval is attempted.
    #[error("Invalid source locator: {0:?}")]
    InvalidSourceLocator(String),

    /// First header line missing or not the supported `#Version: 1.0`.
    #[error("Invalid log header version line: {0:?}")]
    InvalidHeaderVersion(String),

    /// Second header line missing or not a `#Fields:` declaration.
    #[error("Invalid log header fields line: {0:?}")]
    InvalidHeaderFields(String),

    /// A mandatory column was absent or empty after sentinel collapsing.
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// A mandatory column was present but failed type coercion.
    #[error("Invalid value {value:?} for field {field}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
    },

    /// Underlying stream failure, including malformed gzip content and
    /// non-UTF-8 line data surfaced by the line source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
