//! Error types
//!
//! Parsing is lenient: malformed lines are skipped, unknown pages and files
//! resolve to `None`. The only hard failures come from the decompression
//! step, when the environment cannot read the input at all.

use thiserror::Error;

/// Errors that abort a parse
#[derive(Debug, Error)]
pub enum SyncError {
    /// Input starts with the gzip magic but gzip support was not compiled in
    #[error("input is gzip-compressed but gzip support is not available")]
    DecompressionUnavailable,

    /// The gzip member could not be decoded
    #[error("failed to decompress synctex stream: {0}")]
    Decompress(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
