//! Stream decompression
//!
//! The engine writes either a plain `.synctex` file or a gzip-compressed
//! `.synctex.gz`. Compressed input is recognized by its two-byte magic and
//! inflated before parsing; anything else passes through borrowed.

use std::borrow::Cow;

use crate::error::{Result, SyncError};

/// gzip member header magic
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Check for the gzip magic number
#[inline]
pub fn is_gzip(input: &[u8]) -> bool {
    input.starts_with(&GZIP_MAGIC)
}

/// Return the uncompressed stream bytes
///
/// # Errors
///
/// [`SyncError::DecompressionUnavailable`] when the input is compressed and
/// the crate was built without the `gzip` feature, [`SyncError::Decompress`]
/// when nothing at all can be decoded. A stream that breaks off after some
/// output decodes to that prefix.
pub fn decompress(input: &[u8]) -> Result<Cow<'_, [u8]>> {
    if !is_gzip(input) {
        return Ok(Cow::Borrowed(input));
    }
    inflate(input).map(Cow::Owned)
}

#[cfg(feature = "gzip")]
fn inflate(input: &[u8]) -> Result<Vec<u8>> {
    use std::io::Read;

    // Multi-member aware: some writers flush the stream in several members
    let mut decoder = flate2::read::MultiGzDecoder::new(input);
    // Synchronization streams compress roughly 5:1
    let mut out = Vec::with_capacity(input.len().saturating_mul(5));
    match decoder.read_to_end(&mut out) {
        Ok(_) => Ok(out),
        // A stream cut short (engine still writing or killed) keeps the
        // decoded prefix; the parser skips the partial last line
        Err(err) if !out.is_empty() => {
            tracing::warn!(
                compressed = input.len(),
                decoded = out.len(),
                error = %err,
                "gzip synctex stream truncated, using decoded prefix"
            );
            Ok(out)
        }
        Err(err) => {
            tracing::warn!(
                compressed = input.len(),
                error = %err,
                "gzip synctex stream could not be decoded"
            );
            Err(SyncError::Decompress(err))
        }
    }
}

#[cfg(not(feature = "gzip"))]
fn inflate(_input: &[u8]) -> Result<Vec<u8>> {
    Err(SyncError::DecompressionUnavailable)
}
