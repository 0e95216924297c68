use std::io::Read;

use crate::error::{CompressionError, CompressionResult};

/// A byte-level compression algorithm.
///
/// Contract for every implementation:
/// - `decompress(compress(x)) == x` for all `x`.
/// - Empty input maps to empty output in both directions. The compressing
///   decorator passes empty payloads through untouched, so this is what gives
///   compressed chains their empty-input behaviour.
/// - `name()` is a stable lowercase identifier for logs and selection. It is
///   never written into the compressed stream.
/// - Implementations are stateless per call and safe to share across threads.
pub trait Compressor: Send + Sync {
    /// Compress `data`.
    fn compress(&self, data: &[u8]) -> CompressionResult<Vec<u8>>;

    /// Decompress bytes produced by [`Compressor::compress`].
    fn decompress(&self, data: &[u8]) -> CompressionResult<Vec<u8>>;

    /// Stable lowercase algorithm identifier, e.g. `"gzip"`.
    fn name(&self) -> &'static str;
}

/// Drain a decompressing reader, enforcing an optional output limit.
pub(crate) fn read_limited<R: Read>(
    mut reader: R,
    limit: Option<usize>,
) -> CompressionResult<Vec<u8>> {
    let mut out = Vec::new();
    match limit {
        None => {
            reader
                .read_to_end(&mut out)
                .map_err(CompressionError::Decompress)?;
        }
        Some(limit) => {
            // One byte past the limit is enough to detect overflow.
            reader
                .take((limit as u64).saturating_add(1))
                .read_to_end(&mut out)
                .map_err(CompressionError::Decompress)?;
            if out.len() > limit {
                return Err(CompressionError::SizeLimitExceeded { limit });
            }
        }
    }
    Ok(out)
}
