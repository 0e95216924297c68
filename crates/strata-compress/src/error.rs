use std::io;

use thiserror::Error;

/// Errors from compressors.
#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("compression failed: {0}")]
    Compress(#[source] io::Error),

    #[error("decompression failed: {0}")]
    Decompress(#[source] io::Error),

    /// Decompressed output grew past the configured guard.
    #[error("decompressed size exceeds limit of {limit} bytes")]
    SizeLimitExceeded { limit: usize },

    #[error("unsupported {algorithm} compression level: {level}")]
    InvalidLevel { algorithm: &'static str, level: i32 },

    #[error("unknown compressor: {0}")]
    UnknownAlgorithm(String),
}

pub type CompressionResult<T> = Result<T, CompressionError>;
