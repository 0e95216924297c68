use std::io::Write;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::compressor::{read_limited, Compressor};
use crate::error::{CompressionError, CompressionResult};

/// Gzip compressor backed by `flate2`.
///
/// The gzip trailer carries a CRC32 of the uncompressed data, so corrupted
/// streams fail to decompress instead of yielding wrong bytes.
///
/// The CRC does not cover the header. Flipping a bit in the flag, mtime,
/// extra-flags or OS fields (bytes 3..=9) can go unnoticed; the decoded
/// output is still correct in that case.
#[derive(Clone, Copy, Debug)]
pub struct GzipCompressor {
    level: u32,
    max_decompressed_size: Option<usize>,
}

impl GzipCompressor {
    pub const DEFAULT_LEVEL: u32 = 6;
    pub const MAX_LEVEL: u32 = 9;

    pub fn new() -> Self {
        Self {
            level: Self::DEFAULT_LEVEL,
            max_decompressed_size: None,
        }
    }

    /// Use an explicit level in `0..=9`.
    pub fn with_level(level: u32) -> CompressionResult<Self> {
        if level > Self::MAX_LEVEL {
            return Err(CompressionError::InvalidLevel {
                algorithm: "gzip",
                level: i32::try_from(level).unwrap_or(i32::MAX),
            });
        }
        Ok(Self {
            level,
            ..Self::new()
        })
    }

    /// Refuse to decompress more than `limit` bytes.
    pub fn max_decompressed_size(mut self, limit: usize) -> Self {
        self.max_decompressed_size = Some(limit);
        self
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Default for GzipCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor for GzipCompressor {
    fn compress(&self, data: &[u8]) -> CompressionResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let mut encoder = GzEncoder::new(
            Vec::with_capacity(data.len() / 2),
            Compression::new(self.level),
        );
        encoder.write_all(data).map_err(CompressionError::Compress)?;
        encoder.finish().map_err(CompressionError::Compress)
    }

    fn decompress(&self, data: &[u8]) -> CompressionResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        read_limited(GzDecoder::new(data), self.max_decompressed_size)
    }

    fn name(&self) -> &'static str {
        "gzip"
    }
}
