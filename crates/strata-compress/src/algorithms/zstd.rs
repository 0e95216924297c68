use std::io::Write;

use ::zstd::stream::read::Decoder;
use ::zstd::stream::write::Encoder;

use crate::compressor::{read_limited, Compressor};
use crate::error::{CompressionError, CompressionResult};

/// Zstandard compressor.
///
/// Frames carry a content checksum, so a corrupted stream fails to
/// decompress instead of yielding different bytes.
#[derive(Clone, Copy, Debug)]
pub struct ZstdCompressor {
    level: i32,
    max_decompressed_size: Option<usize>,
}

impl ZstdCompressor {
    /// Balance between speed and size.
    pub const DEFAULT_LEVEL: i32 = 3;
    pub const MAX_LEVEL: i32 = 22;

    pub fn new() -> Self {
        Self {
            level: Self::DEFAULT_LEVEL,
            max_decompressed_size: None,
        }
    }

    /// Use an explicit level in `1..=22`.
    pub fn with_level(level: i32) -> CompressionResult<Self> {
        if !(1..=Self::MAX_LEVEL).contains(&level) {
            return Err(CompressionError::InvalidLevel {
                algorithm: "zstd",
                level,
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

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Default for ZstdCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor for ZstdCompressor {
    fn compress(&self, data: &[u8]) -> CompressionResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let mut encoder = Encoder::new(Vec::with_capacity(data.len() / 2), self.level)
            .map_err(CompressionError::Compress)?;
        encoder
            .include_checksum(true)
            .map_err(CompressionError::Compress)?;
        encoder.write_all(data).map_err(CompressionError::Compress)?;
        encoder.finish().map_err(CompressionError::Compress)
    }

    fn decompress(&self, data: &[u8]) -> CompressionResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let decoder = Decoder::new(data).map_err(CompressionError::Decompress)?;
        read_limited(decoder, self.max_decompressed_size)
    }

    fn name(&self) -> &'static str {
        "zstd"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_and_decompress() {
        let comp = ZstdCompressor::new();
        let original = vec![0xABu8; 100_000];
        let compressed = comp.compress(&original).unwrap();
        assert!(compressed.len() < original.len());
        assert_eq!(comp.decompress(&compressed).unwrap(), original);
    }

    #[test]
    fn decompress_invalid_data() {
        let err = ZstdCompressor::new()
            .decompress(&[0u8; 10])
            .unwrap_err();
        assert!(matches!(err, CompressionError::Decompress(_)));
    }

    #[test]
    fn frames_carry_a_checksum() {
        let comp = ZstdCompressor::new();
        let original = br#"[{"Name":"Alice"},{"Name":"Bob"},{"Name":"Carol"}]"#;
        let compressed = comp.compress(original).unwrap();
        // Frame header descriptor, bit 2: Content_Checksum_flag.
        assert_eq!(compressed[4] & 0x04, 0x04);

        let mut flipped = compressed.clone();
        let literal = flipped.len() / 2;
        flipped[literal] ^= 0x01;
        match comp.decompress(&flipped) {
            Err(err) => assert!(matches!(err, CompressionError::Decompress(_))),
            Ok(out) => assert_eq!(out, original),
        }
    }

    #[test]
    fn empty_in_empty_out() {
        let comp = ZstdCompressor::new();
        assert!(comp.compress(&[]).unwrap().is_empty());
        assert!(comp.decompress(&[]).unwrap().is_empty());
    }

    #[test]
    fn level_bounds() {
        assert_eq!(ZstdCompressor::with_level(22).unwrap().level(), 22);
        assert!(ZstdCompressor::with_level(0).is_err());
        assert!(ZstdCompressor::with_level(23).is_err());
    }

    #[test]
    fn size_guard() {
        let data = vec![0u8; 10_000];
        let compressed = ZstdCompressor::new().compress(&data).unwrap();
        let err = ZstdCompressor::new()
            .max_decompressed_size(9_999)
            .decompress(&compressed)
            .unwrap_err();
        assert!(matches!(err, CompressionError::SizeLimitExceeded { .. }));
    }

    #[test]
    fn name() {
        assert_eq!(ZstdCompressor::new().name(), "zstd");
    }
}
