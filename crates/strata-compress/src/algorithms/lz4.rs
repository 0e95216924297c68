use std::io::{self, Write};

use lz4_flex::frame::{FrameDecoder, FrameEncoder, FrameInfo};

use crate::compressor::{read_limited, Compressor};
use crate::error::{CompressionError, CompressionResult};

/// LZ4 compressor using the `lz4_flex` frame format.
///
/// Frames are written with a content checksum so corruption is reported on
/// decompression. Favours speed over ratio; there is no level setting.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lz4Compressor {
    max_decompressed_size: Option<usize>,
}

impl Lz4Compressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse to decompress more than `limit` bytes.
    pub fn max_decompressed_size(mut self, limit: usize) -> Self {
        self.max_decompressed_size = Some(limit);
        self
    }
}

impl Compressor for Lz4Compressor {
    fn compress(&self, data: &[u8]) -> CompressionResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let info = FrameInfo::new().content_checksum(true);
        let mut encoder = FrameEncoder::with_frame_info(info, Vec::with_capacity(data.len()));
        encoder.write_all(data).map_err(CompressionError::Compress)?;
        encoder
            .finish()
            .map_err(|e| CompressionError::Compress(io::Error::other(e)))
    }

    fn decompress(&self, data: &[u8]) -> CompressionResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        read_limited(FrameDecoder::new(data), self.max_decompressed_size)
    }

    fn name(&self) -> &'static str {
        "lz4"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_and_decompress() {
        let comp = Lz4Compressor::new();
        let original = b"hello world, this is a test";

        let compressed = comp.compress(original).unwrap();
        assert_ne!(compressed.as_slice(), original.as_slice());

        let decompressed = comp.decompress(&compressed).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn decompress_invalid_data() {
        let err = Lz4Compressor::new()
            .decompress(b"not an lz4 stream")
            .unwrap_err();
        assert!(matches!(err, CompressionError::Decompress(_)));
    }

    #[test]
    fn repetitive_input_shrinks() {
        let original = "abcdefgh".repeat(512);
        let compressed = Lz4Compressor::new().compress(original.as_bytes()).unwrap();
        assert!(compressed.len() < original.len());
    }

    #[test]
    fn empty_in_empty_out() {
        let comp = Lz4Compressor::new();
        assert!(comp.compress(&[]).unwrap().is_empty());
        assert!(comp.decompress(&[]).unwrap().is_empty());
    }

    #[test]
    fn size_guard() {
        let data = vec![1u8; 8192];
        let compressed = Lz4Compressor::new().compress(&data).unwrap();
        let err = Lz4Compressor::new()
            .max_decompressed_size(100)
            .decompress(&compressed)
            .unwrap_err();
        assert!(matches!(err, CompressionError::SizeLimitExceeded { limit: 100 }));
    }

    #[test]
    fn name() {
        assert_eq!(Lz4Compressor::new().name(), "lz4");
    }
}
