use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algorithms::{GzipCompressor, Lz4Compressor, ZstdCompressor};
use crate::compressor::Compressor;
use crate::error::{CompressionError, CompressionResult};

/// The bundled compression algorithms, selectable by their stable name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressorKind {
    Gzip,
    Lz4,
    Zstd,
}

impl CompressorKind {
    pub const ALL: [CompressorKind; 3] = [Self::Gzip, Self::Lz4, Self::Zstd];

    /// The name reported by [`Compressor::name`] for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Lz4 => "lz4",
            Self::Zstd => "zstd",
        }
    }

    /// Build a compressor with default settings.
    pub fn build(&self) -> Arc<dyn Compressor> {
        match self {
            Self::Gzip => Arc::new(GzipCompressor::new()),
            Self::Lz4 => Arc::new(Lz4Compressor::new()),
            Self::Zstd => Arc::new(ZstdCompressor::new()),
        }
    }

    /// Build a compressor with an optional level and decompression guard.
    ///
    /// LZ4 has no levels; passing one is an error rather than being ignored.
    pub fn build_with(
        &self,
        level: Option<i32>,
        max_decompressed_size: Option<usize>,
    ) -> CompressionResult<Arc<dyn Compressor>> {
        let compressor: Arc<dyn Compressor> = match self {
            Self::Gzip => {
                let mut gzip = match level {
                    Some(level) => {
                        let level = u32::try_from(level).map_err(|_| {
                            CompressionError::InvalidLevel {
                                algorithm: "gzip",
                                level,
                            }
                        })?;
                        GzipCompressor::with_level(level)?
                    }
                    None => GzipCompressor::new(),
                };
                if let Some(limit) = max_decompressed_size {
                    gzip = gzip.max_decompressed_size(limit);
                }
                Arc::new(gzip)
            }
            Self::Lz4 => {
                if let Some(level) = level {
                    return Err(CompressionError::InvalidLevel {
                        algorithm: "lz4",
                        level,
                    });
                }
                let mut lz4 = Lz4Compressor::new();
                if let Some(limit) = max_decompressed_size {
                    lz4 = lz4.max_decompressed_size(limit);
                }
                Arc::new(lz4)
            }
            Self::Zstd => {
                let mut zstd = match level {
                    Some(level) => ZstdCompressor::with_level(level)?,
                    None => ZstdCompressor::new(),
                };
                if let Some(limit) = max_decompressed_size {
                    zstd = zstd.max_decompressed_size(limit);
                }
                Arc::new(zstd)
            }
        };
        Ok(compressor)
    }
}

impl fmt::Display for CompressorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressorKind {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| CompressionError::UnknownAlgorithm(s.to_string()))
    }
}

/// Look up a default-configured compressor by its stable name.
pub fn compressor_by_name(name: &str) -> Option<Arc<dyn Compressor>> {
    name.parse::<CompressorKind>().ok().map(|kind| kind.build())
}
