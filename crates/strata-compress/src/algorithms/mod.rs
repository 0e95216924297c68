//! Bundled compressors.

pub mod gzip;
pub mod lz4;
pub mod zstd;

pub use self::gzip::GzipCompressor;
pub use self::lz4::Lz4Compressor;
pub use self::zstd::ZstdCompressor;
