//! Compression stage for Strata.
//!
//! Provides the [`Compressor`] leaf capability, three bundled algorithms, and
//! the [`CompressingCodec`] decorator that slots compression into any codec
//! chain.
//!
//! # Architecture
//!
//! - **Compressor**: bytes in, bytes out, plus a stable lowercase name
//! - **GzipCompressor** / **Lz4Compressor** / **ZstdCompressor**: bundled algorithms
//! - **CompressorKind**: name-based selection and level validation
//! - **CompressingCodec**: encode = serialize then compress, decode = decompress then deserialize
//!
//! The compressor name is never embedded in the output. Callers that switch
//! algorithms for existing data must record which one produced which bytes.

pub mod algorithms;
pub mod codec;
pub mod compressor;
pub mod error;
pub mod registry;

pub use algorithms::{GzipCompressor, Lz4Compressor, ZstdCompressor};
pub use codec::{CompressingCodec, CompressingCodecBuilder};
pub use compressor::Compressor;
pub use error::{CompressionError, CompressionResult};
pub use registry::{compressor_by_name, CompressorKind};
