//! Config-driven codec chains for Strata.
//!
//! Ties the serializers from `strata-codec`, the compression stage from
//! `strata-compress` and the encryption stage from `strata-crypto` together:
//!
//! - **PipelineConfig**: TOML-loadable description of a chain
//! - **Chain**: the assembled chain, itself a [`Codec`]
//! - **CodecExt**: `.compressed(..)` / `.encrypted(..)` combinators for building by hand
//!
//! Stages decode in the mirror order of encode. Data must be decoded with a
//! chain of the same shape it was encoded with; nothing in the bytes records
//! which stages produced them.

pub mod chain;
pub mod config;
pub mod error;
pub mod ext;

pub use chain::Chain;
pub use config::{CompressionConfig, EncryptionConfig, PipelineConfig, StageOrder};
pub use error::{PipelineError, PipelineResult};
pub use ext::CodecExt;

pub use strata_codec::{Codec, CodecError, CodecResult, Context};
