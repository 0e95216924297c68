//! Codec contract for Strata.
//!
//! A codec turns a value into bytes and back. Serializers are the base
//! codecs; compression and encryption are decorators (in `strata-compress`
//! and `strata-crypto`) that wrap another codec and implement the same
//! trait, so chains nest to any depth.
//!
//! # Key Types
//!
//! - [`Codec`]: the two-operation encode/decode capability
//! - [`Context`]: per-call cancellation token and deadline
//! - [`CodecError`]: error taxonomy shared by every stage
//! - [`JsonCodec`], [`MessagePackCodec`], [`BincodeCodec`], [`YamlCodec`]: bundled serializers
//!
//! # Example
//!
//! ```rust
//! use strata_codec::{Codec, Context, JsonCodec};
//!
//! let ctx = Context::background();
//! let codec = JsonCodec::new();
//! let bytes = codec.encode_value(&ctx, &vec!["a", "b"]).unwrap();
//! let back: Vec<String> = codec.decode_value(&ctx, &bytes).unwrap();
//! assert_eq!(back, ["a", "b"]);
//! ```

pub mod codec;
pub mod context;
pub mod error;
pub mod serializers;

pub use codec::Codec;
pub use context::{Cancellation, Context, Deadline};
pub use error::{BoxError, CodecError, CodecResult};
pub use serializers::{BincodeCodec, JsonCodec, MessagePackCodec, YamlCodec};
