//! Encryption stage for Strata.
//!
//! # Architecture
//!
//! - **Cipher**: the leaf capability, raw bytes in and out
//! - **AeadCipher**: Argon2id key stretching plus an AEAD from `ring`
//! - **SecurityLevel** / **Argon2Profile**: algorithm and key-stretching cost
//! - **EncryptingCodec**: encode = serialize then encrypt, decode = decrypt then deserialize
//!
//! # Example
//!
//! ```
//! use strata_codec::{Codec, Context, JsonCodec};
//! use strata_crypto::{Argon2Profile, EncryptingCodec, SecurityLevel};
//!
//! let codec = EncryptingCodec::new(
//!     "a long passphrase",
//!     JsonCodec::new(),
//!     SecurityLevel::High,
//!     Argon2Profile::Fast,
//! )?;
//! let ctx = Context::background();
//! let sealed = codec.encode_value(&ctx, &vec![1u32, 2, 3])?;
//! let out: Vec<u32> = codec.decode_value(&ctx, &sealed)?;
//! assert_eq!(out, vec![1, 2, 3]);
//! # Ok::<(), strata_codec::CodecError>(())
//! ```

pub mod aead;
pub mod cipher;
pub mod codec;
pub mod error;
pub mod params;

pub use aead::{AeadCipher, ENVELOPE_VERSION};
pub use cipher::Cipher;
pub use codec::{EncryptingCodec, EncryptingCodecBuilder};
pub use error::{CipherError, CipherResult};
pub use params::{Argon2Profile, SecurityLevel};
