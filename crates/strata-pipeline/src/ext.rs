use std::sync::Arc;

use strata_codec::Codec;
use strata_compress::{CompressingCodec, Compressor};
use strata_crypto::{Cipher, EncryptingCodec};

/// Combinators for building chains inside out.
///
/// ```
/// use std::sync::Arc;
/// use strata_codec::JsonCodec;
/// use strata_compress::GzipCompressor;
/// use strata_crypto::{AeadCipher, Argon2Profile, SecurityLevel};
/// use strata_pipeline::CodecExt;
///
/// let cipher = AeadCipher::new("pw", SecurityLevel::Medium, Argon2Profile::Fast)?;
/// let codec = JsonCodec::new()
///     .compressed(Arc::new(GzipCompressor::new()))
///     .encrypted(Arc::new(cipher));
/// # Ok::<(), strata_crypto::CipherError>(())
/// ```
pub trait CodecExt: Codec + Sized {
    /// Compress whatever `self` produces.
    fn compressed(self, compressor: Arc<dyn Compressor>) -> CompressingCodec<Self> {
        CompressingCodec::new(self, compressor)
    }

    /// Encrypt whatever `self` produces.
    fn encrypted(self, cipher: Arc<dyn Cipher>) -> EncryptingCodec<Self> {
        EncryptingCodec::with_cipher(self, cipher)
    }
}

impl<C: Codec> CodecExt for C {}
