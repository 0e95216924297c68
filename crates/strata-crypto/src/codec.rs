use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use strata_codec::{Codec, CodecError, CodecResult, Context};
use tracing::{debug, trace};

use crate::aead::AeadCipher;
use crate::cipher::Cipher;
use crate::error::{CipherError, CipherResult};
use crate::params::{Argon2Profile, SecurityLevel};

const NONE_DEST: &str = "value cannot be None";

// ---------------------------------------------------------------------------
// EncryptingCodec
// ---------------------------------------------------------------------------

/// Decorator that encrypts the bytes produced by an inner codec.
///
/// Unlike the compression decorator, this stage handles absent and empty
/// data itself:
///
/// | Call | Result |
/// |------|--------|
/// | `encode(None)` | `Ok(vec![])`; neither the inner codec nor the cipher runs |
/// | `decode(_, None)` | [`CodecError::InvalidInput`], even for empty `data` |
/// | `decode(&[], Some(dest))` | `Ok(())`; `dest` is left untouched |
///
/// Otherwise `encode` runs the inner codec then encrypts, and `decode`
/// decrypts then runs the inner codec. A decryption failure never reaches
/// the inner codec.
#[derive(Clone)]
pub struct EncryptingCodec<C> {
    inner: C,
    cipher: Arc<dyn Cipher>,
}

impl<C: Codec> EncryptingCodec<C> {
    /// Derive an [`AeadCipher`] from `passphrase` and wrap `inner` with it.
    pub fn new(
        passphrase: &str,
        inner: C,
        level: SecurityLevel,
        profile: Argon2Profile,
    ) -> CodecResult<Self> {
        Self::builder()
            .passphrase(passphrase)
            .inner(inner)
            .security_level(level)
            .profile(profile)
            .build()
    }

    /// Wrap `inner` with an already constructed cipher.
    pub fn with_cipher(inner: C, cipher: Arc<dyn Cipher>) -> Self {
        Self { inner, cipher }
    }

    pub fn builder() -> EncryptingCodecBuilder<C> {
        EncryptingCodecBuilder {
            passphrase: None,
            inner: None,
            level: SecurityLevel::default(),
            profile: Argon2Profile::default(),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn cipher(&self) -> &dyn Cipher {
        self.cipher.as_ref()
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn stage_error(&self, op: &'static str, err: CipherError) -> CodecError {
        debug!(algorithm = self.cipher.algorithm(), op, error = %err, "encryption stage failed");
        CodecError::stage(op, err)
    }
}

impl<C: Codec> Codec for EncryptingCodec<C> {
    fn encode<T>(&self, ctx: &Context, value: Option<&T>) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let Some(value) = value else {
            trace!("encode of None short-circuited");
            return Ok(Vec::new());
        };
        let plain = self.inner.encode(ctx, Some(value))?;
        let sealed = self
            .cipher
            .encrypt_raw(&plain)
            .map_err(|e| self.stage_error("encrypt", e))?;
        trace!(
            algorithm = self.cipher.algorithm(),
            plain = plain.len(),
            sealed = sealed.len(),
            "encrypted payload"
        );
        Ok(sealed)
    }

    fn decode<T>(&self, ctx: &Context, data: &[u8], dest: Option<&mut T>) -> CodecResult<()>
    where
        T: DeserializeOwned,
    {
        let Some(dest) = dest else {
            return Err(CodecError::InvalidInput(NONE_DEST.into()));
        };
        if data.is_empty() {
            return Ok(());
        }
        ctx.ensure_active()?;
        let plain = self
            .cipher
            .decrypt_raw(data)
            .map_err(|e| self.stage_error("decrypt", e))?;
        trace!(
            algorithm = self.cipher.algorithm(),
            sealed = data.len(),
            plain = plain.len(),
            "decrypted payload"
        );
        self.inner.decode(ctx, &plain, Some(dest))
    }
}

impl<C: fmt::Debug> fmt::Debug for EncryptingCodec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptingCodec")
            .field("inner", &self.inner)
            .field("algorithm", &self.cipher.algorithm())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// EncryptingCodecBuilder
// ---------------------------------------------------------------------------

/// Builder for [`EncryptingCodec`].
///
/// Validation runs before any key material is derived: an empty passphrase
/// or a missing inner codec fails with [`CodecError::Config`] and no cipher
/// is created.
pub struct EncryptingCodecBuilder<C> {
    passphrase: Option<String>,
    inner: Option<C>,
    level: SecurityLevel,
    profile: Argon2Profile,
}

impl<C: Codec> EncryptingCodecBuilder<C> {
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    pub fn inner(mut self, inner: C) -> Self {
        self.inner = Some(inner);
        self
    }

    pub fn security_level(mut self, level: SecurityLevel) -> Self {
        self.level = level;
        self
    }

    pub fn profile(mut self, profile: Argon2Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Validate and derive an [`AeadCipher`].
    pub fn build(self) -> CodecResult<EncryptingCodec<C>> {
        self.build_with(|passphrase, level, profile| {
            let cipher: Arc<dyn Cipher> = Arc::new(AeadCipher::new(passphrase, level, profile)?);
            Ok(cipher)
        })
    }

    /// Validate, then create the cipher with `factory`.
    ///
    /// `factory` is only called once validation has passed.
    pub fn build_with<F>(self, factory: F) -> CodecResult<EncryptingCodec<C>>
    where
        F: FnOnce(&str, SecurityLevel, Argon2Profile) -> CipherResult<Arc<dyn Cipher>>,
    {
        let passphrase = match self.passphrase {
            Some(p) if !p.is_empty() => p,
            _ => return Err(CodecError::Config("passphrase cannot be empty".into())),
        };
        let inner = self
            .inner
            .ok_or_else(|| CodecError::Config("inner codec is required".into()))?;
        let cipher = factory(&passphrase, self.level, self.profile)
            .map_err(|e| CodecError::Config(format!("failed to create cipher: {e}")))?;
        Ok(EncryptingCodec::with_cipher(inner, cipher))
    }
}

impl<C> fmt::Debug for EncryptingCodecBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptingCodecBuilder")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "[REDACTED]"))
            .field("has_inner", &self.inner.is_some())
            .field("level", &self.level)
            .field("profile", &self.profile)
            .finish()
    }
}
