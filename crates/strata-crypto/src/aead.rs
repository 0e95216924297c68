use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, NONCE_LEN};
use tracing::debug;

use crate::cipher::Cipher;
use crate::error::{CipherError, CipherResult};
use crate::params::{Argon2Profile, SecurityLevel};

/// Envelope layout version.
pub const ENVELOPE_VERSION: u8 = 1;

/// `[version][algorithm id]`, authenticated as associated data.
const PREAMBLE_LEN: usize = 2;

const HEADER_LEN: usize = PREAMBLE_LEN + NONCE_LEN;

/// Context string for the default passphrase-bound salt.
const SALT_CONTEXT: &str = "strata-crypto 2024-01-01 aead passphrase salt";

const DERIVED_SALT_LEN: usize = 16;

/// Argon2 rejects salts shorter than this.
pub const MIN_SALT_LEN: usize = 8;

/// Passphrase-keyed AEAD cipher.
///
/// The key is stretched from the passphrase with Argon2id once, at
/// construction. Every call to [`Cipher::encrypt_raw`] draws a fresh random
/// nonce, so encrypting the same plaintext twice yields different bytes.
///
/// Envelope format:
///
/// ```text
/// [version: u8][algorithm id: u8][nonce: 12 bytes][ciphertext || tag]
/// ```
///
/// The first two bytes are bound to the tag as associated data.
pub struct AeadCipher {
    level: SecurityLevel,
    key: LessSafeKey,
}

impl AeadCipher {
    /// Derive a cipher from `passphrase`.
    ///
    /// The salt is derived from the passphrase itself, so two processes
    /// configured with the same passphrase interoperate without sharing
    /// extra state. Use [`AeadCipher::with_salt`] to supply a stored salt.
    pub fn new(
        passphrase: &str,
        level: SecurityLevel,
        profile: Argon2Profile,
    ) -> CipherResult<Self> {
        let derived = blake3::derive_key(SALT_CONTEXT, passphrase.as_bytes());
        Self::with_salt(passphrase, &derived[..DERIVED_SALT_LEN], level, profile)
    }

    /// Derive a cipher from `passphrase` and an explicit salt.
    pub fn with_salt(
        passphrase: &str,
        salt: &[u8],
        level: SecurityLevel,
        profile: Argon2Profile,
    ) -> CipherResult<Self> {
        if passphrase.is_empty() {
            return Err(CipherError::EmptyPassphrase);
        }
        if salt.len() < MIN_SALT_LEN {
            return Err(CipherError::KeyDerivation(format!(
                "salt must be at least {MIN_SALT_LEN} bytes, got {}",
                salt.len()
            )));
        }

        let mut key_bytes = vec![0u8; level.key_len()];
        profile
            .argon2(key_bytes.len())?
            .hash_password_into(passphrase.as_bytes(), salt, &mut key_bytes)
            .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;
        let unbound = UnboundKey::new(level.aead(), &key_bytes);
        key_bytes.fill(0);
        let key = LessSafeKey::new(unbound.map_err(|_| CipherError::InvalidKey)?);

        debug!(level = %level, profile = %profile, "derived cipher key");
        Ok(Self { level, key })
    }

    pub fn security_level(&self) -> SecurityLevel {
        self.level
    }

    fn tag_len(&self) -> usize {
        self.key.algorithm().tag_len()
    }
}

impl Cipher for AeadCipher {
    fn encrypt_raw(&self, plaintext: &[u8]) -> CipherResult<Vec<u8>> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| CipherError::Rng(e.to_string()))?;
        let preamble = [ENVELOPE_VERSION, self.level.id()];

        let mut in_out = plaintext.to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce),
                Aad::from(preamble),
                &mut in_out,
            )
            .map_err(|_| CipherError::Encrypt)?;

        let mut envelope = Vec::with_capacity(HEADER_LEN + in_out.len());
        envelope.extend_from_slice(&preamble);
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&in_out);
        Ok(envelope)
    }

    fn decrypt_raw(&self, envelope: &[u8]) -> CipherResult<Vec<u8>> {
        let min = HEADER_LEN + self.tag_len();
        if envelope.len() < min {
            return Err(CipherError::Truncated {
                len: envelope.len(),
                min,
            });
        }
        if envelope[0] != ENVELOPE_VERSION {
            return Err(CipherError::UnsupportedVersion(envelope[0]));
        }
        if envelope[1] != self.level.id() {
            return Err(CipherError::AlgorithmMismatch {
                expected: self.level.id(),
                actual: envelope[1],
            });
        }

        let (preamble, rest) = envelope.split_at(PREAMBLE_LEN);
        let (nonce, sealed) = rest.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce).map_err(|_| CipherError::Decrypt)?;

        let mut in_out = sealed.to_vec();
        let len = self
            .key
            .open_in_place(nonce, Aad::from(preamble), &mut in_out)
            .map_err(|_| CipherError::Decrypt)?
            .len();
        in_out.truncate(len);
        Ok(in_out)
    }

    fn algorithm(&self) -> &'static str {
        self.level.algorithm_name()
    }
}

impl fmt::Debug for AeadCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AeadCipher")
            .field("algorithm", &self.level.algorithm_name())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASS: &str = "correct horse battery staple";

    fn cipher(level: SecurityLevel) -> AeadCipher {
        AeadCipher::new(PASS, level, Argon2Profile::Fast).unwrap()
    }

    #[test]
    fn roundtrip_every_level() {
        for level in SecurityLevel::ALL {
            let c = cipher(level);
            let sealed = c.encrypt_raw(b"attack at dawn").unwrap();
            assert_eq!(sealed.len(), HEADER_LEN + 14 + 16);
            assert_eq!(sealed[0], ENVELOPE_VERSION);
            assert_eq!(sealed[1], level.id());
            assert_eq!(c.decrypt_raw(&sealed).unwrap(), b"attack at dawn");
        }
    }

    #[test]
    fn empty_plaintext_still_produces_an_envelope() {
        let c = cipher(SecurityLevel::Medium);
        let sealed = c.encrypt_raw(&[]).unwrap();
        assert_eq!(sealed.len(), HEADER_LEN + 16);
        assert!(c.decrypt_raw(&sealed).unwrap().is_empty());
    }

    #[test]
    fn nonces_differ_between_calls() {
        let c = cipher(SecurityLevel::Medium);
        let a = c.encrypt_raw(b"same").unwrap();
        let b = c.encrypt_raw(b"same").unwrap();
        assert_ne!(a, b);
        assert_ne!(a[PREAMBLE_LEN..HEADER_LEN], b[PREAMBLE_LEN..HEADER_LEN]);
    }

    #[test]
    fn same_passphrase_interoperates() {
        let a = cipher(SecurityLevel::High);
        let b = cipher(SecurityLevel::High);
        let sealed = a.encrypt_raw(b"shared").unwrap();
        assert_eq!(b.decrypt_raw(&sealed).unwrap(), b"shared");
    }

    #[test]
    fn wrong_passphrase_fails_authentication() {
        let a = cipher(SecurityLevel::Medium);
        let b = AeadCipher::new("not the passphrase", SecurityLevel::Medium, Argon2Profile::Fast)
            .unwrap();
        let sealed = a.encrypt_raw(b"secret").unwrap();
        assert_eq!(b.decrypt_raw(&sealed), Err(CipherError::Decrypt));
    }

    #[test]
    fn explicit_salt_changes_the_key() {
        let a = AeadCipher::with_salt(PASS, b"salt-one", SecurityLevel::Low, Argon2Profile::Fast)
            .unwrap();
        let b = AeadCipher::with_salt(PASS, b"salt-two", SecurityLevel::Low, Argon2Profile::Fast)
            .unwrap();
        let sealed = a.encrypt_raw(b"x").unwrap();
        assert_eq!(b.decrypt_raw(&sealed), Err(CipherError::Decrypt));
    }

    #[test]
    fn tampering_is_detected() {
        let c = cipher(SecurityLevel::Medium);
        let sealed = c.encrypt_raw(b"integrity matters").unwrap();

        let mut body = sealed.clone();
        body[HEADER_LEN + 3] ^= 0x01;
        assert_eq!(c.decrypt_raw(&body), Err(CipherError::Decrypt));

        let mut tag = sealed.clone();
        let last = tag.len() - 1;
        tag[last] ^= 0x80;
        assert_eq!(c.decrypt_raw(&tag), Err(CipherError::Decrypt));

        let mut nonce = sealed;
        nonce[PREAMBLE_LEN] ^= 0xff;
        assert_eq!(c.decrypt_raw(&nonce), Err(CipherError::Decrypt));
    }

    #[test]
    fn header_checks() {
        let c = cipher(SecurityLevel::Medium);
        let sealed = c.encrypt_raw(b"hdr").unwrap();

        let mut version = sealed.clone();
        version[0] = 9;
        assert_eq!(c.decrypt_raw(&version), Err(CipherError::UnsupportedVersion(9)));

        let mut alg = sealed.clone();
        alg[1] = SecurityLevel::High.id();
        assert_eq!(
            c.decrypt_raw(&alg),
            Err(CipherError::AlgorithmMismatch {
                expected: SecurityLevel::Medium.id(),
                actual: SecurityLevel::High.id(),
            })
        );

        assert!(matches!(
            c.decrypt_raw(&sealed[..HEADER_LEN]),
            Err(CipherError::Truncated { .. })
        ));
        assert!(matches!(c.decrypt_raw(&[]), Err(CipherError::Truncated { len: 0, .. })));
    }

    #[test]
    fn construction_rejects_bad_inputs() {
        assert_eq!(
            AeadCipher::new("", SecurityLevel::Low, Argon2Profile::Fast).unwrap_err(),
            CipherError::EmptyPassphrase
        );
        assert!(matches!(
            AeadCipher::with_salt(PASS, b"short", SecurityLevel::Low, Argon2Profile::Fast),
            Err(CipherError::KeyDerivation(_))
        ));
    }

    #[test]
    fn debug_redacts_key() {
        let rendered = format!("{:?}", cipher(SecurityLevel::High));
        assert!(rendered.contains("chacha20-poly1305"));
        assert!(rendered.contains("REDACTED"));
    }
}
