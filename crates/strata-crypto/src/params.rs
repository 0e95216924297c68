use std::fmt;

use argon2::{Algorithm, Argon2, Params, Version};
use ring::aead;
use serde::{Deserialize, Serialize};

use crate::error::{CipherError, CipherResult};

// ---------------------------------------------------------------------------
// SecurityLevel
// ---------------------------------------------------------------------------

/// Selects the AEAD algorithm.
///
/// | Level | Algorithm | Key |
/// |-------|-----------|-----|
/// | `Low` | AES-128-GCM | 128-bit |
/// | `Medium` | AES-256-GCM | 256-bit |
/// | `High` | ChaCha20-Poly1305 | 256-bit |
///
/// All three use a 96-bit nonce and a 128-bit tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl SecurityLevel {
    pub const ALL: [SecurityLevel; 3] = [Self::Low, Self::Medium, Self::High];

    pub(crate) fn aead(&self) -> &'static aead::Algorithm {
        match self {
            Self::Low => &aead::AES_128_GCM,
            Self::Medium => &aead::AES_256_GCM,
            Self::High => &aead::CHACHA20_POLY1305,
        }
    }

    /// Algorithm name for diagnostics.
    pub fn algorithm_name(&self) -> &'static str {
        match self {
            Self::Low => "aes-128-gcm",
            Self::Medium => "aes-256-gcm",
            Self::High => "chacha20-poly1305",
        }
    }

    /// Identifier written into the envelope header.
    pub fn id(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Key length in bytes.
    pub fn key_len(&self) -> usize {
        self.aead().key_len()
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

// ---------------------------------------------------------------------------
// Argon2Profile
// ---------------------------------------------------------------------------

/// Argon2id cost profile used to stretch the passphrase into a key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Argon2Profile {
    /// 4 MiB, 1 pass. For tests and short-lived processes.
    Fast,
    /// 19 MiB, 2 passes.
    #[default]
    Balanced,
    /// 64 MiB, 3 passes, 2 lanes.
    Hardened,
}

impl Argon2Profile {
    /// `(memory KiB, iterations, lanes)`.
    pub fn costs(&self) -> (u32, u32, u32) {
        match self {
            Self::Fast => (4 * 1024, 1, 1),
            Self::Balanced => (19 * 1024, 2, 1),
            Self::Hardened => (64 * 1024, 3, 2),
        }
    }

    pub(crate) fn argon2(&self, output_len: usize) -> CipherResult<Argon2<'static>> {
        let (m_cost, t_cost, p_cost) = self.costs();
        let params = Params::new(m_cost, t_cost, p_cost, Some(output_len))
            .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl fmt::Display for Argon2Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Hardened => "hardened",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ids_are_distinct() {
        let ids: Vec<u8> = SecurityLevel::ALL.iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn key_lengths() {
        assert_eq!(SecurityLevel::Low.key_len(), 16);
        assert_eq!(SecurityLevel::Medium.key_len(), 32);
        assert_eq!(SecurityLevel::High.key_len(), 32);
    }

    #[test]
    fn defaults() {
        assert_eq!(SecurityLevel::default(), SecurityLevel::Medium);
        assert_eq!(Argon2Profile::default(), Argon2Profile::Balanced);
    }

    #[test]
    fn profiles_build_valid_params() {
        for profile in [Argon2Profile::Fast, Argon2Profile::Balanced, Argon2Profile::Hardened] {
            assert!(profile.argon2(32).is_ok(), "{profile}");
        }
    }

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&SecurityLevel::High).unwrap(), "\"high\"");
        let p: Argon2Profile = serde_json::from_str("\"hardened\"").unwrap();
        assert_eq!(p, Argon2Profile::Hardened);
        assert_eq!(p.to_string(), "hardened");
    }
}
