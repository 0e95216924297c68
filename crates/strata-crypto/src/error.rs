use thiserror::Error;

/// Errors from cipher construction and use.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("passphrase cannot be empty")]
    EmptyPassphrase,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("derived key rejected by the cipher")]
    InvalidKey,

    #[error("encryption failed")]
    Encrypt,

    /// Authentication failed: wrong key, or the ciphertext was modified.
    #[error("decryption failed: ciphertext is corrupt or the key is wrong")]
    Decrypt,

    #[error("ciphertext too short: {len} bytes, need at least {min}")]
    Truncated { len: usize, min: usize },

    #[error("unsupported envelope version: {0}")]
    UnsupportedVersion(u8),

    #[error("algorithm mismatch: cipher uses id {expected}, envelope has id {actual}")]
    AlgorithmMismatch { expected: u8, actual: u8 },

    #[error("random number generator failure: {0}")]
    Rng(String),
}

pub type CipherResult<T> = Result<T, CipherError>;
