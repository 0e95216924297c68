use crate::error::CipherResult;

/// Symmetric encryption backend.
///
/// Constructed once (key derivation happens up front) and then used for
/// any number of calls. Implementations must authenticate their output:
/// a modified ciphertext fails to decrypt rather than producing different
/// plaintext.
pub trait Cipher: Send + Sync {
    /// Encrypt `plaintext` into a self-contained envelope.
    fn encrypt_raw(&self, plaintext: &[u8]) -> CipherResult<Vec<u8>>;

    /// Decrypt an envelope produced by [`Cipher::encrypt_raw`].
    fn decrypt_raw(&self, ciphertext: &[u8]) -> CipherResult<Vec<u8>>;

    /// Algorithm name for diagnostics, e.g. `"aes-256-gcm"`.
    fn algorithm(&self) -> &'static str;
}
