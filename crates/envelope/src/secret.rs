//! [`Secret`]: owned AES key bytes decoded from the base64 CLI argument.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::CodecError;
use sha2::{Digest, Sha256};

/// Number of SHA-256 bytes shown in a [`Secret::fingerprint`].
pub const FINGERPRINT_LEN: usize = 8;

/// Raw key material, scoped to a single encode or decode call.
///
/// The length is not checked here: the cipher rejects unsupported lengths
/// when the key is actually used, so a JSON error body can still be decoded
/// with a key of any length. When this type is dropped, the bytes are
/// overwritten with zeroes.
pub struct Secret(Vec<u8>);

impl Secret {
    /// Wrap raw key bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decode a standard-alphabet base64 secret, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidKey`] if the text is not valid base64.
    pub fn from_base64(text: &str) -> Result<Self, CodecError> {
        STANDARD
            .decode(text.trim())
            .map(Self)
            .map_err(|e| CodecError::InvalidKey(format!("secret is not valid base64: {e}")))
    }

    /// Borrow the key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the secret decoded to zero bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hex of the first [`FINGERPRINT_LEN`] bytes of SHA-256 over the key.
    ///
    /// This is the only form in which a secret may appear in output or logs.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.0);
        hex::encode(&digest[..FINGERPRINT_LEN])
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret([REDACTED; {}], {})", self.0.len(), self.fingerprint())
    }
}
