//! Error taxonomy shared by the codec library and both CLIs.

use thiserror::Error;

/// Top-level codec error type.
///
/// Variants map to process exit codes returned by the CLIs:
/// - [`CodecError::InvalidKey`] → 2
/// - [`CodecError::MalformedEnvelope`] → 3
/// - [`CodecError::Authentication`] → 4
/// - [`CodecError::PayloadDecode`] → 5
/// - [`CodecError::NonceMismatch`] → 6
///
/// A JSON error body returned by the server is not an error; see
/// [`crate::protocol::Decoded::ErrorResponse`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The secret is not valid base64, or decodes to a key length AES-GCM does not support.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The input is not valid base64, is too short, or carries an unknown version byte.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// GCM tag verification failed: wrong key, corrupted data, or a truncated envelope.
    #[error("authentication failed: envelope tag did not verify")]
    Authentication,

    /// The decrypted body is too short, not UTF-8, or not JSON.
    #[error("payload decode failed: {0}")]
    PayloadDecode(String),

    /// The nonce inside a response body differs from the nonce sent in the request.
    #[error("nonce mismatch: expected {expected:016x}, got {actual:016x}")]
    NonceMismatch { expected: u64, actual: u64 },
}

impl CodecError {
    /// Returns the process exit code that should be used for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CodecError::InvalidKey(_) => 2,
            CodecError::MalformedEnvelope(_) => 3,
            CodecError::Authentication => 4,
            CodecError::PayloadDecode(_) => 5,
            CodecError::NonceMismatch { .. } => 6,
        }
    }
}
