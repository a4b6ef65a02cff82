//! Result types produced by the envelope decoder.
//!
//! A decode either yields a decrypted [`DecodedResult`] or recognises the
//! server's convention of answering failures with a plaintext JSON body
//! ([`ErrorResponse`]). Both are successful outcomes from the codec's point of
//! view.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Decode outcome
// ---------------------------------------------------------------------------

/// Outcome of decoding one input text.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The input was plain JSON, passed through without any AEAD work.
    ErrorResponse(ErrorResponse),
    /// The input was an envelope that decrypted and parsed successfully.
    Envelope(DecodedResult),
}

impl Decoded {
    /// Returns `true` if the input was a plaintext JSON error body.
    pub fn is_error_response(&self) -> bool {
        matches!(self, Decoded::ErrorResponse(_))
    }
}

/// Fields recovered from a decrypted inner body.
///
/// `timestamp_ms` and `nonce` are present for standard bodies and absent for
/// refresh bodies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedResult {
    /// Milliseconds since the Unix epoch, big-endian in the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
    /// Request/response correlation nonce, big-endian in the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    /// Parsed JSON payload, key order preserved.
    pub payload: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Error body pass-through
// ---------------------------------------------------------------------------

/// A plaintext JSON body the server returned in place of an envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    /// The input text exactly as received, minus surrounding whitespace.
    pub raw: String,
    /// The same text parsed as JSON.
    pub json: serde_json::Value,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from its raw text and parsed value.
    pub fn new(raw: impl Into<String>, json: serde_json::Value) -> Self {
        Self {
            raw: raw.into(),
            json,
        }
    }
}
