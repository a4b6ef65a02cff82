//! Envelope encode and decode operations.
//!
//! Both directions are single-shot and synchronous. Either the whole operation
//! succeeds or a [`CodecError`] is returned and nothing partial escapes.

use common::{CodecError, Decoded, DecodedResult, ErrorResponse};
use tracing::debug;

use crate::body::{BodyKind, InnerBody};
use crate::crypto::{self, IV_LEN};
use crate::wire::{Envelope, EnvelopeFormat};

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Every intermediate value of one encode, for diagnostic dumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeTrace {
    /// Plaintext inner body that was sealed.
    pub body: Vec<u8>,
    /// The sealed envelope.
    pub envelope: Envelope,
    /// Versioned envelope bytes.
    pub bytes: Vec<u8>,
    /// Base64 of [`EncodeTrace::bytes`]; the encoder's output.
    pub text: String,
}

/// Encode a standard request envelope and return its base64 text.
///
/// The iv must be unique per secret; reuse is not detected.
///
/// # Errors
///
/// Returns [`CodecError::InvalidKey`] if `secret` is not 16, 24 or 32 bytes.
pub fn encode(
    secret: &[u8],
    timestamp_ms: i64,
    nonce: u64,
    payload: &str,
    iv: &[u8; IV_LEN],
) -> Result<String, CodecError> {
    encode_traced(secret, timestamp_ms, nonce, payload, iv).map(|t| t.text)
}

/// Like [`encode`] but keeps every intermediate value.
///
/// # Errors
///
/// Returns [`CodecError::InvalidKey`] if `secret` is not 16, 24 or 32 bytes.
pub fn encode_traced(
    secret: &[u8],
    timestamp_ms: i64,
    nonce: u64,
    payload: &str,
    iv: &[u8; IV_LEN],
) -> Result<EncodeTrace, CodecError> {
    encode_body(secret, &InnerBody::standard(timestamp_ms, nonce, payload), iv)
}

/// Seal an arbitrary [`InnerBody`] into a versioned envelope.
///
/// # Errors
///
/// Returns [`CodecError::InvalidKey`] if `secret` is not 16, 24 or 32 bytes.
pub fn encode_body(
    secret: &[u8],
    body: &InnerBody,
    iv: &[u8; IV_LEN],
) -> Result<EncodeTrace, CodecError> {
    let plaintext = body.to_bytes();
    let sealed = crypto::cipher::seal(&plaintext, secret, iv)?;

    let envelope = Envelope {
        iv: *iv,
        ciphertext: sealed.ciphertext,
        tag: sealed.tag,
    };
    let bytes = envelope.to_bytes(EnvelopeFormat::Versioned);
    let text = envelope.to_base64(EnvelopeFormat::Versioned);

    debug!(
        kind = ?body.kind(),
        body_len = plaintext.len(),
        envelope_len = bytes.len(),
        "envelope encoded"
    );

    Ok(EncodeTrace {
        body: plaintext,
        envelope,
        bytes,
        text,
    })
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Knobs for [`decode_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// Body layout to expect after decryption.
    pub kind: BodyKind,
    /// Envelope layout of the input.
    pub format: EnvelopeFormat,
    /// If set, a standard body's nonce must equal this value.
    pub expected_nonce: Option<u64>,
}

impl DecodeOptions {
    pub fn new(is_refresh: bool) -> Self {
        Self {
            kind: BodyKind::from_refresh_flag(is_refresh),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: EnvelopeFormat) -> Self {
        self.format = format;
        self
    }

    pub fn expecting_nonce(mut self, nonce: u64) -> Self {
        self.expected_nonce = Some(nonce);
        self
    }
}

/// Decode a versioned envelope, or pass through a plaintext JSON error body.
///
/// # Errors
///
/// See [`decode_with`].
pub fn decode(secret: &[u8], input: &str, is_refresh: bool) -> Result<Decoded, CodecError> {
    decode_with(secret, input, &DecodeOptions::new(is_refresh))
}

/// Decode `input` with explicit options.
///
/// If the whitespace-trimmed input parses as JSON it is returned as
/// [`Decoded::ErrorResponse`] and `secret` is never used.
///
/// # Errors
///
/// - [`CodecError::MalformedEnvelope`]: bad base64, too short, wrong version byte.
/// - [`CodecError::InvalidKey`]: `secret` is not 16, 24 or 32 bytes.
/// - [`CodecError::Authentication`]: the tag did not verify.
/// - [`CodecError::PayloadDecode`]: body too short, not UTF-8, or not JSON.
/// - [`CodecError::NonceMismatch`]: `expected_nonce` was set and differs.
pub fn decode_with(
    secret: &[u8],
    input: &str,
    opts: &DecodeOptions,
) -> Result<Decoded, CodecError> {
    let text = input.trim();

    if let Some(json) = parse_json(text) {
        debug!("input is a plaintext JSON error body");
        return Ok(Decoded::ErrorResponse(ErrorResponse::new(text, json)));
    }

    let envelope = Envelope::from_base64(text, opts.format)?;
    debug!(
        format = ?opts.format,
        ciphertext_len = envelope.ciphertext.len(),
        "envelope parsed"
    );

    let plaintext = crypto::cipher::open(&envelope.ciphertext, &envelope.tag, secret, &envelope.iv)?;
    let body = InnerBody::parse(&plaintext, opts.kind)?;

    if let (Some(expected), Some(actual)) = (opts.expected_nonce, body.nonce()) {
        if expected != actual {
            return Err(CodecError::NonceMismatch { expected, actual });
        }
    }

    let payload = body.payload_json()?;
    debug!(kind = ?opts.kind, "envelope decoded");

    Ok(Decoded::Envelope(DecodedResult {
        timestamp_ms: body.timestamp_ms(),
        nonce: body.nonce(),
        payload,
    }))
}

/// The error-body predicate: `Some` iff `text` is a complete JSON document.
fn parse_json(text: &str) -> Option<serde_json::Value> {
    serde_json::from_str(text).ok()
}
