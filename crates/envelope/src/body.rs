//! Inner body: the plaintext sealed inside an envelope.
//!
//! ```text
//! standard: timestamp_ms(8, BE) ‖ nonce(8, BE) ‖ payload(UTF-8)
//! refresh:  payload(UTF-8)
//! ```

use bytes::{Buf, BufMut, BytesMut};
use common::CodecError;

/// Byte length of the big-endian millisecond timestamp.
pub const TIMESTAMP_LEN: usize = 8;

/// Byte length of the big-endian body nonce.
pub const NONCE_LEN: usize = 8;

/// Header length of a standard body.
pub const HEADER_LEN: usize = TIMESTAMP_LEN + NONCE_LEN;

/// Which body layout to expect when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyKind {
    #[default]
    Standard,
    Refresh,
}

impl BodyKind {
    /// Map the CLI's `--is-refresh` flag to a body kind.
    pub fn from_refresh_flag(is_refresh: bool) -> Self {
        if is_refresh {
            BodyKind::Refresh
        } else {
            BodyKind::Standard
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InnerBody {
    Standard {
        timestamp_ms: i64,
        nonce: u64,
        payload: String,
    },
    Refresh {
        payload: String,
    },
}

impl InnerBody {
    pub fn standard(timestamp_ms: i64, nonce: u64, payload: impl Into<String>) -> Self {
        InnerBody::Standard {
            timestamp_ms,
            nonce,
            payload: payload.into(),
        }
    }

    pub fn refresh(payload: impl Into<String>) -> Self {
        InnerBody::Refresh {
            payload: payload.into(),
        }
    }

    pub fn kind(&self) -> BodyKind {
        match self {
            InnerBody::Standard { .. } => BodyKind::Standard,
            InnerBody::Refresh { .. } => BodyKind::Refresh,
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            InnerBody::Standard { payload, .. } | InnerBody::Refresh { payload } => payload,
        }
    }

    pub fn timestamp_ms(&self) -> Option<i64> {
        match self {
            InnerBody::Standard { timestamp_ms, .. } => Some(*timestamp_ms),
            InnerBody::Refresh { .. } => None,
        }
    }

    pub fn nonce(&self) -> Option<u64> {
        match self {
            InnerBody::Standard { nonce, .. } => Some(*nonce),
            InnerBody::Refresh { .. } => None,
        }
    }

    /// Serialise to the plaintext that gets sealed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let payload = self.payload().as_bytes();
        let mut buf = BytesMut::with_capacity(HEADER_LEN + payload.len());
        if let InnerBody::Standard {
            timestamp_ms,
            nonce,
            ..
        } = self
        {
            buf.put_i64(*timestamp_ms);
            buf.put_u64(*nonce);
        }
        buf.put_slice(payload);
        buf.to_vec()
    }

    /// Parse decrypted plaintext as the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::PayloadDecode`] if a standard body is shorter than
    /// [`HEADER_LEN`] or the payload bytes are not UTF-8.
    pub fn parse(bytes: &[u8], kind: BodyKind) -> Result<Self, CodecError> {
        match kind {
            BodyKind::Refresh => Ok(InnerBody::refresh(utf8(bytes)?)),
            BodyKind::Standard => {
                if bytes.len() < HEADER_LEN {
                    return Err(CodecError::PayloadDecode(format!(
                        "body too short: {} bytes, need at least {HEADER_LEN}",
                        bytes.len()
                    )));
                }
                let mut buf = bytes;
                let timestamp_ms = buf.get_i64();
                let nonce = buf.get_u64();
                Ok(InnerBody::standard(timestamp_ms, nonce, utf8(buf)?))
            }
        }
    }

    /// Parse the payload text as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::PayloadDecode`] if the payload is not valid JSON.
    pub fn payload_json(&self) -> Result<serde_json::Value, CodecError> {
        serde_json::from_str(self.payload())
            .map_err(|e| CodecError::PayloadDecode(format!("payload is not valid JSON: {e}")))
    }
}

fn utf8(bytes: &[u8]) -> Result<String, CodecError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| CodecError::PayloadDecode(format!("payload is not valid UTF-8: {e}")))
}
