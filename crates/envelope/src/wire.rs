//! Envelope wire layout.
//!
//! ```text
//! versioned:    0x01 ‖ iv(12) ‖ ciphertext(N) ‖ tag(16)
//! unversioned:         iv(12) ‖ ciphertext(N) ‖ tag(16)
//! ```
//!
//! Request envelopes carry the version byte. Response envelopes produced by
//! the server start directly with the iv.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::{Buf, BufMut, BytesMut};
use common::CodecError;

use crate::crypto::{IV_LEN, TAG_LEN};

/// Version byte at the start of every versioned envelope.
pub const VERSION: u8 = 0x01;

/// Which of the two layouts an envelope uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeFormat {
    /// `0x01 ‖ iv ‖ ciphertext ‖ tag`, used by requests.
    #[default]
    Versioned,
    /// `iv ‖ ciphertext ‖ tag`, used by server responses.
    Unversioned,
}

impl EnvelopeFormat {
    fn header_len(self) -> usize {
        match self {
            EnvelopeFormat::Versioned => 1,
            EnvelopeFormat::Unversioned => 0,
        }
    }

    /// Smallest valid envelope in this layout: an empty ciphertext.
    pub fn min_len(self) -> usize {
        self.header_len() + IV_LEN + TAG_LEN
    }
}

/// A parsed envelope. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

impl Envelope {
    /// Total byte length in the given layout.
    pub fn encoded_len(&self, format: EnvelopeFormat) -> usize {
        format.min_len() + self.ciphertext.len()
    }

    /// Serialise to raw bytes.
    pub fn to_bytes(&self, format: EnvelopeFormat) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(self.encoded_len(format));
        if format == EnvelopeFormat::Versioned {
            buf.put_u8(VERSION);
        }
        buf.put_slice(&self.iv);
        buf.put_slice(&self.ciphertext);
        buf.put_slice(&self.tag);
        buf.to_vec()
    }

    /// Serialise to standard padded base64.
    pub fn to_base64(&self, format: EnvelopeFormat) -> String {
        STANDARD.encode(self.to_bytes(format))
    }

    /// Split raw bytes into iv, ciphertext and tag.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedEnvelope`] if `raw` is shorter than
    /// [`EnvelopeFormat::min_len`] or, for versioned envelopes, does not start
    /// with [`VERSION`].
    pub fn from_bytes(raw: &[u8], format: EnvelopeFormat) -> Result<Self, CodecError> {
        if raw.len() < format.min_len() {
            return Err(CodecError::MalformedEnvelope(format!(
                "envelope too short: {} bytes, need at least {}",
                raw.len(),
                format.min_len()
            )));
        }

        let mut buf = raw;
        if format == EnvelopeFormat::Versioned {
            let version = buf.get_u8();
            if version != VERSION {
                return Err(CodecError::MalformedEnvelope(format!(
                    "unsupported envelope version 0x{version:02x}"
                )));
            }
        }

        let mut iv = [0u8; IV_LEN];
        buf.copy_to_slice(&mut iv);

        let (ciphertext, tag_bytes) = buf.split_at(buf.len() - TAG_LEN);
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(tag_bytes);

        Ok(Self {
            iv,
            ciphertext: ciphertext.to_vec(),
            tag,
        })
    }

    /// Decode standard padded base64 and split it.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedEnvelope`] if `text` is not valid base64 or
    /// the decoded bytes fail [`Envelope::from_bytes`].
    pub fn from_base64(text: &str, format: EnvelopeFormat) -> Result<Self, CodecError> {
        let raw = STANDARD
            .decode(text)
            .map_err(|e| CodecError::MalformedEnvelope(format!("invalid base64: {e}")))?;
        Self::from_bytes(&raw, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            iv: [0xcc; IV_LEN],
            ciphertext: vec![1, 2, 3],
            tag: [0xee; TAG_LEN],
        }
    }

    #[test]
    fn min_lengths() {
        assert_eq!(EnvelopeFormat::Versioned.min_len(), 29);
        assert_eq!(EnvelopeFormat::Unversioned.min_len(), 28);
    }

    #[test]
    fn versioned_layout() {
        let bytes = sample().to_bytes(EnvelopeFormat::Versioned);
        assert_eq!(bytes.len(), 1 + 12 + 3 + 16);
        assert_eq!(bytes[0], VERSION);
        assert_eq!(&bytes[1..13], &[0xcc; IV_LEN]);
        assert_eq!(&bytes[13..16], &[1, 2, 3]);
        assert_eq!(&bytes[16..], &[0xee; TAG_LEN]);
    }

    #[test]
    fn unversioned_layout_has_no_header() {
        let bytes = sample().to_bytes(EnvelopeFormat::Unversioned);
        assert_eq!(bytes.len(), 12 + 3 + 16);
        assert_eq!(&bytes[..12], &[0xcc; IV_LEN]);
    }

    #[test]
    fn parse_recovers_fields_in_both_layouts() {
        for format in [EnvelopeFormat::Versioned, EnvelopeFormat::Unversioned] {
            let text = sample().to_base64(format);
            assert_eq!(Envelope::from_base64(&text, format).unwrap(), sample());
        }
    }

    #[test]
    fn empty_ciphertext_is_valid() {
        let raw = [VERSION; 29];
        let env = Envelope::from_bytes(&raw, EnvelopeFormat::Versioned).unwrap();
        assert!(env.ciphertext.is_empty());
    }

    #[test]
    fn rejects_short_input() {
        let err = Envelope::from_bytes(&[VERSION; 28], EnvelopeFormat::Versioned).unwrap_err();
        assert!(matches!(err, CodecError::MalformedEnvelope(m) if m.contains("too short")));
        assert!(Envelope::from_bytes(&[0u8; 27], EnvelopeFormat::Unversioned).is_err());
        assert!(Envelope::from_bytes(&[], EnvelopeFormat::Unversioned).is_err());
    }

    #[test]
    fn rejects_unknown_version() {
        let mut raw = sample().to_bytes(EnvelopeFormat::Versioned);
        raw[0] = 0x02;
        let err = Envelope::from_bytes(&raw, EnvelopeFormat::Versioned).unwrap_err();
        assert!(matches!(err, CodecError::MalformedEnvelope(m) if m.contains("0x02")));
    }

    #[test]
    fn rejects_bad_base64() {
        let err = Envelope::from_base64("!!!not-base64!!!", EnvelopeFormat::Versioned).unwrap_err();
        assert!(matches!(err, CodecError::MalformedEnvelope(m) if m.contains("base64")));
    }
}
