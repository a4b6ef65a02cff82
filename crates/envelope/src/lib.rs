//! AES-GCM envelope codec.
//!
//! An envelope is `0x01 ‖ iv(12) ‖ ciphertext ‖ tag(16)`, carried as standard
//! base64 text. The sealed plaintext is an [`InnerBody`]: either a standard
//! body with a big-endian millisecond timestamp and nonce ahead of a UTF-8
//! JSON payload, or a refresh body carrying the payload alone.
//!
//! ```text
//! encode: (secret, timestamp, nonce, payload, iv) → body → seal → envelope → base64
//! decode: text ─ JSON? ─ yes → ErrorResponse
//!                     └ no  → base64 → envelope → open → body → DecodedResult
//! ```

pub mod body;
pub mod codec;
pub mod crypto;
pub mod secret;
pub mod wire;

pub use body::{BodyKind, InnerBody};
pub use codec::{decode, decode_with, encode, encode_body, encode_traced, DecodeOptions, EncodeTrace};
pub use common::{CodecError, Decoded, DecodedResult, ErrorResponse};
pub use crypto::{random_iv, random_nonce, IV_LEN, TAG_LEN};
pub use secret::Secret;
pub use wire::{Envelope, EnvelopeFormat, VERSION};
