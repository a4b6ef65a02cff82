//! AES-GCM primitives for envelope bodies.
//!
//! This module knows nothing about the envelope layout or the inner body. It
//! seals and opens byte buffers with a detached 16-byte tag.

pub mod cipher;

pub use cipher::{random_iv, random_nonce, CipherError, Sealed, IV_LEN, KEY_LENS, TAG_LEN};

use common::CodecError;

impl From<CipherError> for CodecError {
    fn from(e: CipherError) -> Self {
        match e {
            CipherError::InvalidKeyLength(_) => CodecError::InvalidKey(e.to_string()),
            CipherError::AeadFailure => CodecError::Authentication,
        }
    }
}
