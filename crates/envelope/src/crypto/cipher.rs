//! AES-GCM sealing and opening of envelope bodies.
//!
//! The key length selects the cipher: 16 bytes → AES-128-GCM, 24 → AES-192-GCM,
//! 32 → AES-256-GCM. The iv is always 96 bits and the tag always 128 bits, and
//! no associated data is bound.
//!
//! **The iv must never repeat under the same key.** GCM nonce reuse breaks both
//! confidentiality and authentication. This layer does not track ivs; callers
//! either pass a fresh [`random_iv`] or a pinned test-vector iv.

use aes_gcm::{
    aead::{
        generic_array::{typenum::U12, GenericArray},
        rand_core::RngCore,
        AeadInPlace, KeyInit, OsRng,
    },
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm,
};
use thiserror::Error;

/// Byte length of the GCM iv (12 bytes = 96 bits).
pub const IV_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Key lengths accepted by [`seal`] and [`open`].
pub const KEY_LENS: [usize; 3] = [16, 24, 32];

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The key is not one of the [`KEY_LENS`].
    #[error("invalid key length: expected 16, 24 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// AES-GCM encryption or tag verification failed.
    #[error("aead operation failed")]
    AeadFailure,
}

/// Ciphertext and detached tag produced by [`seal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Encrypted bytes, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// GCM authentication tag.
    pub tag: [u8; TAG_LEN],
}

/// Encrypt `plaintext` under `key` and `iv`.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not 16, 24 or 32 bytes.
/// Returns [`CipherError::AeadFailure`] on an internal AEAD error (only reachable
/// for plaintexts beyond the GCM length limit).
pub fn seal(plaintext: &[u8], key: &[u8], iv: &[u8; IV_LEN]) -> Result<Sealed, CipherError> {
    let cipher = GcmCipher::new(key)?;
    let mut ciphertext = plaintext.to_vec();
    let tag = cipher.encrypt_detached(iv, &mut ciphertext)?;
    Ok(Sealed { ciphertext, tag })
}

/// Decrypt `ciphertext` under `key` and `iv`, verifying `tag`.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not 16, 24 or 32 bytes.
/// Returns [`CipherError::AeadFailure`] if the tag does not verify (wrong key or
/// tampered data).
pub fn open(
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
    key: &[u8],
    iv: &[u8; IV_LEN],
) -> Result<Vec<u8>, CipherError> {
    let cipher = GcmCipher::new(key)?;
    let mut plaintext = ciphertext.to_vec();
    cipher.decrypt_detached(iv, &mut plaintext, tag)?;
    Ok(plaintext)
}

/// Draw a fresh iv from the OS CSPRNG.
pub fn random_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Draw a fresh 64-bit body nonce from the OS CSPRNG.
pub fn random_nonce() -> u64 {
    OsRng.next_u64()
}

/// AES-GCM keyed with whichever AES variant the key length selects.
enum GcmCipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl GcmCipher {
    fn new(key: &[u8]) -> Result<Self, CipherError> {
        let invalid = |_| CipherError::InvalidKeyLength(key.len());
        match key.len() {
            16 => Aes128Gcm::new_from_slice(key).map(Self::Aes128).map_err(invalid),
            24 => Aes192Gcm::new_from_slice(key).map(Self::Aes192).map_err(invalid),
            32 => Aes256Gcm::new_from_slice(key).map(Self::Aes256).map_err(invalid),
            n => Err(CipherError::InvalidKeyLength(n)),
        }
    }

    fn encrypt_detached(
        &self,
        iv: &[u8; IV_LEN],
        buffer: &mut [u8],
    ) -> Result<[u8; TAG_LEN], CipherError> {
        let nonce = GenericArray::from_slice(iv);
        let tag = match self {
            Self::Aes128(c) => c.encrypt_in_place_detached(nonce, b"", buffer),
            Self::Aes192(c) => c.encrypt_in_place_detached(nonce, b"", buffer),
            Self::Aes256(c) => c.encrypt_in_place_detached(nonce, b"", buffer),
        }
        .map_err(|_| CipherError::AeadFailure)?;

        let mut out = [0u8; TAG_LEN];
        out.copy_from_slice(tag.as_slice());
        Ok(out)
    }

    fn decrypt_detached(
        &self,
        iv: &[u8; IV_LEN],
        buffer: &mut [u8],
        tag: &[u8; TAG_LEN],
    ) -> Result<(), CipherError> {
        let nonce = GenericArray::from_slice(iv);
        let tag = GenericArray::from_slice(tag);
        match self {
            Self::Aes128(c) => c.decrypt_in_place_detached(nonce, b"", buffer, tag),
            Self::Aes192(c) => c.decrypt_in_place_detached(nonce, b"", buffer, tag),
            Self::Aes256(c) => c.decrypt_in_place_detached(nonce, b"", buffer, tag),
        }
        .map_err(|_| CipherError::AeadFailure)
    }
}
