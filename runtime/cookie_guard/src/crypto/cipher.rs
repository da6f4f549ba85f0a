use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use hkdf::Hkdf;
use sha2::Sha256;

use super::Key;
use crate::errors::{AuthenticationFailed, EncryptionFailed};

/// A symmetric authenticated encryption scheme.
pub trait Cipher: Send + Sync {
    /// Encrypt `plaintext`, binding `associated_data` to the ciphertext.
    fn encrypt(
        &self,
        plaintext: &[u8],
        key: &Key,
        associated_data: &[u8],
    ) -> Result<Vec<u8>, EncryptionFailed>;

    /// Decrypt a ciphertext produced by [`Cipher::encrypt`].
    ///
    /// It fails if the ciphertext was modified, or if `key` or `associated_data`
    /// don't match the ones used for encryption.
    fn decrypt(
        &self,
        ciphertext: &[u8],
        key: &Key,
        associated_data: &[u8],
    ) -> Result<Vec<u8>, AuthenticationFailed>;
}

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const HKDF_INFO: &[u8] = b"cookie_guard/aes-256-gcm";

/// AES-256-GCM, with a fresh key derived via HKDF-SHA256 for every message.
///
/// The output is laid out as `salt || nonce || ciphertext || tag`.
/// Both salt and nonce are random, so encrypting the same value twice
/// yields two different ciphertexts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes256GcmCipher;

impl Aes256GcmCipher {
    fn derive(key: &Key, salt: &[u8]) -> Option<Aes256Gcm> {
        let hk = Hkdf::<Sha256>::new(Some(salt), key.expose());
        let mut derived = [0u8; 32];
        hk.expand(HKDF_INFO, &mut derived).ok()?;
        Aes256Gcm::new_from_slice(&derived).ok()
    }
}

impl Cipher for Aes256GcmCipher {
    fn encrypt(
        &self,
        plaintext: &[u8],
        key: &Key,
        associated_data: &[u8],
    ) -> Result<Vec<u8>, EncryptionFailed> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let cipher = Self::derive(key, &salt).ok_or(EncryptionFailed)?;
        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad: associated_data,
                },
            )
            .map_err(|_| EncryptionFailed)?;

        let mut out = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&salt);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    fn decrypt(
        &self,
        ciphertext: &[u8],
        key: &Key,
        associated_data: &[u8],
    ) -> Result<Vec<u8>, AuthenticationFailed> {
        if ciphertext.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
            return Err(AuthenticationFailed);
        }
        let (salt, rest) = ciphertext.split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let cipher = Self::derive(key, salt).ok_or(AuthenticationFailed)?;
        cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: associated_data,
                },
            )
            .map_err(|_| AuthenticationFailed)
    }
}
