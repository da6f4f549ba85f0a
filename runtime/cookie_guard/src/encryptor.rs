use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use percent_encoding::percent_decode_str;

use crate::Cookie;
use crate::cookie_::encode_value;
use crate::crypto::{Aes256GcmCipher, Cipher, Key};
use crate::errors::{
    AlreadyProtectedError, DecodeError, EncodeError, NotProtectedError, TamperedError,
};
use crate::marker::Marker;

const SCHEME: &str = "cookie_guard::Encryptor";

/// Encrypt and decrypt cookie values.
///
/// An encrypted value is made of the [`Marker`] for the cookie name followed by the
/// ciphertext, base64url-encoded. The cookie name is used as associated data: a ciphertext
/// moved to a different cookie fails both the marker check and authentication.
///
/// ```rust
/// use cookie_guard::{Cookie, Encryptor, crypto::Key};
///
/// let encryptor = Encryptor::new(Key::try_from_bytes("a secret key").unwrap());
/// let cookie = Cookie::new("token", "raw123").unwrap();
///
/// let encrypted = encryptor.encode(&cookie).unwrap();
/// assert!(encryptor.is_protected(&encrypted));
/// assert_ne!(encrypted.value(), "raw123");
///
/// let decrypted = encryptor.decode(&encrypted).unwrap();
/// assert_eq!(decrypted.value(), "raw123");
/// ```
#[derive(Clone)]
pub struct Encryptor {
    key: Key,
    cipher: Arc<dyn Cipher>,
}

impl Encryptor {
    /// Encrypt with AES-256-GCM, see [`Aes256GcmCipher`].
    pub fn new(key: Key) -> Self {
        Self::with_cipher(key, Aes256GcmCipher)
    }

    /// Encrypt with a custom [`Cipher`].
    pub fn with_cipher<C>(key: Key, cipher: C) -> Self
    where
        C: Cipher + 'static,
    {
        Self {
            key,
            cipher: Arc::new(cipher),
        }
    }

    /// The marker prepended to encrypted values of the cookie named `cookie_name`.
    pub fn marker(&self, cookie_name: &str) -> Marker {
        Marker::new(SCHEME, cookie_name)
    }

    /// Returns `true` if the cookie value looks like the output of [`Encryptor::encode`].
    ///
    /// It only checks the marker, no decryption is attempted.
    pub fn is_protected(&self, cookie: &Cookie) -> bool {
        self.marker(cookie.name()).prefixes(cookie.value())
    }

    /// Encrypt the cookie value.
    ///
    /// It fails if the value is already encrypted.
    pub fn encode(&self, cookie: &Cookie) -> Result<Cookie, EncodeError> {
        if self.is_protected(cookie) {
            return Err(AlreadyProtectedError {
                name: cookie.name().to_owned(),
            }
            .into());
        }
        let ciphertext = self
            .cipher
            .encrypt(
                cookie.value().as_bytes(),
                &self.key,
                cookie.name().as_bytes(),
            )
            .map_err(|source| EncodeError::Encryption {
                name: cookie.name().to_owned(),
                source,
            })?;
        let payload = encode_value(&URL_SAFE_NO_PAD.encode(ciphertext));
        let marker = self.marker(cookie.name());
        Ok(cookie.with_raw_value(format!("{}{payload}", marker.as_str())))
    }

    /// Decrypt the cookie value.
    ///
    /// It fails with [`DecodeError::NotProtected`] if the value doesn't carry the marker
    /// for this cookie name and with [`DecodeError::Tampered`] if decryption fails.
    pub fn decode(&self, cookie: &Cookie) -> Result<Cookie, DecodeError> {
        let name = cookie.name();
        let marker = self.marker(name);
        let payload = match marker.strip(cookie.value()) {
            Some(payload) if !payload.is_empty() => payload,
            _ => {
                return Err(NotProtectedError {
                    name: name.to_owned(),
                }
                .into());
            }
        };
        let tampered = || TamperedError {
            name: name.to_owned(),
        };

        let payload = percent_decode_str(payload)
            .decode_utf8()
            .map_err(|_| tampered())?;
        let ciphertext = URL_SAFE_NO_PAD
            .decode(payload.as_bytes())
            .map_err(|_| tampered())?;
        let plaintext = self
            .cipher
            .decrypt(&ciphertext, &self.key, name.as_bytes())
            .map_err(|_| tampered())?;
        let plaintext = String::from_utf8(plaintext).map_err(|_| tampered())?;
        Ok(cookie.with_value(plaintext))
    }
}

impl fmt::Debug for Encryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encryptor")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
