use std::fmt;
use std::sync::Arc;

use crate::Cookie;
use crate::crypto::{HmacAuthenticator, Key, MacAlgorithm, MessageAuthenticator};
use crate::errors::{
    AlreadyProtectedError, DecodeError, EncodeError, NotProtectedError, TamperedError,
};
use crate::marker::Marker;

const SCHEME: &str = "cookie_guard::Signer";

/// Sign cookie values and validate signed cookie values.
///
/// A signed value looks like `<marker><tag><marker><value>`:
/// the authenticated message is the marker followed by the original value,
/// so a signature issued for one cookie name can't be replayed under another.
/// The original value stays readable by the client.
///
/// ```rust
/// use cookie_guard::{Cookie, Signer, crypto::Key};
///
/// let signer = Signer::new(Key::try_from_bytes("a secret key").unwrap());
/// let cookie = Cookie::new("language", "en").unwrap();
///
/// let signed = signer.sign(&cookie).unwrap();
/// assert!(signer.is_signed(&signed));
/// assert!(signed.value().ends_with("en"));
///
/// let validated = signer.validate(&signed).unwrap();
/// assert_eq!(validated.value(), "en");
/// ```
#[derive(Clone)]
pub struct Signer {
    key: Key,
    authenticator: Arc<dyn MessageAuthenticator>,
}

impl Signer {
    /// Sign with HMAC-SHA256.
    pub fn new(key: Key) -> Self {
        Self::with_algorithm(key, MacAlgorithm::default())
    }

    /// Sign with HMAC, using the given hash function.
    pub fn with_algorithm(key: Key, algorithm: MacAlgorithm) -> Self {
        Self::with_authenticator(key, HmacAuthenticator::new(algorithm))
    }

    /// Sign with a custom [`MessageAuthenticator`].
    pub fn with_authenticator<A>(key: Key, authenticator: A) -> Self
    where
        A: MessageAuthenticator + 'static,
    {
        Self {
            key,
            authenticator: Arc::new(authenticator),
        }
    }

    /// The marker prepended to signed values of the cookie named `cookie_name`.
    pub fn marker(&self, cookie_name: &str) -> Marker {
        Marker::new(SCHEME, cookie_name)
    }

    /// Returns `true` if the cookie value looks like the output of [`Signer::sign`].
    ///
    /// It only checks the marker, the signature is not verified.
    pub fn is_signed(&self, cookie: &Cookie) -> bool {
        self.marker(cookie.name()).prefixes(cookie.value())
    }

    /// Sign the cookie value.
    ///
    /// It fails if the value is already signed.
    pub fn sign(&self, cookie: &Cookie) -> Result<Cookie, EncodeError> {
        if self.is_signed(cookie) {
            return Err(AlreadyProtectedError {
                name: cookie.name().to_owned(),
            }
            .into());
        }
        let marker = self.marker(cookie.name());
        let message = format!("{}{}", marker.as_str(), cookie.value());
        let envelope = self
            .authenticator
            .sign(&message, &self.key)
            .map_err(|source| EncodeError::Signing {
                name: cookie.name().to_owned(),
                source,
            })?;
        Ok(cookie.with_value(format!("{}{envelope}", marker.as_str())))
    }

    /// Verify the signature and recover the original cookie value.
    ///
    /// It fails with [`DecodeError::NotProtected`] if the value doesn't carry the marker
    /// for this cookie name and with [`DecodeError::Tampered`] if the signature doesn't
    /// check out.
    pub fn validate(&self, cookie: &Cookie) -> Result<Cookie, DecodeError> {
        let name = cookie.name();
        let marker = self.marker(name);
        let envelope = match marker.strip(cookie.value()) {
            Some(envelope) if !envelope.is_empty() => envelope,
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

        let message = self
            .authenticator
            .extract(envelope, &self.key)
            .map_err(|_| tampered())?;
        // The authenticated message must be bound to this cookie name.
        let value = marker.strip(&message).ok_or_else(tampered)?;
        Ok(cookie.with_value(value))
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
