//! Errors that can occur when building, protecting or unprotecting cookies.
use http::header::ToStrError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
/// A cookie, or one of its attributes, doesn't follow the expected format.
///
/// Returned by [`Cookie::new`](crate::Cookie::new), [`Cookie::with_path`](crate::Cookie::with_path),
/// [`Cookie::with_domain`](crate::Cookie::with_domain),
/// [`Cookie::parse`](crate::Cookie::parse) and the [`SameSite`](crate::SameSite) parser.
pub enum InvalidFormatError {
    #[error(transparent)]
    InvalidName(#[from] InvalidNameError),
    #[error(transparent)]
    InvalidPath(#[from] InvalidPathError),
    #[error(transparent)]
    InvalidDomain(#[from] InvalidDomainError),
    #[error(transparent)]
    InvalidSameSite(#[from] InvalidSameSiteError),
    #[error("The cookie string doesn't start with a `name=value` pair: `{cookie_string}`")]
    MissingPair {
        /// The string we tried to parse.
        cookie_string: String,
    },
    #[error("The `Expires` attribute of the `{name}` cookie is not a valid HTTP date: `{value}`")]
    InvalidExpires {
        /// The name of the cookie.
        name: String,
        /// The raw attribute value.
        value: String,
    },
    #[error(
        "The `Max-Age` attribute of the `{name}` cookie is not a valid number of seconds: `{value}`"
    )]
    InvalidMaxAge {
        /// The name of the cookie.
        name: String,
        /// The raw attribute value.
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
#[error(
    "`{name}` is not a valid cookie name. \
    It must be non-empty and only contain ASCII letters, digits and `!#$%&'*+-.^_`|~`"
)]
/// The cookie name violates the token grammar.
pub struct InvalidNameError {
    /// The rejected name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
#[error("The path of the `{name}` cookie contains control characters or `;`: `{path}`")]
/// The `Path` attribute contains forbidden characters.
pub struct InvalidPathError {
    /// The name of the cookie.
    pub name: String,
    /// The rejected path.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
#[error("The domain of the `{name}` cookie contains control characters or `;`: `{domain}`")]
/// The `Domain` attribute contains forbidden characters.
pub struct InvalidDomainError {
    /// The name of the cookie.
    pub name: String,
    /// The rejected domain.
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
#[error("`{value}` is not a valid `SameSite` mode. Expected one of `Lax`, `Strict` or `None`")]
/// The `SameSite` attribute is neither `Lax`, `Strict` nor `None`.
pub struct InvalidSameSiteError {
    /// The rejected value.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
#[error("The value of the `{name}` cookie is already protected")]
/// [`Encryptor::encode`](crate::Encryptor::encode) or [`Signer::sign`](crate::Signer::sign)
/// was called on a cookie whose value carries their marker.
pub struct AlreadyProtectedError {
    /// The name of the cookie.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
#[error("The value of the `{name}` cookie is not protected")]
/// The cookie value doesn't carry the marker we expected for its name.
pub struct NotProtectedError {
    /// The name of the cookie.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
#[error("The value of the `{name}` cookie was tampered with")]
/// The cookie value carries the right marker, but it failed authentication.
pub struct TamperedError {
    /// The name of the cookie.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
/// The error type returned by [`Encryptor::encode`](crate::Encryptor::encode)
/// and [`Signer::sign`](crate::Signer::sign).
pub enum EncodeError {
    #[error(transparent)]
    AlreadyProtected(#[from] AlreadyProtectedError),
    #[error("Failed to encrypt the value of the `{name}` cookie")]
    Encryption {
        /// The name of the cookie.
        name: String,
        #[source]
        source: EncryptionFailed,
    },
    #[error("Failed to sign the value of the `{name}` cookie")]
    Signing {
        /// The name of the cookie.
        name: String,
        #[source]
        source: SigningFailed,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
/// The error type returned by [`Encryptor::decode`](crate::Encryptor::decode)
/// and [`Signer::validate`](crate::Signer::validate).
pub enum DecodeError {
    #[error(transparent)]
    NotProtected(#[from] NotProtectedError),
    #[error(transparent)]
    Tampered(#[from] TamperedError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("The encryption primitive failed")]
/// The error type returned by [`Cipher::encrypt`](crate::crypto::Cipher::encrypt).
pub struct EncryptionFailed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("The signing primitive failed")]
/// The error type returned by [`MessageAuthenticator::sign`](crate::crypto::MessageAuthenticator::sign).
pub struct SigningFailed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("The message failed authentication")]
/// The error returned by the crypto primitives when a ciphertext or a MAC
/// doesn't check out.
pub struct AuthenticationFailed;

#[derive(Debug, thiserror::Error)]
#[error("Failed to compile `{pattern}` into a cookie name matcher")]
/// A wildcard pattern could not be turned into a matcher.
pub struct InvalidPatternError {
    /// The rejected pattern.
    pub pattern: String,
    #[source]
    pub(crate) source: regex::Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("The secret key used to protect cookies can't be empty")]
/// The error type returned by [`Key::try_from_bytes`](crate::crypto::Key::try_from_bytes).
pub struct EmptyKeyError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[error("Some characters in the `Set-Cookie` header value are not printable ASCII characters.")]
/// A cookie couldn't be serialized into a valid `Set-Cookie` header value.
pub struct InjectResponseCookiesError {
    /// The invalid header value.
    pub invalid_header_value: String,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error type returned when protecting the `Set-Cookie` headers of an outgoing response.
pub enum EncodeResponseCookiesError {
    #[error("Some characters in a `Set-Cookie` header aren't printable ASCII characters.")]
    InvalidHeaderValue(#[from] ToStrError),
    #[error(transparent)]
    InvalidFormat(#[from] InvalidFormatError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Inject(#[from] InjectResponseCookiesError),
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error type returned by [`CookieCollection::from_headers`](crate::CookieCollection::from_headers).
pub enum ExtractResponseCookiesError {
    #[error("Some characters in a `Set-Cookie` header aren't printable ASCII characters.")]
    InvalidHeaderValue(#[from] ToStrError),
    #[error(transparent)]
    InvalidFormat(#[from] InvalidFormatError),
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// A `Cookie` header on the incoming request couldn't be read.
pub enum ExtractRequestCookiesError {
    #[error("Some characters in the `Cookie` header aren't printable ASCII characters.")]
    InvalidHeaderValue(#[from] ToStrError),
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error type returned by [`CookieMiddleware::wrap`](crate::CookieMiddleware::wrap).
pub enum CookieMiddlewareError {
    #[error(transparent)]
    InvalidFormat(#[from] InvalidFormatError),
    #[error(transparent)]
    EncodeResponseCookies(#[from] EncodeResponseCookiesError),
}
