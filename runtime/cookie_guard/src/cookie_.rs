use std::fmt::{self, Write as _};

use http::HeaderValue;
use http::header::{HeaderMap, SET_COOKIE};
use jiff::fmt::rfc2822::{DateTimeParser, DateTimePrinter};
use jiff::fmt::strtime;
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::SameSite;
use crate::errors::{
    InjectResponseCookiesError, InvalidDomainError, InvalidFormatError, InvalidNameError,
    InvalidPathError,
};

/// Characters that are percent-encoded when a cookie value is written to the wire.
///
/// Everything but the RFC 3986 unreserved characters.
const VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// An HTTP cookie.
///
/// `Cookie` is an immutable value object: every `with_*` method returns a modified copy
/// and leaves the original untouched.
///
/// # Defaults
///
/// A cookie built via [`Cookie::new`] is scoped to the `/` path, it is `Secure`, `HttpOnly`
/// and `SameSite=Lax`. It has no expiry (i.e. it's a session cookie) and no domain.
///
/// # Wire format
///
/// The [`Display`](fmt::Display) implementation renders the value of a `Set-Cookie` header:
///
/// ```rust
/// use cookie_guard::Cookie;
///
/// let cookie = Cookie::new("theme", "dark mode").unwrap();
/// assert_eq!(
///     cookie.to_string(),
///     "theme=dark%20mode; Path=/; Secure; HttpOnly; SameSite=Lax"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    expires: Option<Timestamp>,
    domain: Option<String>,
    path: Option<String>,
    secure: Option<bool>,
    http_only: Option<bool>,
    same_site: Option<SameSite>,
    extensions: Vec<String>,
    encode_value: bool,
}

impl Cookie {
    /// Create a new cookie with the given name and value.
    ///
    /// It fails if the name is empty or contains characters outside of the
    /// cookie token grammar (control characters, whitespace or separators).
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, InvalidFormatError> {
        let mut cookie = Self::bare(name.into(), value.into())?;
        cookie.path = Some("/".into());
        cookie.secure = Some(true);
        cookie.http_only = Some(true);
        cookie.same_site = Some(SameSite::Lax);
        Ok(cookie)
    }

    /// A cookie with no attributes set.
    fn bare(name: String, value: String) -> Result<Self, InvalidFormatError> {
        if !is_valid_name(&name) {
            return Err(InvalidNameError { name }.into());
        }
        Ok(Self {
            name,
            value,
            expires: None,
            domain: None,
            path: None,
            secure: None,
            http_only: None,
            same_site: None,
            extensions: Vec::new(),
            encode_value: true,
        })
    }

    /// The name of the cookie.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value of the cookie, as stored in memory (i.e. before wire-encoding).
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The instant the cookie expires at, if any.
    ///
    /// `None` means that this is a session cookie.
    pub fn expires(&self) -> Option<Timestamp> {
        self.expires
    }

    /// The `Domain` attribute, if set.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// The `Path` attribute, if set.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The `Secure` attribute, if set.
    pub fn secure(&self) -> Option<bool> {
        self.secure
    }

    /// Returns `true` if the cookie is marked as `Secure`.
    pub fn is_secure(&self) -> bool {
        self.secure.unwrap_or(false)
    }

    /// The `HttpOnly` attribute, if set.
    pub fn http_only(&self) -> Option<bool> {
        self.http_only
    }

    /// Returns `true` if the cookie is marked as `HttpOnly`.
    pub fn is_http_only(&self) -> bool {
        self.http_only.unwrap_or(false)
    }

    /// The `SameSite` attribute, if set.
    pub fn same_site(&self) -> Option<SameSite> {
        self.same_site
    }

    /// The attributes this type doesn't model (e.g. `Partitioned` or `Priority=High`),
    /// as they appeared in the parsed `Set-Cookie` string.
    ///
    /// They are written back verbatim, after the known attributes, when the cookie is serialized.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// Returns `true` if the value is percent-encoded when the cookie is written to the wire.
    pub fn encodes_value(&self) -> bool {
        self.encode_value
    }

    /// Set a new value.
    ///
    /// The value will be percent-encoded when the cookie is written to the wire.
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            encode_value: true,
            ..self.clone()
        }
    }

    /// Set a new value that is already safe to be written to the wire as-is.
    ///
    /// No percent-encoding is applied when the cookie is serialized.
    pub fn with_raw_value(&self, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            encode_value: false,
            ..self.clone()
        }
    }

    /// Set the instant the cookie expires at.
    pub fn with_expires(&self, expires: Timestamp) -> Self {
        Self {
            expires: Some(expires),
            ..self.clone()
        }
    }

    /// Set the cookie to expire after `max_age`, starting from now.
    ///
    /// A zero or negative duration expires the cookie immediately.
    pub fn with_max_age(&self, max_age: SignedDuration) -> Self {
        let now = Timestamp::now();
        self.with_expires(saturating_add(now, max_age))
    }

    /// Set the expiry one year in the past.
    ///
    /// Sending this cookie to a client asks it to remove its own copy.
    pub fn expire(&self) -> Self {
        let expires = Timestamp::now()
            .checked_sub(SignedDuration::from_hours(24 * 365))
            .unwrap_or(Timestamp::MIN);
        self.with_expires(expires)
    }

    /// Remove the expiry, turning this cookie into a session cookie.
    ///
    /// The client will discard it when its browsing session ends.
    pub fn expire_when_browser_is_closed(&self) -> Self {
        Self {
            expires: None,
            ..self.clone()
        }
    }

    /// Returns `true` if the cookie has an expiry and it's not in the future.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Timestamp::now())
    }

    /// Returns `true` if the cookie has an expiry and it is at or before `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    /// Set the `Domain` attribute.
    ///
    /// It fails if the domain contains control characters or `;`.
    pub fn with_domain(&self, domain: impl Into<String>) -> Result<Self, InvalidFormatError> {
        let domain = domain.into();
        if !is_valid_attribute_value(&domain) {
            return Err(InvalidDomainError {
                name: self.name.clone(),
                domain,
            }
            .into());
        }
        Ok(Self {
            domain: Some(domain),
            ..self.clone()
        })
    }

    /// Set the `Path` attribute.
    ///
    /// It fails if the path contains control characters or `;`.
    pub fn with_path(&self, path: impl Into<String>) -> Result<Self, InvalidFormatError> {
        let path = path.into();
        if !is_valid_attribute_value(&path) {
            return Err(InvalidPathError {
                name: self.name.clone(),
                path,
            }
            .into());
        }
        Ok(Self {
            path: Some(path),
            ..self.clone()
        })
    }

    /// Set the `Secure` attribute.
    pub fn with_secure(&self, secure: bool) -> Self {
        Self {
            secure: Some(secure),
            ..self.clone()
        }
    }

    /// Set the `HttpOnly` attribute.
    pub fn with_http_only(&self, http_only: bool) -> Self {
        Self {
            http_only: Some(http_only),
            ..self.clone()
        }
    }

    /// Set the `SameSite` attribute.
    ///
    /// [`SameSite::None`] marks the cookie as `Secure` too.
    pub fn with_same_site(&self, same_site: SameSite) -> Self {
        let secure = if same_site == SameSite::None {
            Some(true)
        } else {
            self.secure
        };
        Self {
            same_site: Some(same_site),
            secure,
            ..self.clone()
        }
    }

    /// Serialize the cookie into the value of a `Set-Cookie` header.
    ///
    /// `Max-Age` is computed relative to `now`.
    pub fn encode_at(&self, now: Timestamp) -> String {
        let mut out = String::new();
        out.push_str(&self.name);
        out.push('=');
        if self.encode_value {
            let _ = write!(
                out,
                "{}",
                utf8_percent_encode(&self.value, VALUE_ENCODE_SET)
            );
        } else {
            out.push_str(&self.value);
        }

        if let Some(expires) = self.expires {
            // Instants outside of the range of an HTTP date can only be expressed via `Max-Age`.
            let printer = DateTimePrinter::new();
            if let Ok(date) = printer.timestamp_to_rfc9110_string(&expires) {
                let _ = write!(out, "; Expires={date}");
            }
            let _ = write!(out, "; Max-Age={}", expires.duration_since(now).as_secs());
        }
        if let Some(domain) = &self.domain {
            let _ = write!(out, "; Domain={domain}");
        }
        if let Some(path) = &self.path {
            let _ = write!(out, "; Path={path}");
        }
        if self.is_secure() {
            out.push_str("; Secure");
        }
        if self.is_http_only() {
            out.push_str("; HttpOnly");
        }
        if let Some(same_site) = self.same_site {
            let _ = write!(out, "; SameSite={same_site}");
        }
        for extension in &self.extensions {
            let _ = write!(out, "; {extension}");
        }
        out
    }

    /// Append the cookie to `headers`, as a new `Set-Cookie` header.
    pub fn append_to(&self, headers: &mut HeaderMap) -> Result<(), InjectResponseCookiesError> {
        headers.append(SET_COOKIE, self.to_header_value()?);
        Ok(())
    }

    /// Serialize the cookie into a `Set-Cookie` [`HeaderValue`].
    pub fn to_header_value(&self) -> Result<HeaderValue, InjectResponseCookiesError> {
        let value = self.to_string();
        HeaderValue::from_str(&value).map_err(|_| InjectResponseCookiesError {
            invalid_header_value: value,
        })
    }

    /// Parse the value of a `Set-Cookie` header.
    ///
    /// Attribute names are matched case-insensitively. Unknown attributes are kept
    /// verbatim, see [`Cookie::extensions`].
    /// `Max-Age` is resolved to an absolute expiry relative to the current time and
    /// takes precedence over `Expires`.
    ///
    /// `Expires` accepts the RFC 9110 date format and the two obsolete formats
    /// still emitted by some servers (RFC 850 and `asctime`).
    pub fn parse(s: &str) -> Result<Self, InvalidFormatError> {
        Self::parse_at(s, Timestamp::now())
    }

    /// Parse the value of a `Set-Cookie` header, resolving `Max-Age` relative to `now`.
    pub fn parse_at(s: &str, now: Timestamp) -> Result<Self, InvalidFormatError> {
        let mut segments = s.split(';').map(str::trim).filter(|s| !s.is_empty());
        let missing_pair = || InvalidFormatError::MissingPair {
            cookie_string: s.to_owned(),
        };
        let pair = segments.next().ok_or_else(missing_pair)?;
        let (name, value) = split_attribute(pair);
        if name.is_empty() {
            return Err(missing_pair());
        }
        let mut cookie = Self::bare(name.to_owned(), decode_value(value.unwrap_or_default()))?;

        let mut max_age = None;
        for segment in segments {
            let (key, value) = split_attribute(segment);
            match (key.to_ascii_lowercase().as_str(), value) {
                ("secure", _) => cookie.secure = Some(true),
                ("httponly", _) => cookie.http_only = Some(true),
                ("expires", Some(value)) => {
                    let expires = parse_http_date(value).ok_or_else(|| {
                        InvalidFormatError::InvalidExpires {
                            name: cookie.name.clone(),
                            value: value.to_owned(),
                        }
                    })?;
                    cookie.expires = Some(expires);
                }
                ("max-age", Some(value)) => {
                    let seconds = value.parse::<i64>().map_err(|_| {
                        InvalidFormatError::InvalidMaxAge {
                            name: cookie.name.clone(),
                            value: value.to_owned(),
                        }
                    })?;
                    max_age = Some(seconds);
                }
                ("domain", Some(value)) => cookie = cookie.with_domain(value)?,
                ("path", Some(value)) => cookie = cookie.with_path(value)?,
                ("samesite", Some(value)) => cookie = cookie.with_same_site(value.parse()?),
                ("expires" | "max-age" | "domain" | "path" | "samesite", None) => {}
                _ => cookie.extensions.push(segment.to_owned()),
            }
        }
        if let Some(seconds) = max_age {
            cookie.expires = Some(saturating_add(now, SignedDuration::from_secs(seconds)));
        }
        Ok(cookie)
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode_at(Timestamp::now()))
    }
}

impl std::str::FromStr for Cookie {
    type Err = InvalidFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn split_attribute(attribute: &str) -> (&str, Option<&str>) {
    match attribute.split_once('=') {
        Some((key, value)) => (key.trim(), Some(value.trim())),
        None => (attribute.trim(), None),
    }
}

/// `true` if `name` is a valid cookie token.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#'
                        | b'$'
                        | b'%'
                        | b'&'
                        | b'\''
                        | b'*'
                        | b'+'
                        | b'-'
                        | b'.'
                        | b'^'
                        | b'_'
                        | b'`'
                        | b'|'
                        | b'~'
                )
        })
}

/// `true` if `value` can be used as a `Path` or `Domain` attribute value.
fn is_valid_attribute_value(value: &str) -> bool {
    !value.bytes().any(|b| b.is_ascii_control() || b == b';')
}

fn saturating_add(instant: Timestamp, duration: SignedDuration) -> Timestamp {
    match instant.checked_add(duration) {
        Ok(sum) => sum,
        Err(_) if duration.is_negative() => Timestamp::MIN,
        Err(_) => Timestamp::MAX,
    }
}

/// The obsolete date formats that HTTP clients must still accept, after
/// collapsing runs of whitespace.
const OBSOLETE_DATE_FORMATS: [&str; 2] = [
    // RFC 850, e.g. `Sunday, 06-Nov-94 08:49:37 GMT`.
    "%A, %d-%b-%y %H:%M:%S GMT",
    // `asctime`, e.g. `Sun Nov 16 08:49:37 1994`.
    "%a %b %d %H:%M:%S %Y",
];

/// Parse the value of an `Expires` attribute.
fn parse_http_date(value: &str) -> Option<Timestamp> {
    if let Ok(timestamp) = DateTimeParser::new().parse_timestamp(value) {
        return Some(timestamp);
    }
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
    OBSOLETE_DATE_FORMATS.iter().find_map(|format| {
        let parsed = strtime::parse(format, &normalized).ok()?;
        let zoned = parsed.to_datetime().ok()?.to_zoned(TimeZone::UTC).ok()?;
        Some(zoned.timestamp())
    })
}

/// Reverse the wire-encoding of a cookie value.
///
/// `+` is decoded as a space, for compatibility with form-style encoders.
/// Invalid UTF-8 sequences are replaced.
pub(crate) fn decode_value(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    percent_decode_str(&raw).decode_utf8_lossy().into_owned()
}

/// Percent-encode a string the same way cookie values are encoded on the wire.
pub(crate) fn encode_value(raw: &str) -> String {
    utf8_percent_encode(raw, VALUE_ENCODE_SET).to_string()
}
