use http::HeaderValue;
use http::header::{COOKIE, HeaderMap};
use indexmap::IndexMap;
use tracing_log_error::log_error;

use crate::cookie_::{decode_value, is_valid_name};
use crate::errors::ExtractRequestCookiesError;

/// The cookies sent by the client, as `name => value` pairs.
///
/// Values have already been percent-decoded.
/// If the same name appears more than once, the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies {
    cookies: IndexMap<String, String>,
}

impl RequestCookies {
    /// An empty set of request cookies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the cookies out of the `Cookie` headers in `headers`.
    ///
    /// Parsing is tolerant: headers that aren't printable ASCII are skipped
    /// with a warning, pairs without a `=` or with an invalid name are skipped
    /// and the remaining cookies are kept.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = Self::new();
        for header in headers.get_all(COOKIE) {
            if let Err(e) = cookies.extend_from_header(header) {
                log_error!(
                    e,
                    level: tracing::Level::WARN,
                    "A request `Cookie` header is invalid, ignoring it"
                );
            }
        }
        cookies
    }

    fn extend_from_header(
        &mut self,
        header: &HeaderValue,
    ) -> Result<(), ExtractRequestCookiesError> {
        let header = header.to_str()?;
        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if !is_valid_name(name) {
                tracing::debug!(
                    cookie.name = name,
                    "Skipping a request cookie with an invalid name"
                );
                continue;
            }
            let value = value.trim().trim_matches('"');
            self.cookies
                .entry(name.to_owned())
                .or_insert_with(|| decode_value(value));
        }
        Ok(())
    }

    /// Add a cookie, unless a cookie with the same name is already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.entry(name.into()).or_insert_with(|| value.into());
    }

    /// The value of the cookie with the given name, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns `true` if the client sent a cookie with the given name.
    pub fn has(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// Remove the cookie with the given name, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.cookies.shift_remove(name)
    }

    /// Iterate over the `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The number of cookies.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns `true` if there are no cookies.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for RequestCookies
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut cookies = Self::new();
        for (name, value) in iter {
            cookies.insert(name, value);
        }
        cookies
    }
}

impl IntoIterator for RequestCookies {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.cookies.into_iter()
    }
}
