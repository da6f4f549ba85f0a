use http::header::{HeaderMap, SET_COOKIE};
use indexmap::IndexMap;

use crate::Cookie;
use crate::errors::{ExtractResponseCookiesError, InjectResponseCookiesError, InvalidFormatError};

/// A set of cookies, keyed by name.
///
/// Adding a cookie replaces any existing cookie with the same name.
/// Iteration follows the order in which names were first inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieCollection {
    cookies: IndexMap<String, Cookie>,
}

impl CookieCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection out of a set of `name => value` pairs.
    ///
    /// Every cookie is created via [`Cookie::new`], with the default attributes.
    /// It fails if any of the names is not a valid cookie name.
    pub fn from_pairs<I, N, V>(pairs: I) -> Result<Self, InvalidFormatError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let mut collection = Self::new();
        for (name, value) in pairs {
            collection.add(Cookie::new(name, value)?);
        }
        Ok(collection)
    }

    /// Build a collection by parsing every `Set-Cookie` header in `headers`.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ExtractResponseCookiesError> {
        let mut collection = Self::new();
        for header in headers.get_all(SET_COOKIE) {
            collection.add(Cookie::parse(header.to_str()?)?);
        }
        Ok(collection)
    }

    /// Get the cookie with the given name, if any.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }

    /// Get the value of the cookie with the given name, if any.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(Cookie::value)
    }

    /// Get the value of the cookie with the given name, falling back to `default`.
    pub fn value_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.value(name).unwrap_or(default)
    }

    /// Add a cookie, replacing any existing cookie with the same name.
    pub fn add(&mut self, cookie: Cookie) {
        self.cookies.insert(cookie.name().to_owned(), cookie);
    }

    /// Returns `true` if there is a cookie with the given name.
    pub fn has(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// Returns `true` if the collection holds a cookie equal to `cookie`, attributes included.
    pub fn contains(&self, cookie: &Cookie) -> bool {
        self.get(cookie.name()) == Some(cookie)
    }

    /// Returns `true` if at least one cookie satisfies `predicate`.
    pub fn exists<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&Cookie) -> bool,
    {
        self.cookies.values().any(predicate)
    }

    /// Remove the cookie with the given name, returning it.
    pub fn remove(&mut self, name: &str) -> Option<Cookie> {
        self.cookies.shift_remove(name)
    }

    /// Replace the cookie with the given name by a copy that has already expired.
    ///
    /// It does nothing if there is no cookie with that name.
    pub fn expire(&mut self, name: &str) {
        if let Some(cookie) = self.cookies.get_mut(name) {
            *cookie = cookie.expire();
        }
    }

    /// Remove all cookies.
    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Replace every cookie with the output of `f`.
    ///
    /// Cookies are re-keyed under the name of the cookie returned by `f`.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&Cookie) -> Cookie,
    {
        let cookies = std::mem::take(&mut self.cookies);
        for cookie in cookies.into_values() {
            self.add(f(&cookie));
        }
    }

    /// Keep only the cookies that satisfy `predicate`.
    pub fn retain<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&Cookie) -> bool,
    {
        self.cookies.retain(|_, cookie| predicate(cookie));
    }

    /// The names of the cookies in the collection.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cookies.keys().map(String::as_str)
    }

    /// The cookies in the collection.
    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.values()
    }

    /// The number of cookies in the collection.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns `true` if there are no cookies in the collection.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Append every cookie in the collection as a `Set-Cookie` header.
    ///
    /// Existing `Set-Cookie` headers are left untouched.
    pub fn append_to(&self, headers: &mut HeaderMap) -> Result<(), InjectResponseCookiesError> {
        for cookie in self.iter() {
            cookie.append_to(headers)?;
        }
        Ok(())
    }

    /// Replace all `Set-Cookie` headers with the cookies in this collection.
    ///
    /// `headers` is left untouched if any of the cookies can't be serialized.
    pub fn set_to(&self, headers: &mut HeaderMap) -> Result<(), InjectResponseCookiesError> {
        let values = self
            .iter()
            .map(Cookie::to_header_value)
            .collect::<Result<Vec<_>, _>>()?;
        headers.remove(SET_COOKIE);
        for value in values {
            headers.append(SET_COOKIE, value);
        }
        Ok(())
    }
}

impl FromIterator<Cookie> for CookieCollection {
    fn from_iter<T: IntoIterator<Item = Cookie>>(iter: T) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl Extend<Cookie> for CookieCollection {
    fn extend<T: IntoIterator<Item = Cookie>>(&mut self, iter: T) {
        for cookie in iter {
            self.add(cookie);
        }
    }
}

impl IntoIterator for CookieCollection {
    type Item = Cookie;
    type IntoIter = indexmap::map::IntoValues<String, Cookie>;

    fn into_iter(self) -> Self::IntoIter {
        self.cookies.into_values()
    }
}

impl<'a> IntoIterator for &'a CookieCollection {
    type Item = &'a Cookie;
    type IntoIter = indexmap::map::Values<'a, String, Cookie>;

    fn into_iter(self) -> Self::IntoIter {
        self.cookies.values()
    }
}
