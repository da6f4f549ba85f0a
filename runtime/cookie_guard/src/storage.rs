use http::Response;
use indexmap::IndexMap;

use crate::errors::{EncodeError, InjectResponseCookiesError, InvalidFormatError};
use crate::{Cookie, CookieCollection, ProtectionPolicy, RequestCookies};

/// Collect the cookies to be sent to the client while a request is being handled.
///
/// Every cookie is protected as soon as it's added, according to the policy.
/// All cookies are attached to the response in one go, via [`CookieStorage::flush`].
///
/// A storage is meant to be created at the beginning of each request and
/// consumed at the end of it. Don't share it across requests.
#[derive(Debug)]
pub struct CookieStorage<'policy> {
    policy: &'policy ProtectionPolicy,
    cookies: CookieCollection,
}

impl<'policy> CookieStorage<'policy> {
    /// Create an empty storage that protects cookies according to `policy`.
    pub fn new(policy: &'policy ProtectionPolicy) -> Self {
        Self {
            policy,
            cookies: CookieCollection::new(),
        }
    }

    /// Add a cookie, encrypting or signing it if the policy requires it.
    ///
    /// A cookie with the same name that was previously added is replaced.
    /// Cookies that are already protected are stored as they are.
    pub fn add(&mut self, cookie: Cookie) -> Result<(), EncodeError> {
        let cookie = match self.policy.encode(&cookie)? {
            Some(encoded) => encoded,
            None => cookie,
        };
        self.cookies.add(cookie);
        Ok(())
    }

    /// Ask the client to delete the cookie named `name`.
    ///
    /// A removal cookie (same name, empty value, expiry in the past) is added to the storage.
    pub fn remove(&mut self, name: &str) -> Result<(), InvalidFormatError> {
        self.cookies.add(Cookie::new(name, "")?.expire());
        Ok(())
    }

    /// The cookie with the given name, as it will be sent to the client.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }

    /// The cookies collected so far, in their protected form.
    pub fn cookies(&self) -> &CookieCollection {
        &self.cookies
    }

    /// Append a `Set-Cookie` header to `response` for every cookie in the storage.
    ///
    /// It consumes the storage since no cookies should be added afterwards.
    pub fn flush<B>(
        self,
        mut response: Response<B>,
    ) -> Result<Response<B>, InjectResponseCookiesError> {
        self.cookies.append_to(response.headers_mut())?;
        Ok(response)
    }
}

/// The cookies sent by the client, after decryption and validation.
///
/// Cookies that failed decryption or validation are not part of the loaded set:
/// they are listed in [`LoadedCookies::tampered`].
#[derive(Debug, Clone, Default)]
pub struct LoadedCookies {
    cookies: CookieCollection,
    tampered: IndexMap<String, String>,
}

impl LoadedCookies {
    /// Decode the cookies sent by the client according to `policy`.
    pub fn load(
        policy: &ProtectionPolicy,
        cookies: RequestCookies,
    ) -> Result<Self, InvalidFormatError> {
        let decoded = policy.decode_request_cookies(cookies)?;
        let mut loaded = Self::default();
        for (name, value) in decoded.cookies {
            loaded.cookies.add(Cookie::new(name, value)?);
        }
        for rejected in decoded.rejected {
            loaded
                .tampered
                .insert(rejected.name, rejected.error.to_string());
        }
        Ok(loaded)
    }

    /// The cookie with the given name, if it was sent and passed validation.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }

    /// The value of the cookie with the given name, if it was sent and passed validation.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.cookies.value(name)
    }

    /// All the cookies that passed validation.
    pub fn cookies(&self) -> &CookieCollection {
        &self.cookies
    }

    /// The cookies that were dropped, mapped to the reason why.
    pub fn tampered(&self) -> &IndexMap<String, String> {
        &self.tampered
    }

    /// Returns `true` if a cookie with the given name was sent but failed validation.
    pub fn is_tampered(&self, name: &str) -> bool {
        self.tampered.contains_key(name)
    }
}
