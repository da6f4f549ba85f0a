/*!
Encrypt, sign and validate HTTP cookie values as they cross the request/response boundary.

# Why do we need to protect cookies?

Cookies are stored on the client. Whatever the server puts in a cookie can be read
and modified by the client before being sent back. Two kinds of protection are available:

- **Signing**: the value stays readable, but any modification is detected on the way back in.
- **Encryption**: the value is unreadable by the client and any modification is detected.

# Anatomy of a protected value

A protected value starts with a **marker**: a fixed-length fingerprint of the protection
scheme and of the cookie name (see [`marker`]). The marker makes protected values
self-describing: we can tell whether a value was protected for a given cookie name without
attempting any cryptographic work. It also binds the value to the cookie name, so a protected
value copied from one cookie into another is rejected.

# Overview

- [`Cookie`] and [`CookieCollection`] model cookies, independently of any protection.
- [`Encryptor`] and [`Signer`] protect and unprotect individual cookies.
- [`ProtectionPolicy`] decides which cookies are protected and how, by matching cookie names
  against [wildcard patterns](pattern::WildcardPattern).
- [`CookieMiddleware`] applies a policy to the `Cookie` and `Set-Cookie` headers
  of a request/response exchange.
  [`CookieStorage`] and [`LoadedCookies`] apply the same policy when cookies are added
  or loaded by application code.

A tampered request cookie never fails the request: it is dropped and the event is logged
via `tracing`.

## References

- [RFC 6265](https://datatracker.ietf.org/doc/html/rfc6265).
*/
mod collection;
pub mod config;
mod cookie_;
pub mod crypto;
mod encryptor;
pub mod errors;
pub mod marker;
mod middleware;
pub mod pattern;
mod policy;
mod request_cookies;
mod same_site;
mod signer;
mod storage;

pub use collection::CookieCollection;
pub use config::CookieGuardConfig;
pub use cookie_::Cookie;
pub use encryptor::Encryptor;
pub use middleware::CookieMiddleware;
pub use policy::{
    DecodedCookies, ProtectionAction, ProtectionPolicy, ProtectionRule, RejectedCookie,
};
pub use request_cookies::RequestCookies;
pub use same_site::SameSite;
pub use signer::Signer;
pub use storage::{CookieStorage, LoadedCookies};
