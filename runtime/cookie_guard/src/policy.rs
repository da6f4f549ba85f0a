use http::header::{HeaderMap, HeaderValue, SET_COOKIE};
use tracing_log_error::log_error;

use crate::config::CookieGuardConfig;
use crate::crypto::Key;
use crate::errors::{
    DecodeError, EncodeError, EncodeResponseCookiesError, InvalidFormatError, InvalidPatternError,
};
use crate::pattern::WildcardPattern;
use crate::{Cookie, Encryptor, RequestCookies, Signer};

/// How a cookie must be protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionAction {
    /// The value is encrypted: the client can't read nor modify it.
    Encrypt,
    /// The value is signed: the client can read it, but can't modify it.
    Sign,
}

/// A `(name pattern, action)` pair, as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProtectionRule {
    /// A [wildcard pattern](WildcardPattern) for cookie names.
    pub pattern: String,
    /// What to do with the cookies whose name matches the pattern.
    pub action: ProtectionAction,
}

impl ProtectionRule {
    /// Encrypt the cookies whose name matches `pattern`.
    pub fn encrypt(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            action: ProtectionAction::Encrypt,
        }
    }

    /// Sign the cookies whose name matches `pattern`.
    pub fn sign(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            action: ProtectionAction::Sign,
        }
    }
}

/// Decide, for every cookie, whether it must be encrypted, signed or left alone,
/// and apply that decision in both directions.
///
/// Rules are evaluated in the order they were added: the first rule whose pattern
/// matches the cookie name wins. Cookies that match no rule pass through untouched.
///
/// The policy is immutable once built and can be shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct ProtectionPolicy {
    rules: Vec<(WildcardPattern, ProtectionAction)>,
    encryptor: Encryptor,
    signer: Signer,
}

/// The outcome of decoding the cookies attached to an incoming request.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct DecodedCookies {
    /// The cookies that passed validation, with their original values recovered.
    pub cookies: RequestCookies,
    /// The cookies that were dropped, with the reason why.
    pub rejected: Vec<RejectedCookie>,
}

/// A request cookie that was dropped because it failed decryption or validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCookie {
    /// The name of the cookie.
    pub name: String,
    /// Why it was dropped.
    pub error: DecodeError,
}

impl ProtectionPolicy {
    /// A policy with no rules, using the given codecs.
    pub fn new(encryptor: Encryptor, signer: Signer) -> Self {
        Self {
            rules: Vec::new(),
            encryptor,
            signer,
        }
    }

    /// A policy with no rules, using the default codecs built on top of `key`.
    pub fn from_key(key: Key) -> Self {
        Self::new(Encryptor::new(key.clone()), Signer::new(key))
    }

    /// Build a policy out of its configuration.
    pub fn from_config(config: &CookieGuardConfig) -> Result<Self, InvalidPatternError> {
        let key = config.key.clone();
        let mut policy = Self::new(
            Encryptor::new(key.clone()),
            Signer::with_algorithm(key, config.mac_algorithm),
        );
        for rule in &config.rules {
            policy = policy.rule(&rule.pattern, rule.action)?;
        }
        Ok(policy)
    }

    /// Append a rule.
    pub fn rule(
        mut self,
        pattern: &str,
        action: ProtectionAction,
    ) -> Result<Self, InvalidPatternError> {
        self.rules.push((WildcardPattern::new(pattern)?, action));
        Ok(self)
    }

    /// Append a rule to encrypt the cookies whose name matches `pattern`.
    pub fn encrypt(self, pattern: &str) -> Result<Self, InvalidPatternError> {
        self.rule(pattern, ProtectionAction::Encrypt)
    }

    /// Append a rule to sign the cookies whose name matches `pattern`.
    pub fn sign(self, pattern: &str) -> Result<Self, InvalidPatternError> {
        self.rule(pattern, ProtectionAction::Sign)
    }

    /// The codec used for [`ProtectionAction::Encrypt`].
    pub fn encryptor(&self) -> &Encryptor {
        &self.encryptor
    }

    /// The codec used for [`ProtectionAction::Sign`].
    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// The action of the first rule matching `cookie_name`, if any.
    pub fn action_for(&self, cookie_name: &str) -> Option<ProtectionAction> {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(cookie_name))
            .map(|(_, action)| *action)
    }

    /// Returns `true` if `cookie` is already protected as the policy requires.
    pub fn is_protected(&self, cookie: &Cookie) -> bool {
        match self.action_for(cookie.name()) {
            Some(ProtectionAction::Encrypt) => self.encryptor.is_protected(cookie),
            Some(ProtectionAction::Sign) => self.signer.is_signed(cookie),
            None => false,
        }
    }

    /// Protect `cookie` according to the first matching rule.
    ///
    /// It returns `None` if no rule matches or if the cookie is already protected.
    pub fn encode(&self, cookie: &Cookie) -> Result<Option<Cookie>, EncodeError> {
        let encoded = match self.action_for(cookie.name()) {
            Some(ProtectionAction::Encrypt) if !self.encryptor.is_protected(cookie) => {
                self.encryptor.encode(cookie)?
            }
            Some(ProtectionAction::Sign) if !self.signer.is_signed(cookie) => {
                self.signer.sign(cookie)?
            }
            _ => return Ok(None),
        };
        Ok(Some(encoded))
    }

    /// Recover the original value of `cookie`, according to the first matching rule.
    ///
    /// Cookies that match no rule are returned as they are.
    pub fn decode(&self, cookie: Cookie) -> Result<Cookie, DecodeError> {
        match self.action_for(cookie.name()) {
            Some(ProtectionAction::Encrypt) => self.encryptor.decode(&cookie),
            Some(ProtectionAction::Sign) => self.signer.validate(&cookie),
            None => Ok(cookie),
        }
    }

    /// Decode every protected cookie sent by the client.
    ///
    /// Cookies that fail decryption or validation are dropped and logged,
    /// the remaining ones are returned with their original values.
    pub fn decode_request_cookies(
        &self,
        cookies: RequestCookies,
    ) -> Result<DecodedCookies, InvalidFormatError> {
        let mut decoded = DecodedCookies::default();
        for (name, value) in cookies {
            if self.action_for(&name).is_none() {
                decoded.cookies.insert(name, value);
                continue;
            }
            match self.decode(Cookie::new(name.as_str(), value)?) {
                Ok(cookie) => decoded.cookies.insert(name, cookie.value()),
                Err(e) => {
                    log_error!(
                        e,
                        level: tracing::Level::INFO,
                        cookie.name = %name,
                        "A request cookie failed validation, dropping it"
                    );
                    decoded.rejected.push(RejectedCookie { name, error: e });
                }
            }
        }
        Ok(decoded)
    }

    /// Protect the `Set-Cookie` headers that match a rule and aren't protected yet.
    ///
    /// Headers that don't need to change are kept byte-for-byte.
    /// Rewritten headers keep every attribute of the original, including the ones
    /// [`Cookie`] doesn't model (see [`Cookie::extensions`]).
    /// If no header needs to change, `headers` is left untouched.
    /// It returns `true` if at least one header was rewritten.
    pub fn encode_response_cookies(
        &self,
        headers: &mut HeaderMap,
    ) -> Result<bool, EncodeResponseCookiesError> {
        let mut changed = false;
        let mut values = Vec::new();
        for header in headers.get_all(SET_COOKIE) {
            let rewritten = match set_cookie_name(header) {
                Some(name) if self.action_for(name).is_some() => {
                    let cookie = Cookie::parse(header.to_str()?)?;
                    match self.encode(&cookie)? {
                        Some(encoded) => Some(encoded.to_header_value()?),
                        None => None,
                    }
                }
                _ => None,
            };
            match rewritten {
                Some(value) => {
                    changed = true;
                    values.push(value);
                }
                None => values.push(header.clone()),
            }
        }

        if changed {
            headers.remove(SET_COOKIE);
            for value in values {
                headers.append(SET_COOKIE, value);
            }
        }
        Ok(changed)
    }
}

impl TryFrom<&CookieGuardConfig> for ProtectionPolicy {
    type Error = InvalidPatternError;

    fn try_from(config: &CookieGuardConfig) -> Result<Self, Self::Error> {
        Self::from_config(config)
    }
}

/// The cookie name of a `Set-Cookie` header, if it can be determined.
fn set_cookie_name(header: &HeaderValue) -> Option<&str> {
    let bytes = header.as_bytes();
    let end = bytes.iter().position(|b| *b == b'=')?;
    std::str::from_utf8(&bytes[..end]).ok().map(str::trim)
}
