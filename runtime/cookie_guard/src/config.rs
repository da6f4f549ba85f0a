use crate::ProtectionRule;
use crate::crypto::{Key, MacAlgorithm};

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// Configure which cookies are protected, and how.
///
/// # Example
///
/// ```yaml
/// key: "0my1xVkjCJnD_q1yr6lUxcAdpDlTMwiU"
/// mac_algorithm: sha512
/// rules:
///   - pattern: "secret*"
///     action: encrypt
///   - pattern: "name_[1-9]"
///     action: sign
/// ```
pub struct CookieGuardConfig {
    /// The secret used to encrypt and sign cookie values.
    ///
    /// It must not be empty.
    /// Every instance of the application must use the same key, otherwise cookies
    /// issued by one instance will be rejected by the others.
    pub key: Key,
    /// The hash function used to sign cookie values.
    ///
    /// By default, it is set to [`MacAlgorithm::Sha256`].
    #[serde(default)]
    pub mac_algorithm: MacAlgorithm,
    /// The protection rules, in priority order.
    ///
    /// For each cookie, the first rule whose pattern matches the cookie name is applied.
    /// By default, there are no rules: all cookies are left untouched.
    #[serde(default)]
    pub rules: Vec<ProtectionRule>,
}

impl CookieGuardConfig {
    /// A configuration with the given key, the default MAC algorithm and no rules.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            mac_algorithm: MacAlgorithm::default(),
            rules: Vec::new(),
        }
    }

    /// Set the hash function used to sign cookie values.
    pub fn mac_algorithm(mut self, algorithm: MacAlgorithm) -> Self {
        self.mac_algorithm = algorithm;
        self
    }

    /// Append a protection rule.
    pub fn rule(mut self, rule: ProtectionRule) -> Self {
        self.rules.push(rule);
        self
    }
}
