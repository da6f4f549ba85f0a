//! Per-cookie markers, used to recognise protected values.
//!
//! A marker is a fingerprint of the protection scheme and of the cookie name.
//! It is prepended to every protected value: a value protected for one cookie
//! is therefore not recognised as protected under a different name.
use sha2::{Digest, Sha256};

/// The length of every marker, in characters.
pub const MARKER_LEN: usize = 32;

/// The marker of a protection scheme for a specific cookie name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Marker(String);

impl Marker {
    /// Compute the marker for `cookie_name` under the protection scheme identified by `scheme`.
    pub fn new(scheme: &str, cookie_name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(scheme.as_bytes());
        hasher.update([0u8]);
        hasher.update(cookie_name.as_bytes());
        let digest = hasher.finalize();
        Self(hex::encode(&digest[..MARKER_LEN / 2]))
    }

    /// The marker, as a string of lowercase hex digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `value` starts with this marker and carries a payload after it.
    pub fn prefixes(&self, value: &str) -> bool {
        value.len() > MARKER_LEN && value.starts_with(&self.0)
    }

    /// Strip this marker from the start of `value`, if present.
    pub fn strip<'a>(&self, value: &'a str) -> Option<&'a str> {
        value.strip_prefix(self.0.as_str())
    }
}
