//! Wildcard patterns for cookie names.
use regex::Regex;

use crate::errors::InvalidPatternError;

/// A precompiled wildcard pattern.
///
/// The following wildcards are supported:
///
/// - `*` matches any sequence of characters, including the empty one;
/// - `?` matches exactly one character;
/// - `[abc]` and `[a-z]` match one character out of a set;
/// - `[!abc]` matches one character outside of a set;
/// - `\` escapes the following character.
///
/// Every other character matches itself. Matching is case-sensitive and
/// the pattern must match the whole name.
///
/// ```rust
/// use cookie_guard::pattern::WildcardPattern;
///
/// let pattern = WildcardPattern::new("session_[0-9]*").unwrap();
/// assert!(pattern.matches("session_1"));
/// assert!(pattern.matches("session_42_backup"));
/// assert!(!pattern.matches("session_x"));
/// ```
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    regex: Regex,
}

impl WildcardPattern {
    /// Compile `pattern`.
    pub fn new(pattern: &str) -> Result<Self, InvalidPatternError> {
        let regex = Regex::new(&translate(pattern)).map_err(|source| InvalidPatternError {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Self {
            source: pattern.to_owned(),
            regex,
        })
    }

    /// The pattern, as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if `name` matches the pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for WildcardPattern {}

/// Translate a wildcard pattern into an anchored regular expression.
fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("^(?s:");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' => match chars.next() {
                Some(escaped) => out.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4]))),
                None => out.push_str(r"\\"),
            },
            '[' => {
                let negated = chars.next_if_eq(&'!').is_some();
                let mut class = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    match c {
                        ']' => {
                            closed = true;
                            break;
                        }
                        // `-` keeps its range meaning, everything else is literal.
                        '-' => class.push('-'),
                        c => class.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
                    }
                }
                if closed && !class.is_empty() {
                    out.push_str(if negated { "[^" } else { "[" });
                    out.push_str(&class);
                    out.push(']');
                } else {
                    // Unterminated or empty classes are matched literally.
                    out.push_str(r"\[");
                    if negated {
                        out.push('!');
                    }
                    out.push_str(&class);
                    if closed {
                        out.push_str(r"\]");
                    }
                }
            }
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    out.push_str(")$");
    out
}
