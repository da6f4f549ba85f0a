use std::fmt;
use std::str::FromStr;

use crate::errors::{InvalidFormatError, InvalidSameSiteError};

/// The `SameSite` cookie attribute.
///
/// It controls whether the browser attaches the cookie to cross-site requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SameSite {
    /// The cookie is sent on same-site requests and on top-level cross-site navigations.
    Lax,
    /// The cookie is only sent on same-site requests.
    Strict,
    /// The cookie is sent on every request.
    ///
    /// Browsers reject `SameSite=None` cookies that aren't `Secure`, therefore
    /// [`Cookie::with_same_site`](crate::Cookie::with_same_site) marks them as `Secure`.
    None,
}

impl SameSite {
    /// The value used for this mode in the `SameSite` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
            SameSite::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSite {
    type Err = InvalidFormatError;

    /// Parse a `SameSite` mode.
    ///
    /// The canonical spelling (`Lax`) and its lowercase form (`lax`) are both accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Lax" | "lax" => Ok(SameSite::Lax),
            "Strict" | "strict" => Ok(SameSite::Strict),
            "None" | "none" => Ok(SameSite::None),
            _ => Err(InvalidSameSiteError {
                value: s.to_owned(),
            }
            .into()),
        }
    }
}
