use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

use super::Key;
use crate::errors::{AuthenticationFailed, SigningFailed};

/// A keyed message authentication scheme.
///
/// `sign` wraps a message into a self-contained envelope, `extract` verifies the envelope
/// and returns the original message.
pub trait MessageAuthenticator: Send + Sync {
    /// Wrap `message` into an authenticated envelope.
    fn sign(&self, message: &str, key: &Key) -> Result<String, SigningFailed>;

    /// Verify `envelope` and return the message it carries.
    fn extract(&self, envelope: &str, key: &Key) -> Result<String, AuthenticationFailed>;
}

/// The hash function used by [`HmacAuthenticator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacAlgorithm {
    /// HMAC-SHA256.
    #[default]
    Sha256,
    /// HMAC-SHA384.
    Sha384,
    /// HMAC-SHA512.
    Sha512,
}

impl MacAlgorithm {
    /// The length of the hex-encoded tag.
    fn hex_len(&self) -> usize {
        match self {
            MacAlgorithm::Sha256 => 64,
            MacAlgorithm::Sha384 => 96,
            MacAlgorithm::Sha512 => 128,
        }
    }
}

/// HMAC-based [`MessageAuthenticator`].
///
/// The envelope is the lowercase hex-encoded tag followed by the message.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacAuthenticator {
    algorithm: MacAlgorithm,
}

impl HmacAuthenticator {
    /// Use the given hash function.
    pub fn new(algorithm: MacAlgorithm) -> Self {
        Self { algorithm }
    }

    /// The hash function in use.
    pub fn algorithm(&self) -> MacAlgorithm {
        self.algorithm
    }
}

fn tag<M: Mac + hmac::digest::KeyInit>(key: &[u8], message: &[u8]) -> Option<Vec<u8>> {
    let mut mac = <M as hmac::digest::KeyInit>::new_from_slice(key).ok()?;
    mac.update(message);
    Some(mac.finalize().into_bytes().to_vec())
}

fn verify<M: Mac + hmac::digest::KeyInit>(key: &[u8], message: &[u8], tag: &[u8]) -> bool {
    let Ok(mut mac) = <M as hmac::digest::KeyInit>::new_from_slice(key) else {
        return false;
    };
    mac.update(message);
    mac.verify_slice(tag).is_ok()
}

impl MessageAuthenticator for HmacAuthenticator {
    fn sign(&self, message: &str, key: &Key) -> Result<String, SigningFailed> {
        let key = key.expose();
        let tag = match self.algorithm {
            MacAlgorithm::Sha256 => tag::<Hmac<Sha256>>(key, message.as_bytes()),
            MacAlgorithm::Sha384 => tag::<Hmac<Sha384>>(key, message.as_bytes()),
            MacAlgorithm::Sha512 => tag::<Hmac<Sha512>>(key, message.as_bytes()),
        }
        .ok_or(SigningFailed)?;
        Ok(format!("{}{message}", hex::encode(tag)))
    }

    fn extract(&self, envelope: &str, key: &Key) -> Result<String, AuthenticationFailed> {
        let hex_len = self.algorithm.hex_len();
        let (Some(hex_tag), Some(message)) = (envelope.get(..hex_len), envelope.get(hex_len..))
        else {
            return Err(AuthenticationFailed);
        };
        let tag = hex::decode(hex_tag).map_err(|_| AuthenticationFailed)?;

        let key = key.expose();
        let is_valid = match self.algorithm {
            MacAlgorithm::Sha256 => verify::<Hmac<Sha256>>(key, message.as_bytes(), &tag),
            MacAlgorithm::Sha384 => verify::<Hmac<Sha384>>(key, message.as_bytes(), &tag),
            MacAlgorithm::Sha512 => verify::<Hmac<Sha512>>(key, message.as_bytes(), &tag),
        };
        if !is_valid {
            return Err(AuthenticationFailed);
        }
        Ok(message.to_owned())
    }
}
