use std::sync::Arc;

use secrecy::{ExposeSecret, SecretBox, SecretSlice};

use crate::errors::EmptyKeyError;

/// The secret key shared by [`Encryptor`](crate::Encryptor) and [`Signer`](crate::Signer).
///
/// Cloning a `Key` is cheap: the underlying bytes are reference-counted.
/// The bytes are redacted in `Debug` output and zeroed out when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct Key(Arc<SecretSlice<u8>>);

impl Key {
    /// Build a key out of raw bytes.
    ///
    /// It fails if `bytes` is empty.
    pub fn try_from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, EmptyKeyError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(EmptyKeyError);
        }
        Ok(Self(Arc::new(SecretBox::new(bytes.into_boxed_slice()))))
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }
}

impl<'de> serde::Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Key::try_from_bytes(raw).map_err(serde::de::Error::custom)
    }
}
