//! The cryptographic primitives used to protect cookie values.
//!
//! [`Encryptor`](crate::Encryptor) and [`Signer`](crate::Signer) only rely on the
//! [`Cipher`] and [`MessageAuthenticator`] traits.
//! The default implementations are [`Aes256GcmCipher`] and [`HmacAuthenticator`].
mod authenticator;
mod cipher;
mod key;

pub use authenticator::{HmacAuthenticator, MacAlgorithm, MessageAuthenticator};
pub use cipher::{Aes256GcmCipher, Cipher};
pub use key::Key;
