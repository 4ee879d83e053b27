//! Secure credential handling using the secrecy crate
//!
//! Access tokens are held in `Secret<SecretValue>`: zeroed on drop, redacted
//! in `Debug` output, and only readable through `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use emrlink::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("eyJhbGciOi...".to_string());
//! let exposed: &str = token.expose_secret().as_ref();
//! assert_eq!(exposed, "eyJhbGciOi...");
//! assert!(!format!("{token:?}").contains("eyJhbGciOi"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Token text that may only live inside a [`Secret`]
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// True for empty or whitespace-only values, which count as no token
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

pub type SecretString = Secret<SecretValue>;

/// Wrap a token in a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
