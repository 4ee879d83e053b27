//! Token-like inputs for vendor resolution
//!
//! A [`TokenClaims`] value is the decoded claim set of an access or id token.
//! Claims are inspected only to classify the vendor; signatures are the
//! launch handshake's business and are never checked here.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded token claims
///
/// # Examples
///
/// ```
/// use emrlink::domain::TokenClaims;
/// use serde_json::json;
///
/// let claims = TokenClaims::from_value(json!({"epic.eci": "abc", "sub": "u1"})).unwrap();
/// assert!(claims.contains("epic.eci"));
/// assert_eq!(claims.get_str("sub"), Some("u1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenClaims(Map<String, Value>);

impl TokenClaims {
    /// Wrap an already-decoded claim map
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// Narrow a JSON value to a claim set
    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(format!("token claims must be a JSON object, got {other}")),
        }
    }

    /// Decode the payload segment of a compact JWT
    ///
    /// The signature is not verified.
    pub fn from_jwt(token: &str) -> Result<Self, String> {
        let segments: Vec<&str> = token.trim().split('.').collect();
        if segments.len() != 3 {
            return Err(format!(
                "Invalid JWT: expected 3 segments, got {}",
                segments.len()
            ));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(segments[1].trim_end_matches('='))
            .map_err(|e| format!("Invalid JWT payload encoding: {e}"))?;

        let value: Value = serde_json::from_slice(&payload)
            .map_err(|e| format!("Invalid JWT payload JSON: {e}"))?;

        Self::from_value(value)
    }

    /// Returns true if the string looks like a compact JWT
    pub fn looks_like_jwt(candidate: &str) -> bool {
        let candidate = candidate.trim();
        candidate.split('.').count() == 3
            && candidate
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '='))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}
