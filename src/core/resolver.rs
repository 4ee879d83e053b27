//! Vendor identity resolution
//!
//! Classifies the EMR behind a session, a server URL or a token. Resolution
//! is a pure function of its input: the same URL always yields the same tag.
//!
//! Server URLs are matched against [`VENDOR_URL_TABLE`] in order and the first
//! matching substring wins. Substrings of different vendors can in principle
//! co-occur in one URL (a tenant host containing "epic" on another vendor's
//! domain, for example), in which case the earlier table entry takes
//! precedence. New entries must be checked against the existing ones for
//! such collisions.

use crate::adapters::session::SessionHandle;
use crate::domain::{EmrError, Result, TokenClaims, VendorTag};
use serde_json::Value;
use std::str::FromStr;

/// Ordered `(substring, vendor)` table used for server URL matching
pub const VENDOR_URL_TABLE: [(&str, VendorTag); 6] = [
    ("cerner", VendorTag::Cerner),
    ("smarthealthit", VendorTag::Smart),
    ("epic", VendorTag::Epic),
    ("ecw", VendorTag::Ecw),
    ("platform.athenahealth.com", VendorTag::Athena),
    ("fhirapi.athenahealth.com", VendorTag::AthenaPractice),
];

/// Claim keys only Epic puts into its launch tokens
pub const EPIC_CLAIM_KEYS: [&str; 2] = ["epic.dstu2.patient", "epic.eci"];

/// Something a vendor can be resolved from
#[derive(Debug, Clone, Copy)]
pub enum VendorSource<'a> {
    /// FHIR server URL of a session
    ServerUrl(&'a str),

    /// Claims of a token that carries no server URL
    Token(&'a TokenClaims),
}

/// Resolve the vendor for a session or token
///
/// Returns [`VendorTag::None`] when nothing matches; that is a valid result,
/// not an error.
///
/// # Example
///
/// ```
/// use emrlink::core::resolver::{resolve_vendor, VendorSource};
/// use emrlink::domain::VendorTag;
///
/// let tag = resolve_vendor(VendorSource::ServerUrl("https://fhir-ehr-code.cerner.com/r4/abc"));
/// assert_eq!(tag, VendorTag::Cerner);
///
/// let tag = resolve_vendor(VendorSource::ServerUrl("https://fhir.example.org/r4"));
/// assert_eq!(tag, VendorTag::None);
/// ```
pub fn resolve_vendor(source: VendorSource<'_>) -> VendorTag {
    match source {
        VendorSource::ServerUrl(url) => resolve_server_url(url),
        VendorSource::Token(claims) => resolve_token(claims),
    }
}

/// Resolve the vendor a session is bound to, from its server URL
pub fn resolve_session_vendor(session: &dyn SessionHandle) -> VendorTag {
    resolve_vendor(VendorSource::ServerUrl(session.server_url()))
}

fn resolve_server_url(url: &str) -> VendorTag {
    let url = url.to_ascii_lowercase();
    VENDOR_URL_TABLE
        .iter()
        .find(|(needle, _)| url.contains(needle))
        .map(|(_, vendor)| *vendor)
        .unwrap_or(VendorTag::None)
}

fn resolve_token(claims: &TokenClaims) -> VendorTag {
    if EPIC_CLAIM_KEYS.iter().any(|key| claims.contains(key)) {
        VendorTag::Epic
    } else {
        VendorTag::None
    }
}

/// Resolve a vendor from an untyped value
///
/// Accepted shapes:
/// - a vendor tag name (`"EPIC"`, `"athenapractice"`)
/// - a compact JWT string, resolved from its claims
/// - an object with a string `serverUrl` member, resolved from the URL
/// - any other object, treated as a token claim set
///
/// # Errors
///
/// Returns [`EmrError::InvalidInput`] for every other value.
pub fn resolve_vendor_from_opaque(value: &Value) -> Result<VendorTag> {
    match value {
        Value::String(s) => {
            if let Ok(tag) = VendorTag::from_str(s) {
                return Ok(tag);
            }
            if TokenClaims::looks_like_jwt(s) {
                let claims = TokenClaims::from_jwt(s).map_err(EmrError::InvalidInput)?;
                return Ok(resolve_vendor(VendorSource::Token(&claims)));
            }
            Err(EmrError::InvalidInput(format!(
                "'{s}' is neither a vendor tag nor a JWT"
            )))
        }
        Value::Object(map) => match map.get("serverUrl") {
            Some(Value::String(url)) => Ok(resolve_vendor(VendorSource::ServerUrl(url))),
            Some(other) => Err(EmrError::InvalidInput(format!(
                "serverUrl must be a string, got {other}"
            ))),
            None => {
                let claims = TokenClaims::new(map.clone());
                Ok(resolve_vendor(VendorSource::Token(&claims)))
            }
        },
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) => Err(
            EmrError::InvalidInput(format!("cannot resolve a vendor from {value}")),
        ),
    }
}
