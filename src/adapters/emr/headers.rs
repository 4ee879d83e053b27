//! Vendor request-header policy
//!
//! Each vendor declares the headers it wants on reads and creates. A header
//! is either [`HeaderRule::Mandatory`], which always replaces whatever the
//! caller passed, or [`HeaderRule::Overridable`], which the caller may override.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// FHIR JSON media type
pub const FHIR_JSON: &str = "application/fhir+json";

/// How a vendor header combines with caller headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRule {
    /// The vendor value always wins
    Mandatory,
    /// Used only when the caller did not set the header
    Overridable,
}

/// A header a vendor puts on its requests
///
/// Names must be lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorHeader {
    pub name: &'static str,
    pub value: &'static str,
    pub rule: HeaderRule,
}

impl VendorHeader {
    pub const fn mandatory(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            value,
            rule: HeaderRule::Mandatory,
        }
    }

    pub const fn overridable(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            value,
            rule: HeaderRule::Overridable,
        }
    }
}

/// Merge vendor headers into caller headers according to their rules
pub fn merge_headers(vendor: &[VendorHeader], caller: HeaderMap) -> HeaderMap {
    let mut merged = caller;
    for header in vendor {
        let name = HeaderName::from_static(header.name);
        let value = HeaderValue::from_static(header.value);
        match header.rule {
            HeaderRule::Mandatory => {
                merged.insert(name, value);
            }
            HeaderRule::Overridable => {
                if !merged.contains_key(&name) {
                    merged.insert(name, value);
                }
            }
        }
    }
    merged
}
