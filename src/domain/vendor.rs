//! Vendor tags and endpoint sets
//!
//! [`VendorTag`] classifies the EMR behind a session. [`EndpointSet`] is the
//! validated triple of OAuth and FHIR endpoints for one vendor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// EMR vendor classification
///
/// `None` is a valid, terminal classification meaning "unrecognized vendor".
/// It is returned by resolution instead of an error and callers decide what
/// to do with it.
///
/// # Examples
///
/// ```
/// use emrlink::domain::VendorTag;
/// use std::str::FromStr;
///
/// let tag = VendorTag::from_str("athenapractice").unwrap();
/// assert_eq!(tag, VendorTag::AthenaPractice);
/// assert_eq!(tag.to_string(), "ATHENAPRACTICE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VendorTag {
    Epic,
    Cerner,
    Ecw,
    Athena,
    AthenaPractice,
    Smart,
    None,
}

impl VendorTag {
    /// All tags, in declaration order
    pub const ALL: [VendorTag; 7] = [
        VendorTag::Epic,
        VendorTag::Cerner,
        VendorTag::Ecw,
        VendorTag::Athena,
        VendorTag::AthenaPractice,
        VendorTag::Smart,
        VendorTag::None,
    ];

    /// Canonical upper-case name of the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorTag::Epic => "EPIC",
            VendorTag::Cerner => "CERNER",
            VendorTag::Ecw => "ECW",
            VendorTag::Athena => "ATHENA",
            VendorTag::AthenaPractice => "ATHENAPRACTICE",
            VendorTag::Smart => "SMART",
            VendorTag::None => "NONE",
        }
    }

    /// Returns false only for the unrecognized-vendor tag
    pub fn is_recognized(&self) -> bool {
        !matches!(self, VendorTag::None)
    }
}

impl fmt::Display for VendorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        VendorTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == upper)
            .ok_or_else(|| format!("Unknown vendor tag '{s}'"))
    }
}

impl TryFrom<String> for VendorTag {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VendorTag> for String {
    fn from(tag: VendorTag) -> Self {
        tag.as_str().to_string()
    }
}

/// Validated endpoint triple for one vendor
///
/// Built through [`construct_endpoints`](crate::core::endpoints::construct_endpoints),
/// which rejects partially defined triples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSet {
    /// OAuth2 token endpoint
    pub token: String,

    /// FHIR R4 base URL
    pub r4: String,

    /// OAuth2 authorize endpoint
    pub auth: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_tag_parse_case_insensitive() {
        assert_eq!(VendorTag::from_str("epic").unwrap(), VendorTag::Epic);
        assert_eq!(VendorTag::from_str(" Cerner ").unwrap(), VendorTag::Cerner);
        assert_eq!(VendorTag::from_str("NONE").unwrap(), VendorTag::None);
        assert!(VendorTag::from_str("meditech").is_err());
    }

    #[test]
    fn test_vendor_tag_display_round_trip() {
        for tag in VendorTag::ALL {
            assert_eq!(VendorTag::from_str(&tag.to_string()).unwrap(), tag);
        }
    }

    #[test]
    fn test_vendor_tag_serde() {
        let json = serde_json::to_string(&VendorTag::AthenaPractice).unwrap();
        assert_eq!(json, "\"ATHENAPRACTICE\"");

        let tag: VendorTag = serde_json::from_str("\"ecw\"").unwrap();
        assert_eq!(tag, VendorTag::Ecw);
        assert!(serde_json::from_str::<VendorTag>("\"unknown\"").is_err());
    }

    #[test]
    fn test_none_is_not_recognized() {
        assert!(!VendorTag::None.is_recognized());
        assert!(VendorTag::Smart.is_recognized());
    }
}
