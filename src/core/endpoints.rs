//! Endpoint registry
//!
//! Every concrete vendor has one static endpoint triple. SMART and NONE have
//! none on purpose: there is no generic default, looking one up is an error.
//!
//! [`EndpointRegistry`] layers configuration overrides on top of the static
//! table, e.g. to point Epic at a production tenant instead of the sandbox.

use crate::config::EndpointOverride;
use crate::domain::{EmrError, EndpointSet, Result, VendorTag};
use std::collections::BTreeMap;
use url::Url;

/// Endpoint triple as declared by a vendor, before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticEndpoints {
    pub token: Option<&'static str>,
    pub r4: Option<&'static str>,
    pub auth: Option<&'static str>,
}

const EPIC_ENDPOINTS: StaticEndpoints = StaticEndpoints {
    token: Some("https://fhir.epic.com/interconnect-fhir-oauth/oauth2/token"),
    r4: Some("https://fhir.epic.com/interconnect-fhir-oauth/api/FHIR/R4/"),
    auth: Some("https://fhir.epic.com/interconnect-fhir-oauth/oauth2/authorize"),
};

const CERNER_ENDPOINTS: StaticEndpoints = StaticEndpoints {
    token: Some(
        "https://authorization.cerner.com/tenants/ec2458f2-1e24-41c8-b71b-0e701af7583d/protocols/oauth2/profiles/smart-v1/token",
    ),
    r4: Some("https://fhir-ehr-code.cerner.com/r4/ec2458f2-1e24-41c8-b71b-0e701af7583d/"),
    auth: Some(
        "https://authorization.cerner.com/tenants/ec2458f2-1e24-41c8-b71b-0e701af7583d/protocols/oauth2/profiles/smart-v1/personas/provider/authorize",
    ),
};

const ECW_ENDPOINTS: StaticEndpoints = StaticEndpoints {
    token: Some("https://staging-oauthserver.ecwcloud.com/oauth/oauth2/token"),
    r4: Some("https://staging-fhir.ecwcloud.com/fhir/r4/FFBJCD/"),
    auth: Some("https://staging-oauthserver.ecwcloud.com/oauth/oauth2/authorize"),
};

const ATHENA_ENDPOINTS: StaticEndpoints = StaticEndpoints {
    token: Some("https://api.preview.platform.athenahealth.com/oauth2/v1/token"),
    r4: Some("https://api.preview.platform.athenahealth.com/fhir/r4/"),
    auth: Some("https://api.preview.platform.athenahealth.com/oauth2/v1/authorize"),
};

const ATHENA_PRACTICE_ENDPOINTS: StaticEndpoints = StaticEndpoints {
    token: Some("https://ap22sandbox.fhirapi.athenahealth.com/demoAPIServer/oauth2/token"),
    r4: Some("https://ap22sandbox.fhirapi.athenahealth.com/demoAPIServer/fhir/r4/"),
    auth: Some("https://ap22sandbox.fhirapi.athenahealth.com/demoAPIServer/oauth2/authorize"),
};

/// Static endpoint declaration for a vendor, if it has one
pub fn static_endpoints(vendor: VendorTag) -> Option<&'static StaticEndpoints> {
    match vendor {
        VendorTag::Epic => Some(&EPIC_ENDPOINTS),
        VendorTag::Cerner => Some(&CERNER_ENDPOINTS),
        VendorTag::Ecw => Some(&ECW_ENDPOINTS),
        VendorTag::Athena => Some(&ATHENA_ENDPOINTS),
        VendorTag::AthenaPractice => Some(&ATHENA_PRACTICE_ENDPOINTS),
        VendorTag::Smart | VendorTag::None => None,
    }
}

/// Build a validated endpoint set
///
/// # Errors
///
/// - [`EmrError::MissingEndpoint`] naming the first undefined field
/// - [`EmrError::Configuration`] if a defined value is not an absolute
///   http(s) URL
///
/// # Example
///
/// ```
/// use emrlink::core::endpoints::construct_endpoints;
/// use emrlink::domain::EmrError;
///
/// let err = construct_endpoints(Some("https://a/token"), None, Some("https://a/authorize"))
///     .unwrap_err();
/// assert!(matches!(err, EmrError::MissingEndpoint { field: "r4" }));
/// ```
pub fn construct_endpoints(
    token: Option<&str>,
    r4: Option<&str>,
    auth: Option<&str>,
) -> Result<EndpointSet> {
    let token = require_endpoint("token", token)?;
    let r4 = require_endpoint("r4", r4)?;
    let auth = require_endpoint("auth", auth)?;

    Ok(EndpointSet { token, r4, auth })
}

fn require_endpoint(field: &'static str, value: Option<&str>) -> Result<String> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(EmrError::MissingEndpoint { field })?;

    let parsed = Url::parse(value).map_err(|e| {
        EmrError::Configuration(format!("Endpoint {field} '{value}' is not a valid URL: {e}"))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(EmrError::Configuration(format!(
            "Endpoint {field} '{value}' must use http or https"
        )));
    }

    Ok(value.to_string())
}

/// Built-in endpoint set for a vendor
///
/// # Errors
///
/// Returns [`EmrError::UnsupportedVendor`] for SMART and NONE.
pub fn endpoints_for(vendor: VendorTag) -> Result<EndpointSet> {
    let declared = static_endpoints(vendor).ok_or(EmrError::UnsupportedVendor(vendor))?;
    construct_endpoints(declared.token, declared.r4, declared.auth)
}

/// Endpoint lookup with configuration overrides
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    overrides: BTreeMap<VendorTag, EndpointSet>,
}

impl EndpointRegistry {
    /// Registry with only the built-in endpoint sets
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with overrides taken from configuration
    ///
    /// # Errors
    ///
    /// Fails on the first partial or invalid override, or on an override for
    /// SMART/NONE.
    pub fn with_overrides(overrides: &BTreeMap<VendorTag, EndpointOverride>) -> Result<Self> {
        let mut registry = Self::new();
        for (vendor, endpoint) in overrides {
            if static_endpoints(*vendor).is_none() {
                return Err(EmrError::UnsupportedVendor(*vendor));
            }

            let set = construct_endpoints(
                endpoint.token.as_deref(),
                endpoint.r4.as_deref(),
                endpoint.auth.as_deref(),
            )?;
            tracing::debug!(vendor = %vendor, r4 = %set.r4, "Registered endpoint override");
            registry.overrides.insert(*vendor, set);
        }
        Ok(registry)
    }

    /// Endpoint set for a vendor, preferring an override
    pub fn lookup(&self, vendor: VendorTag) -> Result<EndpointSet> {
        match self.overrides.get(&vendor) {
            Some(set) => Ok(set.clone()),
            None => endpoints_for(vendor),
        }
    }
}
