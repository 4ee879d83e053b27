//! EMR client factory and operations
//!
//! [`EmrClient`] is the one surface callers use, identical across vendors.
//! The factory picks the vendor variant once, at construction; every
//! operation afterwards goes through the same session and variant.

use super::headers::merge_headers;
use super::vendor::{vendor_for, EmrVendor};
use crate::adapters::session::{RequestOptions, SessionHandle, SmartLauncher};
use crate::core::endpoints::EndpointRegistry;
use crate::core::hydrate::hydrate;
use crate::core::resolver::{resolve_session_vendor, resolve_vendor, VendorSource};
use crate::core::transform::{session_resource_from_response, to_canonical, to_session_shape};
use crate::domain::{ContextKind, EmrError, EndpointSet, Resource, Result, VendorTag};
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::sync::Arc;

/// Vendor-aware client over an authenticated session
///
/// There is no teardown; dropping the client releases its share of the
/// session.
#[derive(Clone)]
pub struct EmrClient {
    session: Arc<dyn SessionHandle>,
    vendor: &'static dyn EmrVendor,
    endpoints: EndpointRegistry,
}

impl std::fmt::Debug for EmrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmrClient")
            .field("server_url", &self.session.server_url())
            .field("vendor", &self.vendor.tag())
            .finish()
    }
}

impl EmrClient {
    /// Build a client for a session, resolving the vendor from its server URL
    ///
    /// # Errors
    ///
    /// Returns [`EmrError::UnsupportedVendor`] with [`VendorTag::None`] when
    /// the server URL is not recognized. Use [`EmrClient::with_vendor`] to
    /// pick a variant explicitly in that case.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use emrlink::adapters::emr::EmrClient;
    /// use emrlink::adapters::session::HttpSession;
    /// use emrlink::config::SessionConfig;
    /// use std::sync::Arc;
    ///
    /// # fn example() -> emrlink::domain::Result<()> {
    /// let session = HttpSession::new(&SessionConfig {
    ///     server_url: "https://fhir-ehr-code.cerner.com/r4/ec2458f2-1e24-41c8-b71b-0e701af7583d".to_string(),
    ///     ..Default::default()
    /// })?;
    /// let client = EmrClient::from_session(Arc::new(session))?;
    /// assert_eq!(client.vendor().display_name(), "Cerner");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_session(session: Arc<dyn SessionHandle>) -> Result<Self> {
        let tag = resolve_session_vendor(session.as_ref());
        Self::with_vendor(session, tag)
    }

    /// Build a client for a session with an explicit vendor
    pub fn with_vendor(session: Arc<dyn SessionHandle>, tag: VendorTag) -> Result<Self> {
        let vendor = vendor_for(tag).ok_or(EmrError::UnsupportedVendor(tag))?;
        crate::log_vendor_resolved!(tag, session.server_url());

        Ok(Self {
            session,
            vendor,
            endpoints: EndpointRegistry::new(),
        })
    }

    /// Wait for a SMART launch and build a client for its session
    ///
    /// The launch is awaited exactly once. The vendor comes from the
    /// session's server URL, then from the launch's token claims when the URL
    /// is not recognized.
    pub async fn connect(launcher: &dyn SmartLauncher) -> Result<Self> {
        let session = launcher.ready().await?;

        let mut tag = resolve_session_vendor(session.as_ref());
        if tag == VendorTag::None {
            if let Some(claims) = launcher.token_claims()? {
                tag = resolve_vendor(VendorSource::Token(&claims));
                tracing::debug!(vendor = %tag, "Resolved vendor from token claims");
            }
        }

        Self::with_vendor(session, tag)
    }

    /// Replace the endpoint registry, typically one built from configuration
    pub fn with_endpoint_registry(mut self, endpoints: EndpointRegistry) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// The vendor variant serving this client
    pub fn vendor(&self) -> &'static dyn EmrVendor {
        self.vendor
    }

    /// The underlying session
    pub fn session(&self) -> &Arc<dyn SessionHandle> {
        &self.session
    }

    /// Endpoint set of this client's vendor, overrides included
    pub fn endpoints(&self) -> Result<EndpointSet> {
        self.endpoints.lookup(self.vendor.tag())
    }

    /// Create a resource in the EMR
    ///
    /// The resource is hydrated with the session's context, then the vendor
    /// hook, before it is submitted. `headers` are merged under the vendor's
    /// create-header policy.
    ///
    /// # Errors
    ///
    /// - [`EmrError::MalformedResource`] / [`EmrError::MissingIdentifier`]
    ///   before anything is sent
    /// - [`EmrError::CreateFailed`] wrapping the session's error
    /// - [`EmrError::InvalidResponse`] when the response is not a resource
    pub async fn create(&self, resource: &Resource, headers: Option<HeaderMap>) -> Result<Resource> {
        let resource_type = resource.resource_type.clone();

        let mut shaped = to_session_shape(resource)?;
        hydrate(self.session.as_ref(), &mut shaped).await?;
        self.vendor
            .hydrate_extra(self.session.as_ref(), &mut shaped)
            .await?;

        let options = RequestOptions::post(resource_type.as_str()).with_headers(merge_headers(
            self.vendor.create_headers(),
            headers.unwrap_or_default(),
        ));

        let body = self
            .session
            .create(shaped, options)
            .await
            .map_err(|e| EmrError::create_failed(resource_type.as_str(), e))?;

        let created = session_resource_from_response(body)?;
        let id = created.get("id").and_then(Value::as_str).unwrap_or("-");
        tracing::info!(
            vendor = %self.vendor.tag(),
            resource_type = %resource_type,
            id,
            "Created resource"
        );

        to_canonical(created)
    }

    /// Read a resource by relative id (`Observation/123`) or absolute URL
    pub async fn read(&self, resource_id: &str, headers: Option<HeaderMap>) -> Result<Resource> {
        let options = RequestOptions::get(resource_id).with_headers(headers.unwrap_or_default());
        self.request_resource(options).await
    }

    /// Perform a request with the vendor's read-header policy applied
    ///
    /// # Errors
    ///
    /// Returns [`EmrError::InvalidResponse`] when the body is not a resource
    /// with a `resourceType`.
    pub async fn request_resource(&self, options: RequestOptions) -> Result<Resource> {
        let headers = merge_headers(self.vendor.read_headers(), options.headers);
        let options = RequestOptions {
            headers,
            ..options
        };
        let body = self.session.request(options).await?;
        to_canonical(session_resource_from_response(body)?)
    }

    /// Read the logged-in practitioner
    pub async fn get_practitioner_read(&self) -> Result<Resource> {
        self.read_context_entity(ContextKind::User).await
    }

    /// Read the patient in context
    pub async fn get_patient_read(&self) -> Result<Resource> {
        self.read_context_entity(ContextKind::Patient).await
    }

    /// Read the encounter in context
    pub async fn get_encounter_read(&self) -> Result<Resource> {
        self.read_context_entity(ContextKind::Encounter).await
    }

    async fn read_context_entity(&self, kind: ContextKind) -> Result<Resource> {
        let body = self.session.read_context(kind).await?;
        let entity = session_resource_from_response(body)?;

        let expected = kind.expected_resource_type();
        match entity.resource_type() {
            Some(actual) if actual == expected => to_canonical(entity),
            actual => Err(EmrError::UnexpectedResourceType {
                expected: expected.to_string(),
                actual: actual.unwrap_or_default().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionResource;
    use async_trait::async_trait;
    use serde_json::json;

    #[derive(Debug)]
    struct FixedSession {
        server_url: &'static str,
        user: Value,
    }

    #[async_trait]
    impl SessionHandle for FixedSession {
        fn server_url(&self) -> &str {
            self.server_url
        }

        async fn context_id(&self, kind: ContextKind) -> Result<Option<String>> {
            Ok(Some(format!("{kind}-1")))
        }

        async fn read_context(&self, _kind: ContextKind) -> Result<Value> {
            Ok(self.user.clone())
        }

        async fn create(&self, resource: SessionResource, _options: RequestOptions) -> Result<Value> {
            Ok(resource.into_value())
        }

        async fn request(&self, options: RequestOptions) -> Result<Value> {
            match options.url.split_once('/') {
                Some((resource_type, id)) => Ok(json!({"resourceType": resource_type, "id": id})),
                None => Ok(json!({"issue": "not a resource"})),
            }
        }
    }

    fn session(server_url: &'static str, user: Value) -> Arc<dyn SessionHandle> {
        Arc::new(FixedSession { server_url, user })
    }

    #[test]
    fn test_factory_resolves_from_server_url() {
        let client =
            EmrClient::from_session(session("https://fhir.epic.com/api/FHIR/R4", Value::Null))
                .unwrap();
        assert_eq!(client.vendor().tag(), VendorTag::Epic);
    }

    #[test]
    fn test_factory_rejects_unknown_vendor() {
        let err = EmrClient::from_session(session("https://fhir.example.org/r4", Value::Null))
            .unwrap_err();
        assert!(matches!(err, EmrError::UnsupportedVendor(VendorTag::None)));
    }

    #[test]
    fn test_with_vendor_overrides_resolution() {
        let client = EmrClient::with_vendor(
            session("https://fhir.example.org/r4", Value::Null),
            VendorTag::Smart,
        )
        .unwrap();
        assert_eq!(client.vendor().tag(), VendorTag::Smart);
        assert!(client.endpoints().is_err());
    }

    #[tokio::test]
    async fn test_practitioner_read_checks_resource_type() {
        let client = EmrClient::from_session(session(
            "https://fhir-ehr-code.cerner.com/r4/abc",
            json!({"resourceType": "Patient", "id": "p1"}),
        ))
        .unwrap();

        let err = client.get_practitioner_read().await.unwrap_err();
        assert!(matches!(
            err,
            EmrError::UnexpectedResourceType { ref expected, ref actual }
                if expected == "Practitioner" && actual == "Patient"
        ));

        let patient = client.get_patient_read().await.unwrap();
        assert_eq!(patient.id.as_deref(), Some("p1"));
    }

    #[tokio::test]
    async fn test_read_passes_resource_id() {
        let client =
            EmrClient::from_session(session("https://fhir.epic.com/api/FHIR/R4", Value::Null))
                .unwrap();
        let observation = client.read("Observation/9", None).await.unwrap();
        assert_eq!(observation.resource_type, "Observation");
        assert_eq!(observation.id.as_deref(), Some("9"));
    }

    #[tokio::test]
    async fn test_read_rejects_body_without_resource_type() {
        let client =
            EmrClient::from_session(session("https://fhir.epic.com/api/FHIR/R4", Value::Null))
                .unwrap();
        let err = client.read("metadata", None).await.unwrap_err();
        assert!(matches!(err, EmrError::InvalidResponse(_)));
    }
}
