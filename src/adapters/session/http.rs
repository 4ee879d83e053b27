//! HTTP session implementation
//!
//! [`HttpSession`] is a [`SessionHandle`] over `reqwest` for a SMART launch
//! that has already completed: it holds the bearer token and the launch
//! context and talks to the FHIR server directly. There are no retries;
//! every failure is returned to the caller as a [`SessionError`].

use super::{RequestOptions, SessionHandle};
use crate::config::{SecretString, SessionConfig};
use crate::domain::{ContextKind, EmrError, Result, SessionError, SessionResource};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

/// SMART session backed by a reqwest client
///
/// # Example
///
/// ```no_run
/// use emrlink::adapters::session::{HttpSession, SessionHandle};
/// use emrlink::config::{secret_string, SessionConfig};
///
/// # fn example() -> emrlink::domain::Result<()> {
/// let config = SessionConfig {
///     server_url: "https://fhir.epic.com/interconnect-fhir-oauth/api/FHIR/R4".to_string(),
///     access_token: Some(secret_string("eyJhbGciOi...".to_string())),
///     patient: Some("erXuFYUfucBZaryVksYEcMg3".to_string()),
///     ..Default::default()
/// };
/// let session = HttpSession::new(&config)?;
/// assert!(session.server_url().ends_with("/R4"));
/// # Ok(())
/// # }
/// ```
pub struct HttpSession {
    /// FHIR base URL, without trailing slash
    server_url: String,

    /// HTTP client for making requests
    client: Client,

    /// Bearer token, if the server needs one
    access_token: Option<SecretString>,

    patient: Option<String>,
    encounter: Option<String>,

    /// Logged-in user as `Type/id`
    fhir_user: Option<String>,
}

impl std::fmt::Debug for HttpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSession")
            .field("server_url", &self.server_url)
            .field("patient", &self.patient)
            .field("encounter", &self.encounter)
            .field("fhir_user", &self.fhir_user)
            .finish_non_exhaustive()
    }
}

impl HttpSession {
    /// Create a session from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            tracing::warn!(
                server_url = %config.server_url,
                "TLS certificate verification is DISABLED for the FHIR server. \
                 Only use this against development servers."
            );
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| EmrError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            server_url: config.server_url.trim_end_matches('/').to_string(),
            client,
            access_token: config.access_token.clone(),
            patient: config.patient.clone(),
            encounter: config.encounter.clone(),
            fhir_user: config.fhir_user.clone(),
        })
    }

    /// Absolute URL for a relative or absolute request URL
    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.server_url, url.trim_start_matches('/'))
        }
    }

    /// Relative reference for a context entity
    fn entity_path(&self, kind: ContextKind) -> Result<String> {
        match kind {
            ContextKind::Patient => {
                let id = present(&self.patient, kind)?;
                Ok(format!("Patient/{id}"))
            }
            ContextKind::Encounter => {
                let id = present(&self.encounter, kind)?;
                Ok(format!("Encounter/{id}"))
            }
            ContextKind::User => {
                let user = present(&self.fhir_user, kind)?;
                if user.contains('/') {
                    Ok(user.to_string())
                } else {
                    Ok(format!("Practitioner/{user}"))
                }
            }
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.access_token {
            Some(ref token) if !token.expose_secret().is_blank() => {
                let token: &str = token.expose_secret().as_ref();
                request.bearer_auth(token)
            }
            _ => request,
        }
    }

    /// Send a request and decode the body
    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Value> {
        let resp = self.authorize(request).send().await.map_err(|e| {
            let err = if e.is_timeout() {
                SessionError::Timeout(e.to_string())
            } else {
                SessionError::ConnectionFailed(e.to_string())
            };
            crate::log_session_failure!(url, &err);
            err
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let err = SessionError::RequestFailed {
                status: status.as_u16(),
                message: body,
            };
            crate::log_session_failure!(url, &err);
            return Err(err.into());
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| SessionError::InvalidResponse(e.to_string()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        let body = serde_json::from_slice(&bytes)
            .map_err(|e| SessionError::InvalidResponse(format!("Invalid JSON body: {e}")))?;
        Ok(body)
    }
}

/// A context id that is set and not blank
fn present(value: &Option<String>, kind: ContextKind) -> Result<&str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or(EmrError::MissingIdentifier(kind))
}

#[async_trait]
impl SessionHandle for HttpSession {
    fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn context_id(&self, kind: ContextKind) -> Result<Option<String>> {
        let id = match kind {
            ContextKind::Patient => self.patient.clone(),
            ContextKind::Encounter => self.encounter.clone(),
            ContextKind::User => self
                .fhir_user
                .as_deref()
                .and_then(|user| user.rsplit('/').next())
                .map(str::to_string),
        };
        Ok(id.filter(|id| !id.trim().is_empty()))
    }

    async fn read_context(&self, kind: ContextKind) -> Result<Value> {
        let url = self.resolve_url(&self.entity_path(kind)?);
        tracing::debug!(url = %url, entity = %kind, "Reading context entity");
        self.send(self.client.get(&url), &url).await
    }

    async fn create(&self, resource: SessionResource, options: RequestOptions) -> Result<Value> {
        let url = self.resolve_url(&options.url);
        tracing::debug!(
            url = %url,
            resource_type = resource.resource_type().unwrap_or("unknown"),
            "Submitting resource"
        );

        let request = self
            .client
            .request(options.method, &url)
            .headers(options.headers)
            .json(&resource);
        self.send(request, &url).await
    }

    async fn request(&self, options: RequestOptions) -> Result<Value> {
        let url = self.resolve_url(&options.url);
        tracing::debug!(url = %url, method = %options.method, "Sending request");

        let request = self
            .client
            .request(options.method, &url)
            .headers(options.headers);
        self.send(request, &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(fhir_user: Option<&str>) -> HttpSession {
        let config = SessionConfig {
            server_url: "https://fhir.example.org/r4/".to_string(),
            patient: Some("pat-1".to_string()),
            fhir_user: fhir_user.map(str::to_string),
            ..Default::default()
        };
        HttpSession::new(&config).unwrap()
    }

    #[test]
    fn test_resolve_url() {
        let session = session(None);
        assert_eq!(session.server_url(), "https://fhir.example.org/r4");
        assert_eq!(
            session.resolve_url("Patient/1"),
            "https://fhir.example.org/r4/Patient/1"
        );
        assert_eq!(
            session.resolve_url("/Patient/1"),
            "https://fhir.example.org/r4/Patient/1"
        );
        assert_eq!(
            session.resolve_url("https://other.example.org/Binary/2"),
            "https://other.example.org/Binary/2"
        );
    }

    #[test]
    fn test_entity_path_for_user() {
        assert_eq!(
            session(Some("Practitioner/p-9")).entity_path(ContextKind::User).unwrap(),
            "Practitioner/p-9"
        );
        assert_eq!(
            session(Some("p-9")).entity_path(ContextKind::User).unwrap(),
            "Practitioner/p-9"
        );
        assert!(matches!(
            session(None).entity_path(ContextKind::Encounter),
            Err(EmrError::MissingIdentifier(ContextKind::Encounter))
        ));
    }

    #[test]
    fn test_entity_path_rejects_blank_ids() {
        let config = SessionConfig {
            server_url: "https://fhir.example.org/r4".to_string(),
            patient: Some(String::new()),
            encounter: Some("  ".to_string()),
            ..Default::default()
        };
        let session = HttpSession::new(&config).unwrap();

        assert!(matches!(
            session.entity_path(ContextKind::Patient),
            Err(EmrError::MissingIdentifier(ContextKind::Patient))
        ));
        assert!(matches!(
            session.entity_path(ContextKind::Encounter),
            Err(EmrError::MissingIdentifier(ContextKind::Encounter))
        ));
    }

    #[tokio::test]
    async fn test_context_id_of_user_is_last_segment() {
        let session = session(Some("Practitioner/p-9"));
        assert_eq!(
            session.context_id(ContextKind::User).await.unwrap().as_deref(),
            Some("p-9")
        );
        assert_eq!(session.context_id(ContextKind::Encounter).await.unwrap(), None);
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let config = SessionConfig {
            access_token: Some(crate::config::secret_string("super-secret".to_string())),
            ..Default::default()
        };
        let session = HttpSession::new(&config).unwrap();
        assert!(!format!("{session:?}").contains("super-secret"));
    }
}
