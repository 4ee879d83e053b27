//! Session handle trait definition
//!
//! This module defines the narrow interface emrlink consumes from the SMART
//! launch collaborator: an authenticated [`SessionHandle`] and the
//! [`SmartLauncher`] that produces it. Vendor clients never own the session
//! lifecycle, they only hold a shared reference to it.

use crate::domain::{ContextKind, Result, SessionResource, TokenClaims};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

/// Options for a single session request
///
/// `url` is either relative to the session's server URL (`Patient/123`) or
/// absolute.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Relative or absolute request URL
    pub url: String,

    /// HTTP method
    pub method: Method,

    /// Request headers
    pub headers: HeaderMap,
}

impl RequestOptions {
    /// GET request options for `url`
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            headers: HeaderMap::new(),
        }
    }

    /// POST request options for `url`
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::POST,
            headers: HeaderMap::new(),
        }
    }

    /// Add or replace a header
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace all headers
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Authenticated clinical session
///
/// Implementations wrap whatever completed the SMART launch. The context
/// identifiers are deferred: resolving them may suspend, and may yield
/// nothing when the launch carried no such context.
///
/// Implementations are not required to be reentrant. Callers should issue
/// one operation at a time per session unless the implementation says
/// otherwise.
#[async_trait]
pub trait SessionHandle: Send + Sync {
    /// FHIR base URL the session is bound to
    fn server_url(&self) -> &str;

    /// Resolve the identifier of a context entity
    ///
    /// Returns `Ok(None)` when the session has no such context.
    async fn context_id(&self, kind: ContextKind) -> Result<Option<String>>;

    /// Read the full context entity as raw JSON
    async fn read_context(&self, kind: ContextKind) -> Result<Value>;

    /// Submit a new resource
    ///
    /// Returns the raw response body; `Value::Null` when the server sent none.
    async fn create(&self, resource: SessionResource, options: RequestOptions) -> Result<Value>;

    /// Perform a generic request and return the raw response body
    async fn request(&self, options: RequestOptions) -> Result<Value>;
}

/// Completed SMART launch
///
/// Consumed once, when a client is built through
/// [`EmrClient::connect`](crate::adapters::emr::EmrClient::connect).
#[async_trait]
pub trait SmartLauncher: Send + Sync {
    /// Wait for the launch to finish and hand out the session
    async fn ready(&self) -> Result<Arc<dyn SessionHandle>>;

    /// Claims of the launch's id token, when the launch produced one
    ///
    /// Used to resolve the vendor when the server URL is not recognized.
    fn token_claims(&self) -> Result<Option<TokenClaims>> {
        Ok(None)
    }
}
