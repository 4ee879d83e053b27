//! Domain error types
//!
//! This module defines the error hierarchy for emrlink. Errors never expose
//! third-party HTTP client types; transport failures are captured as
//! [`SessionError`] values with plain string context.

use super::resource::ContextKind;
use super::vendor::VendorTag;
use thiserror::Error;

/// Main emrlink error type
///
/// Every fallible library operation returns this type. Variants map onto the
/// error kinds the client surface distinguishes: configuration, resolution,
/// hydration, transport and validation.
#[derive(Debug, Error)]
pub enum EmrError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A vendor endpoint triple was only partially defined
    #[error("Missing endpoint definition: {field} is not defined")]
    MissingEndpoint {
        /// Name of the missing field (`token`, `r4` or `auth`)
        field: &'static str,
    },

    /// Endpoint lookup for a vendor that has no static endpoint triple
    #[error("Unsupported vendor: {0} has no known endpoint set")]
    UnsupportedVendor(VendorTag),

    /// Input to vendor resolution was neither a token, a server URL nor a vendor tag
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A resource without a usable `resourceType` discriminant
    #[error("Malformed resource: {0}")]
    MalformedResource(String),

    /// A session identifier required for hydration resolved to nothing
    #[error("Missing identifier: session has no {0} id")]
    MissingIdentifier(ContextKind),

    /// The session failed to create a resource
    #[error("Failed to create {resource_type}: {source}")]
    CreateFailed {
        /// Type of the resource that was being created
        resource_type: String,
        /// The underlying failure
        #[source]
        source: Box<EmrError>,
    },

    /// The server answered with something that is not a FHIR resource
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A session entity resolved to a different resource type than expected
    #[error("Unexpected resource type: expected {expected}, got {actual}")]
    UnexpectedResourceType {
        /// The resource type the caller asked for
        expected: String,
        /// The resource type the server returned
        actual: String,
    },

    /// Session transport errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Session transport errors
///
/// Errors raised by a [`SessionHandle`](crate::adapters::session::SessionHandle)
/// while talking to the EMR. These are wrapped, never swallowed, by the
/// vendor client.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Failed to reach the FHIR server
    #[error("Failed to connect to FHIR server: {0}")]
    ConnectionFailed(String),

    /// The FHIR server rejected the request
    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// The body could not be decoded
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl EmrError {
    /// Wraps a failure raised while submitting a resource
    pub fn create_failed(resource_type: impl Into<String>, source: EmrError) -> Self {
        EmrError::CreateFailed {
            resource_type: resource_type.into(),
            source: Box::new(source),
        }
    }

    /// Returns true for errors raised by the session transport
    pub fn is_transport(&self) -> bool {
        match self {
            EmrError::Session(_) => true,
            EmrError::CreateFailed { source, .. } => source.is_transport(),
            _ => false,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for EmrError {
    fn from(err: std::io::Error) -> Self {
        EmrError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for EmrError {
    fn from(err: serde_json::Error) -> Self {
        EmrError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for EmrError {
    fn from(err: toml::de::Error) -> Self {
        EmrError::Configuration(format!("TOML parse error: {err}"))
    }
}
