//! Configuration schema types
//!
//! This module defines the configuration structure for emrlink.

use crate::config::SecretString;
use crate::core::endpoints::construct_endpoints;
use crate::domain::VendorTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main emrlink configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmrConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Completed SMART session to operate on
    pub session: SessionConfig,

    /// Per-vendor endpoint overrides, keyed by vendor name
    #[serde(default)]
    pub endpoints: BTreeMap<VendorTag, EndpointOverride>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EmrConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.session.validate(&self.environment)?;

        for (vendor, endpoints) in &self.endpoints {
            endpoints
                .validate(*vendor)
                .map_err(|e| format!("endpoints.{}: {e}", vendor.as_str().to_lowercase()))?;
        }

        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Completed SMART session settings
///
/// These are the values a finished SMART launch hands over: the FHIR server
/// the app is bound to, the access token and the launch context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// FHIR base URL of the EMR
    pub server_url: String,

    /// Bearer access token from the token response
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// OpenID Connect id token (compact JWT) from the token response
    ///
    /// Only its claims are read, for vendor resolution when `server_url`
    /// is not recognized.
    #[serde(default)]
    pub id_token: Option<SecretString>,

    /// Patient in context (`patient` from the token response)
    #[serde(default)]
    pub patient: Option<String>,

    /// Encounter in context (`encounter` from the token response)
    #[serde(default)]
    pub encounter: Option<String>,

    /// Logged-in user as a FHIR reference, e.g. `Practitioner/123`
    #[serde(default)]
    pub fhir_user: Option<String>,

    /// Force a vendor instead of resolving it from `server_url`
    #[serde(default)]
    pub vendor: Option<VendorTag>,

    /// TLS certificate verification enabled
    ///
    /// Cannot be disabled in production environments.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Transport timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl SessionConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        if self.server_url.is_empty() {
            return Err("session.server_url cannot be empty".to_string());
        }

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err("session.server_url must start with http:// or https://".to_string());
        }

        if let Some(ref user) = self.fhir_user {
            if user.trim().is_empty() {
                return Err("session.fhir_user cannot be empty when set".to_string());
            }
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 600 {
            return Err(format!(
                "session.timeout_seconds must be between 1 and 600, got {}",
                self.timeout_seconds
            ));
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments"
                    .to_string(),
            );
        }

        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: "https://launch.smarthealthit.org/v/r4/fhir".to_string(),
            access_token: None,
            id_token: None,
            patient: None,
            encounter: None,
            fhir_user: None,
            vendor: None,
            tls_verify: true,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Replacement endpoint triple for one vendor
///
/// All three URLs must be given; a partial override is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointOverride {
    /// OAuth2 token endpoint
    #[serde(default)]
    pub token: Option<String>,

    /// FHIR R4 base URL
    #[serde(default)]
    pub r4: Option<String>,

    /// OAuth2 authorize endpoint
    #[serde(default)]
    pub auth: Option<String>,
}

impl EndpointOverride {
    fn validate(&self, vendor: VendorTag) -> Result<(), String> {
        if matches!(vendor, VendorTag::Smart | VendorTag::None) {
            return Err(format!("{vendor} does not take an endpoint set"));
        }

        construct_endpoints(self.token.as_deref(), self.r4.as_deref(), self.auth.as_deref())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
