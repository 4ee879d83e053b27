//! Configuration management for emrlink.
//!
//! emrlink uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `EMRLINK_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [session]
//! server_url = "https://fhir.epic.com/interconnect-fhir-oauth/api/FHIR/R4"
//! access_token = "${EMRLINK_ACCESS_TOKEN}"
//! patient = "erXuFYUfucBZaryVksYEcMg3"
//! encounter = "eGmO0h.1.UQQ6TwWqYDlw1w3"
//! fhir_user = "Practitioner/eM5CWtq15N0WJeuCet5bJlQ3"
//!
//! # Replace Epic's sandbox endpoints with a production tenant
//! [endpoints.epic]
//! token = "https://epic.example.org/interconnect/oauth2/token"
//! r4 = "https://epic.example.org/interconnect/api/FHIR/R4/"
//! auth = "https://epic.example.org/interconnect/oauth2/authorize"
//!
//! [logging]
//! local_enabled = true
//! local_path = "/var/log/emrlink"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use emrlink::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("emrlink.toml")?;
//! println!("FHIR server: {}", config.session.server_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, EmrConfig, EndpointOverride, Environment, LoggingConfig, SessionConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
