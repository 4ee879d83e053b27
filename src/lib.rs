//! # emrlink - EMR vendor dispatch for SMART on FHIR
//!
//! emrlink sits between a SMART on FHIR app and the EMR it was launched from.
//! Given an authenticated session it works out which vendor is on the other
//! end (Epic, Cerner, eClinicalWorks, athenahealth, or a plain SMART server),
//! picks that vendor's client variant, and offers one uniform surface for
//! reading and creating FHIR resources.
//!
//! ## Architecture
//!
//! - [`domain`] - vendor tags, resources, token claims, errors
//! - [`core`] - vendor resolution, endpoint registry, transformation, hydration
//! - [`adapters`] - the session interface and the vendor-aware client
//! - [`config`] - TOML configuration with environment overrides
//! - [`logging`] - structured logging
//! - [`cli`] - the `emrlink` command-line interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use emrlink::adapters::emr::EmrClient;
//! use emrlink::adapters::session::StaticLauncher;
//! use emrlink::config::load_config;
//! use emrlink::domain::Resource;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("emrlink.toml")?;
//!     let launcher = StaticLauncher::new(config.session);
//!
//!     // Vendor is resolved from the session's server URL
//!     let client = EmrClient::connect(&launcher).await?;
//!     println!("Connected to {}", client.vendor().display_name());
//!
//!     // subject, encounter and period are filled in from the session
//!     let observation = Resource::new("Observation")
//!         .with_field("status", json!("final"))
//!         .with_field("code", json!({"text": "Heart rate"}));
//!     let created = client.create(&observation, None).await?;
//!     println!("Created Observation/{}", created.id.unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All library operations return [`domain::Result`]. Create failures wrap the
//! underlying session error:
//!
//! ```rust
//! use emrlink::domain::{EmrError, SessionError};
//!
//! let err = EmrError::create_failed(
//!     "Observation",
//!     SessionError::RequestFailed { status: 422, message: "invalid".into() }.into(),
//! );
//! assert!(err.is_transport());
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
