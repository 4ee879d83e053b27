//! Validate config command implementation
//!
//! Loads and validates the configuration file, then prints a summary.

use crate::config::load_config;
use crate::core::endpoints::EndpointRegistry;
use crate::core::resolver::{resolve_vendor, VendorSource};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates, including endpoint overrides
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = EndpointRegistry::with_overrides(&config.endpoints) {
            println!("❌ Endpoint overrides are invalid");
            println!("   Error: {e}");
            return Ok(3);
        }

        let resolved = resolve_vendor(VendorSource::ServerUrl(&config.session.server_url));

        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  FHIR Server: {}", config.session.server_url);
        match config.session.vendor {
            Some(tag) => println!("  Vendor: {tag} (configured)"),
            None => println!("  Vendor: {resolved} (resolved from server URL)"),
        }
        println!(
            "  Access Token: {}",
            if config.session.access_token.is_some() {
                "set"
            } else {
                "not set"
            }
        );
        println!("  Patient: {}", config.session.patient.as_deref().unwrap_or("-"));
        println!(
            "  Encounter: {}",
            config.session.encounter.as_deref().unwrap_or("-")
        );
        println!("  User: {}", config.session.fhir_user.as_deref().unwrap_or("-"));
        println!("  TLS Verify: {}", config.session.tls_verify);
        println!(
            "  Endpoint Overrides: {}",
            if config.endpoints.is_empty() {
                "none".to_string()
            } else {
                config
                    .endpoints
                    .keys()
                    .map(|tag| tag.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        );
        println!();

        Ok(0)
    }
}
