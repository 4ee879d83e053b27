//! Endpoints command implementation

use super::report;
use crate::config::load_config;
use crate::core::endpoints::EndpointRegistry;
use crate::domain::VendorTag;
use clap::Args;
use std::path::Path;

/// Arguments for the endpoints command
#[derive(Args, Debug)]
pub struct EndpointsArgs {
    /// Vendor name (EPIC, CERNER, ECW, ATHENA, ATHENAPRACTICE)
    pub vendor: VendorTag,
}

impl EndpointsArgs {
    /// Execute the endpoints command
    ///
    /// Overrides from the configuration file apply when the file exists.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let registry = if Path::new(config_path).exists() {
            let registry = load_config(config_path)
                .and_then(|config| EndpointRegistry::with_overrides(&config.endpoints));
            match registry {
                Ok(r) => r,
                Err(e) => return Ok(report("Loading configuration", &e)),
            }
        } else {
            EndpointRegistry::new()
        };

        match registry.lookup(self.vendor) {
            Ok(endpoints) => {
                println!("Vendor:    {}", self.vendor);
                println!("Token:     {}", endpoints.token);
                println!("FHIR R4:   {}", endpoints.r4);
                println!("Authorize: {}", endpoints.auth);
                Ok(0)
            }
            Err(e) => Ok(report("Endpoint lookup", &e)),
        }
    }
}
