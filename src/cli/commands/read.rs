//! Read command implementation

use super::{connect, report};
use crate::config::load_config;
use clap::Args;

/// Arguments for the read command
#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Resource to read, e.g. `Observation/123`, or an absolute URL
    pub resource_id: String,
}

impl ReadArgs {
    /// Execute the read command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(report("Loading configuration", &e)),
        };

        let client = match connect(&config).await {
            Ok(c) => c,
            Err(e) => return Ok(report("Connecting", &e)),
        };

        match client.read(&self.resource_id, None).await {
            Ok(body) => {
                println!("{}", serde_json::to_string_pretty(&body)?);
                Ok(0)
            }
            Err(e) => Ok(report(&format!("Reading {}", self.resource_id), &e)),
        }
    }
}
