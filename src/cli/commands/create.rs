//! Create command implementation

use super::{connect, report};
use crate::config::load_config;
use crate::domain::{EmrError, Resource};
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// JSON file holding the resource to create
    pub file: PathBuf,
}

impl CreateArgs {
    /// Execute the create command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let resource = match read_resource(&self.file) {
            Ok(r) => r,
            Err(e) => return Ok(report("Reading resource file", &e)),
        };

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(report("Loading configuration", &e)),
        };

        let client = match connect(&config).await {
            Ok(c) => c,
            Err(e) => return Ok(report("Connecting", &e)),
        };

        match client.create(&resource, None).await {
            Ok(created) => {
                println!("{}", serde_json::to_string_pretty(&created)?);
                Ok(0)
            }
            Err(e) => Ok(report(&format!("Creating {}", resource.resource_type), &e)),
        }
    }
}

fn read_resource(path: &Path) -> Result<Resource, EmrError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| EmrError::MalformedResource(format!("{}: {e}", path.display())))
}
