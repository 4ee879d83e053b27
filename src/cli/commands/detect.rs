//! Detect command implementation
//!
//! Resolves a vendor without touching configuration or the network.

use super::report;
use crate::core::resolver::{resolve_vendor, resolve_vendor_from_opaque, VendorSource};
use crate::domain::{EmrError, Result, VendorTag};
use clap::Args;
use serde_json::Value;

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Server URL, compact JWT, vendor name, or JSON object
    pub input: String,
}

impl DetectArgs {
    /// Execute the detect command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        match detect(&self.input) {
            Ok(VendorTag::None) => {
                println!("{}", VendorTag::None);
                println!("No known vendor matches this input");
                Ok(0)
            }
            Ok(tag) => {
                println!("{tag}");
                Ok(0)
            }
            Err(e) => Ok(report("Vendor detection", &e)),
        }
    }
}

/// Resolve a vendor from command-line input
///
/// URLs resolve by substring, JSON objects and everything else go through
/// opaque-input narrowing.
pub fn detect(input: &str) -> Result<VendorTag> {
    let input = input.trim();

    if input.starts_with("http://") || input.starts_with("https://") {
        return Ok(resolve_vendor(VendorSource::ServerUrl(input)));
    }

    let value = if input.starts_with('{') {
        serde_json::from_str(input)
            .map_err(|e| EmrError::InvalidInput(format!("invalid JSON object: {e}")))?
    } else {
        Value::String(input.to_string())
    };

    resolve_vendor_from_opaque(&value)
}
