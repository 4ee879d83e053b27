//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for emrlink using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// emrlink - EMR vendor dispatch for SMART on FHIR sessions
#[derive(Parser, Debug)]
#[command(name = "emrlink")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "emrlink.toml", env = "EMRLINK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "EMRLINK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the vendor behind a URL, token, vendor name or JSON object
    Detect(commands::detect::DetectArgs),

    /// Show a vendor's OAuth and FHIR endpoints
    Endpoints(commands::endpoints::EndpointsArgs),

    /// Read a resource through the configured session
    Read(commands::read::ReadArgs),

    /// Read the patient, encounter or practitioner in context
    Context(commands::context::ContextArgs),

    /// Hydrate and create a resource from a JSON file
    Create(commands::create::CreateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}
