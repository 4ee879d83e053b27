//! CLI command implementations
//!
//! Commands return process exit codes: 0 success, 2 configuration error,
//! 3 vendor or endpoint resolution failure, 4 remote or validation failure,
//! 5 fatal.

pub mod context;
pub mod create;
pub mod detect;
pub mod endpoints;
pub mod read;
pub mod validate;

use crate::adapters::emr::EmrClient;
use crate::adapters::session::{SmartLauncher, StaticLauncher};
use crate::config::EmrConfig;
use crate::core::endpoints::EndpointRegistry;
use crate::domain::{EmrError, Result};

/// Exit code for a library error
pub fn exit_code(err: &EmrError) -> i32 {
    match err {
        EmrError::Configuration(_) => 2,
        EmrError::MissingEndpoint { .. } | EmrError::UnsupportedVendor(_) => 3,
        EmrError::InvalidInput(_)
        | EmrError::MalformedResource(_)
        | EmrError::MissingIdentifier(_)
        | EmrError::CreateFailed { .. }
        | EmrError::InvalidResponse(_)
        | EmrError::UnexpectedResourceType { .. }
        | EmrError::Session(_)
        | EmrError::Validation(_) => 4,
        EmrError::Serialization(_) | EmrError::Io(_) | EmrError::Other(_) => 5,
    }
}

/// Build a client for the configured session
///
/// A vendor set in `[session]` wins over resolution.
pub async fn connect(config: &EmrConfig) -> Result<EmrClient> {
    let launcher = StaticLauncher::new(config.session.clone());
    let client = match launcher.configured_vendor() {
        Some(tag) => EmrClient::with_vendor(launcher.ready().await?, tag)?,
        None => EmrClient::connect(&launcher).await?,
    };

    Ok(client.with_endpoint_registry(EndpointRegistry::with_overrides(&config.endpoints)?))
}

/// Print an error and return its exit code
pub(crate) fn report(action: &str, err: &EmrError) -> i32 {
    tracing::error!(error = %err, "{action} failed");
    println!("❌ {action} failed");
    println!("   Error: {err}");
    exit_code(err)
}
