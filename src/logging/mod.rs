//! Logging and observability
//!
//! Structured logging through `tracing`, with console output and optional
//! rotated JSON files. Access tokens never reach a log line; sessions hold
//! them as secrets.
//!
//! # Example
//!
//! ```no_run
//! use emrlink::logging::init_logging;
//! use emrlink::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(vendor = "CERNER", "Client ready");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the vendor a client was built for
///
/// # Example
///
/// ```no_run
/// use emrlink::log_vendor_resolved;
/// use emrlink::domain::VendorTag;
///
/// log_vendor_resolved!(VendorTag::Epic, "https://fhir.epic.com/interconnect-fhir-oauth/api/FHIR/R4");
/// ```
#[macro_export]
macro_rules! log_vendor_resolved {
    ($vendor:expr, $server_url:expr) => {
        tracing::info!(
            vendor = %$vendor,
            server_url = %$server_url,
            "Resolved EMR vendor"
        );
    };
}

/// Log a failed session request
///
/// # Example
///
/// ```no_run
/// use emrlink::log_session_failure;
/// use emrlink::domain::SessionError;
///
/// let error = SessionError::Timeout("30s elapsed".to_string());
/// log_session_failure!("https://fhir.example.org/r4/Patient/1", &error);
/// ```
#[macro_export]
macro_rules! log_session_failure {
    ($url:expr, $error:expr) => {
        tracing::warn!(
            url = %$url,
            error = %$error,
            "Session request failed"
        );
    };
}
