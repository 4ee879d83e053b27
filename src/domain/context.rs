//! Error context extension trait
//!
//! A context extension similar to `anyhow::Context` that keeps library code
//! on `Result<T, EmrError>`.
//!
//! # Examples
//!
//! ```rust
//! use emrlink::domain::Result;
//! use emrlink::domain::context::ResultExt;
//!
//! fn read_resource_file(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read resource file: {}", path))
//! }
//! ```

use crate::domain::errors::EmrError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error, computing it only on failure
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<EmrError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

// Configuration errors keep their variant so callers can still map them to
// the configuration exit code.
fn wrap(base_error: EmrError, context: impl std::fmt::Display) -> EmrError {
    match base_error {
        EmrError::Configuration(msg) => EmrError::Configuration(format!("{context}: {msg}")),
        other => EmrError::Other(format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::SessionError;

    #[test]
    fn test_context_with_emr_error() {
        let result: Result<()> = Err(EmrError::Validation("bad reference".to_string()));
        let err = result.context("Failed to hydrate Observation").unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("Failed to hydrate Observation"));
        assert!(msg.contains("bad reference"));
    }

    #[test]
    fn test_context_preserves_configuration_kind() {
        let result: Result<()> = Err(EmrError::Configuration("missing server_url".to_string()));
        let err = result.context("Failed to load emrlink.toml").unwrap_err();
        assert!(matches!(err, EmrError::Configuration(_)));
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let called = std::cell::Cell::new(false);
        let result: Result<i32> = Ok(42);
        let with_context = result.with_context(|| {
            called.set(true);
            "never built"
        });

        assert_eq!(with_context.unwrap(), 42);
        assert!(!called.get());
    }

    #[test]
    fn test_context_with_session_error() {
        let result: std::result::Result<(), SessionError> =
            Err(SessionError::ConnectionFailed("Network timeout".to_string()));
        let err = result.context("Failed to read Patient/123").unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("Failed to read Patient/123"));
        assert!(msg.contains("Network timeout"));
    }
}
