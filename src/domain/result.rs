//! Result type alias for emrlink

use super::errors::EmrError;

/// Result type alias for emrlink operations
///
/// # Examples
///
/// ```
/// use emrlink::domain::result::Result;
/// use emrlink::domain::errors::EmrError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(EmrError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, EmrError>;
