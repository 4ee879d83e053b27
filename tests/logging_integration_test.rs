//! Integration tests for logging functionality

use emrlink::config::LoggingConfig;
use emrlink::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
}

// The global subscriber can only be installed once per process, so this is
// the only test in this binary that calls init_logging
#[test]
fn test_init_logging_creates_log_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    assert!(!log_path.exists());
    let guard = init_logging("debug", &config).expect("Failed to initialize logging");
    assert!(log_path.exists());

    tracing::info!(vendor = "CERNER", "Logging smoke test");
    drop(guard);
}

#[test]
fn test_invalid_level_is_rejected_before_install() {
    let config = LoggingConfig::default();
    assert!(init_logging("verbose", &config).is_err());
}
