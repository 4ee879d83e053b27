//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::EmrConfig;
use super::secret::secret_string;
use crate::domain::context::ResultExt;
use crate::domain::errors::EmrError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into EmrConfig
/// 4. Applies environment variable overrides (EMRLINK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file is missing or unreadable, a
/// referenced environment variable is unset, the TOML is invalid, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use emrlink::config::loader::load_config;
///
/// let config = load_config("emrlink.toml").expect("Failed to load config");
/// println!("FHIR server: {}", config.session.server_url);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<EmrConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(EmrError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: EmrConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        EmrError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| EmrError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(EmrError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the EMRLINK_* prefix
///
/// Environment variables follow the pattern: EMRLINK_<SECTION>_<KEY>,
/// for example EMRLINK_SESSION_SERVER_URL.
fn apply_env_overrides(config: &mut EmrConfig) -> Result<()> {
    if let Ok(val) = std::env::var("EMRLINK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("EMRLINK_SESSION_SERVER_URL") {
        config.session.server_url = val;
    }
    if let Ok(val) = std::env::var("EMRLINK_SESSION_ACCESS_TOKEN") {
        config.session.access_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("EMRLINK_SESSION_ID_TOKEN") {
        config.session.id_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("EMRLINK_SESSION_PATIENT") {
        config.session.patient = Some(val);
    }
    if let Ok(val) = std::env::var("EMRLINK_SESSION_ENCOUNTER") {
        config.session.encounter = Some(val);
    }
    if let Ok(val) = std::env::var("EMRLINK_SESSION_FHIR_USER") {
        config.session.fhir_user = Some(val);
    }
    if let Ok(val) = std::env::var("EMRLINK_SESSION_VENDOR") {
        let vendor = val.parse().map_err(|e| {
            EmrError::Configuration(format!("Invalid EMRLINK_SESSION_VENDOR: {e}"))
        })?;
        config.session.vendor = Some(vendor);
    }
    if let Ok(val) = std::env::var("EMRLINK_SESSION_TLS_VERIFY") {
        config.session.tls_verify = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("EMRLINK_SESSION_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.session.timeout_seconds = timeout;
        }
    }

    if let Ok(val) = std::env::var("EMRLINK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("EMRLINK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
