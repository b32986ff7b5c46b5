//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{AuthType, ImportToolConfig};
use super::secret::secret_string;
use crate::domain::errors::ImportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`ImportToolConfig`]
/// 4. Applies environment variable overrides (`ERSD_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`ImportError::Configuration`] if the file cannot be read or
/// parsed, a referenced environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use ersd_import::config::loader::load_config;
///
/// let config = load_config("ersd-import.toml").expect("Failed to load config");
/// println!("FHIR server: {}", config.fhir.base_url);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ImportToolConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ImportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ImportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ImportToolConfig = toml::from_str(&contents)
        .map_err(|e| ImportError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ImportError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ImportError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures| {
            let name = &caps[1];
            std::env::var(name).unwrap_or_else(|_| {
                if !missing_vars.iter().any(|m| m == name) {
                    missing_vars.push(name.to_string());
                }
                String::new()
            })
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(ImportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Reads an `ERSD_*` variable and parses it, ignoring unparsable values
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = std::env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(variable = name, value = %value, "Ignoring unparsable override");
            None
        }
    }
}

/// Applies environment variable overrides using the `ERSD_*` prefix
///
/// Variables follow the pattern `ERSD_<SECTION>_<KEY>`, for example
/// `ERSD_FHIR_BASE_URL` or `ERSD_IMPORT_CHUNK_SIZE`.
fn apply_env_overrides(config: &mut ImportToolConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("ERSD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(dry_run) = env_parse("ERSD_APPLICATION_DRY_RUN") {
        config.application.dry_run = dry_run;
    }

    // FHIR overrides
    if let Ok(val) = std::env::var("ERSD_FHIR_BASE_URL") {
        config.fhir.base_url = val;
    }
    if let Ok(val) = std::env::var("ERSD_FHIR_AUTH_TYPE") {
        config.fhir.auth_type = match val.to_lowercase().as_str() {
            "none" => AuthType::None,
            "basic" => AuthType::Basic,
            "bearer" => AuthType::Bearer,
            other => {
                return Err(ImportError::Configuration(format!(
                    "Invalid ERSD_FHIR_AUTH_TYPE '{other}'. Must be one of: none, basic, bearer"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("ERSD_FHIR_USERNAME") {
        config.fhir.username = Some(val);
    }
    if let Ok(val) = std::env::var("ERSD_FHIR_PASSWORD") {
        config.fhir.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("ERSD_FHIR_TOKEN") {
        config.fhir.token = Some(secret_string(val));
    }
    if let Some(timeout) = env_parse("ERSD_FHIR_TIMEOUT_SECONDS") {
        config.fhir.timeout_seconds = timeout;
    }
    if let Some(verify) = env_parse("ERSD_FHIR_TLS_VERIFY") {
        config.fhir.tls_verify = verify;
    }

    // Import overrides
    if let Ok(val) = std::env::var("ERSD_IMPORT_APP_AUTHORITATIVE_URL") {
        config.import.app_authoritative_url = Some(val);
    }
    if let Some(size) = env_parse("ERSD_IMPORT_CHUNK_SIZE") {
        config.import.chunk_size = size;
    }
    if let Some(timeout) = env_parse("ERSD_IMPORT_COMMIT_TIMEOUT_SECS") {
        config.import.commit_timeout_secs = timeout;
    }

    // Logging overrides
    if let Some(enabled) = env_parse("ERSD_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = enabled;
    }
    if let Ok(val) = std::env::var("ERSD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
