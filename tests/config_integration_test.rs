//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX to avoid
//! interference between tests.

use ersd_import::config::{load_config, AuthType};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("ERSD_APPLICATION_LOG_LEVEL");
    std::env::remove_var("ERSD_APPLICATION_DRY_RUN");
    std::env::remove_var("ERSD_FHIR_BASE_URL");
    std::env::remove_var("ERSD_FHIR_AUTH_TYPE");
    std::env::remove_var("ERSD_FHIR_TOKEN");
    std::env::remove_var("ERSD_IMPORT_CHUNK_SIZE");
    std::env::remove_var("ERSD_IMPORT_APP_AUTHORITATIVE_URL");
    std::env::remove_var("TEST_ERSD_FHIR_PASSWORD");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_ERSD_FHIR_PASSWORD", "s3cret");

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"
dry_run = true

[fhir]
base_url = "https://fhir.example.org/fhir"
auth_type = "basic"
username = "importer"
password = "${TEST_ERSD_FHIR_PASSWORD}"
timeout_seconds = 30
tls_verify = false

[fhir.retry]
max_retries = 5
initial_delay_ms = 500
max_delay_ms = 10000
backoff_multiplier = 1.5

[import]
app_authoritative_url = "https://vsm.example.org/fhir"
chunk_size = 100
commit_timeout_secs = 120

[logging]
local_enabled = false
local_path = "/tmp/ersd-import"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.fhir.base_url, "https://fhir.example.org/fhir");
    assert_eq!(config.fhir.auth_type, AuthType::Basic);
    assert_eq!(config.fhir.username.as_deref(), Some("importer"));
    assert_eq!(
        config.fhir.password.as_ref().unwrap().expose_secret(),
        "s3cret"
    );
    assert!(!config.fhir.tls_verify);
    assert_eq!(config.fhir.retry.max_retries, 5);
    assert_eq!(config.fhir.retry.backoff_multiplier, 1.5);
    assert_eq!(
        config.import.app_authoritative_url.as_deref(),
        Some("https://vsm.example.org/fhir")
    );
    assert_eq!(config.import.chunk_size, 100);
    assert_eq!(config.import.commit_timeout_secs, 120);
    assert_eq!(config.logging.local_rotation, "hourly");

    cleanup_env_vars();
}

#[test]
fn test_minimal_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[fhir]
base_url = "http://localhost:8080/fhir"

[import]
"#,
    );

    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert!(!config.application.dry_run);
    assert_eq!(config.fhir.auth_type, AuthType::None);
    assert_eq!(config.fhir.timeout_seconds, 60);
    assert!(config.fhir.tls_verify);
    assert_eq!(config.fhir.retry.max_retries, 3);
    assert_eq!(config.import.chunk_size, 74);
    assert_eq!(config.import.commit_timeout_secs, 600);
    assert!(config.import.app_authoritative_url.is_none());
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[fhir]
base_url = "http://localhost:8080/fhir"

[import]
chunk_size = 10
"#,
    );

    std::env::set_var("ERSD_FHIR_BASE_URL", "https://override.example.org/fhir");
    std::env::set_var("ERSD_FHIR_AUTH_TYPE", "bearer");
    std::env::set_var("ERSD_FHIR_TOKEN", "override-token");
    std::env::set_var("ERSD_IMPORT_CHUNK_SIZE", "25");
    std::env::set_var("ERSD_IMPORT_APP_AUTHORITATIVE_URL", "https://vsm.example.org/fhir");
    std::env::set_var("ERSD_APPLICATION_DRY_RUN", "true");

    let result = load_config(temp_file.path());
    cleanup_env_vars();
    let config = result.unwrap();

    assert_eq!(config.fhir.base_url, "https://override.example.org/fhir");
    assert_eq!(config.fhir.auth_type, AuthType::Bearer);
    assert_eq!(
        config.fhir.token.as_ref().unwrap().expose_secret(),
        "override-token"
    );
    assert_eq!(config.import.chunk_size, 25);
    assert_eq!(
        config.import.app_authoritative_url.as_deref(),
        Some("https://vsm.example.org/fhir")
    );
    assert!(config.application.dry_run);
}

#[test]
fn test_invalid_auth_type_override_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[fhir]
base_url = "http://localhost:8080/fhir"

[import]
"#,
    );

    std::env::set_var("ERSD_FHIR_AUTH_TYPE", "kerberos");
    let result = load_config(temp_file.path());
    cleanup_env_vars();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("ERSD_FHIR_AUTH_TYPE"));
}

#[test]
fn test_missing_env_var_reported() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[fhir]
base_url = "http://localhost:8080/fhir"
auth_type = "basic"
username = "importer"
password = "${TEST_ERSD_FHIR_PASSWORD}"

[import]
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_ERSD_FHIR_PASSWORD"));
}

#[test]
fn test_validation_errors() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        (
            r#"
[fhir]
base_url = "ftp://fhir.example.org"

[import]
"#,
            "base_url",
        ),
        (
            r#"
[fhir]
base_url = "http://localhost:8080/fhir"
auth_type = "bearer"

[import]
"#,
            "token",
        ),
        (
            r#"
[fhir]
base_url = "http://localhost:8080/fhir"

[import]
app_authoritative_url = "vsm.example.org"
"#,
            "app_authoritative_url",
        ),
        (
            r#"
[application]
log_level = "loud"

[fhir]
base_url = "http://localhost:8080/fhir"

[import]
"#,
            "log_level",
        ),
    ];

    for (content, expected) in cases {
        let temp_file = write_config(content);
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "expected '{expected}' in '{err}'"
        );
    }
}
