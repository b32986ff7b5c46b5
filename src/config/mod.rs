//! Configuration management for the importer.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! The importer reads `ersd-import.toml` with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ERSD_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation with descriptive messages
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run switch
//! - [`FhirConfig`] - Target FHIR server, authentication and retries
//! - [`ImportConfig`] - Authoritative url, chunk size and commit timeout
//! - [`LoggingConfig`] - Local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [fhir]
//! base_url = "https://fhir.example.org/fhir"
//! auth_type = "bearer"
//! token = "${ERSD_FHIR_TOKEN}"
//!
//! [import]
//! app_authoritative_url = "https://vsm.example.org/fhir"
//! chunk_size = 74
//! ```
//!
//! # Validation
//!
//! ```rust,no_run
//! use ersd_import::config::load_config;
//!
//! # fn example() {
//! match load_config("ersd-import.toml") {
//!     Ok(config) => println!("Configuration valid, chunk size {}", config.import.chunk_size),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, AuthType, FhirConfig, ImportConfig, ImportToolConfig, LoggingConfig,
    RetryConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
