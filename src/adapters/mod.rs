//! External system integrations for eRSD import.
//!
//! This module provides adapters for the stores an import is committed to:
//!
//! - [`repository`] - Repository abstraction layer (trait-based) and factory
//! - [`fhir`] - FHIR R4 server implementation over HTTP
//! - [`memory`] - In-memory implementation for dry runs and tests
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with mock implementations. The import core depends only on
//! [`repository::FhirRepository`].
//!
//! # FHIR Server Adapter
//!
//! ```rust,no_run
//! use ersd_import::adapters::fhir::FhirServerClient;
//! use ersd_import::config::{secret_string, AuthType, FhirConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FhirConfig {
//!     base_url: "https://fhir.example.org/fhir".to_string(),
//!     auth_type: AuthType::Bearer,
//!     token: Some(secret_string("token".to_string())),
//!     ..Default::default()
//! };
//!
//! let client = FhirServerClient::new(config)?;
//! // Use client for lookups and transactions
//! # Ok(())
//! # }
//! ```

pub mod fhir;
pub mod memory;
pub mod repository;
