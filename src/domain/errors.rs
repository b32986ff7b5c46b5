//! Domain error types
//!
//! This module defines the error hierarchy for the importer. Errors raised
//! while transforming a bundle (validation, conflicts, pre-existing libraries)
//! are fatal and surface before anything is written. Errors raised while
//! committing a chunk are recorded per chunk and never returned from the
//! overall import (see [`crate::core::import::ChunkReport`]).

use thiserror::Error;

/// Main importer error type
///
/// This is the primary error type used throughout the crate.
/// All errors are domain-specific and don't expose third-party types.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Request preconditions, bundle shape or arity violations
    #[error("Validation error: {0}")]
    Validation(String),

    /// Two priority usage contexts disagree for the same canonical URL
    #[error("Conflict: ValueSet with URL {canonical} has conflicting priority codes ({existing} vs {incoming})")]
    Conflict {
        /// Canonical URL of the value set whose priorities disagree
        canonical: String,
        /// Priority code already recorded for the canonical
        existing: String,
        /// Priority code that disagrees with it
        incoming: String,
    },

    /// A resource that must never be overwritten is already stored
    #[error("{resource_type} with url '{url}' and version '{version}' already exists")]
    Exists {
        /// FHIR resource type (always `Library` today)
        resource_type: String,
        /// Canonical url of the stored resource
        url: String,
        /// Business version of the stored resource
        version: String,
    },

    /// Backing repository errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A URL could not be parsed or upgraded
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Repository-specific errors
///
/// Errors that occur when talking to the backing FHIR repository.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Failed to reach the FHIR server
    #[error("Failed to connect to FHIR server: {0}")]
    ConnectionFailed(String),

    /// Authentication was rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Search request failed
    #[error("Search failed: {0}")]
    SearchFailed(String),

    /// Transaction bundle was rejected or failed
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Response body could not be understood
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl RepositoryError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            RepositoryError::ConnectionFailed(_) | RepositoryError::Timeout(_) => true,
            RepositoryError::ServerError { status, .. } => *status >= 500,
            RepositoryError::ClientError { status, .. } => *status == 429,
            _ => false,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ImportError {
    fn from(err: toml::de::Error) -> Self {
        ImportError::Configuration(format!("TOML parse error: {err}"))
    }
}
