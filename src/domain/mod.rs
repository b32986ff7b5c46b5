//! Domain models and types for eRSD import.
//!
//! This module contains the FHIR artifact model the importer reads and
//! rewrites, the bundle envelopes it consumes and produces, and the error
//! hierarchy shared by every layer.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Canonical references** ([`Canonical`]) for `url|version` handling
//! - **Artifact models** ([`MetadataResource`], [`UsageContext`], [`RelatedArtifact`])
//! - **Bundle envelopes** ([`Bundle`], [`UpsertEntry`], [`TransactionBundle`])
//! - **Error types** ([`ImportError`], [`RepositoryError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ImportError>`]:
//!
//! ```rust
//! use ersd_import::domain::{ImportRequest, Result};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let request = ImportRequest::new(
//!         "https://vsm.example.org/fhir",
//!         json!({"resourceType": "Bundle", "entry": []}),
//!     );
//!     let validated = request.validate()?;
//!     assert!(validated.bundle.entry.is_empty());
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod bundle;
pub mod canonical;
pub mod errors;
pub mod request;
pub mod resource;
pub mod result;
pub mod vocabulary;

// Re-export commonly used types for convenience
pub use bundle::{
    Bundle, BundleEntry, BundleRequest, HttpVerb, OperationOutcome, TransactionBundle, UpsertEntry,
};
pub use canonical::Canonical;
pub use errors::{ImportError, RepositoryError};
pub use request::{ImportRequest, ValidatedRequest};
pub use resource::{
    CodeableConcept, Coding, Compose, ComposeInclude, Extension, Identifier, Meta,
    MetadataResource, RelatedArtifact, RelatedArtifactType, ResourceKind, UsageContext,
};
pub use result::Result;
