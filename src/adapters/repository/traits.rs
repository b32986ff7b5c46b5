//! Repository abstraction traits
//!
//! This module defines the trait backing stores must implement to receive an
//! import: an existence lookup by canonical url and a transaction commit.

use crate::domain::{ResourceKind, Result, TransactionBundle};
use async_trait::async_trait;
use serde_json::Value;

/// FHIR repository the importer reads from and commits to
///
/// Implementations must tolerate concurrent `transaction` calls; every chunk
/// of an import is committed from its own task.
#[async_trait]
pub trait FhirRepository: Send + Sync {
    /// Check whether a resource with the given url (and version) is stored
    ///
    /// # Arguments
    ///
    /// * `kind` - Resource type to search
    /// * `url` - Canonical url of the resource
    /// * `version` - Business version; `None` matches any version
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    async fn exists(&self, kind: ResourceKind, url: &str, version: Option<&str>) -> Result<bool>;

    /// Commit a transaction bundle atomically
    ///
    /// # Returns
    ///
    /// The server's transaction-response bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle is rejected or cannot be delivered.
    async fn transaction(&self, bundle: TransactionBundle) -> Result<Value>;

    /// Short name of the backend, for log output
    fn backend_name(&self) -> &'static str;
}
