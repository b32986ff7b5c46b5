//! Emission of upsert entries
//!
//! Turns the transformed artifacts into conditional PUT entries, consulting
//! the repository for artifacts that are already stored.

use crate::adapters::repository::FhirRepository;
use crate::core::transform::TransformedBundle;
use crate::domain::{ImportError, MetadataResource, Result, TransactionBundle, UpsertEntry};
use std::collections::HashSet;
use std::sync::Arc;

/// Upsert entries ready to be committed
#[derive(Debug, Clone)]
pub struct TransformedImport {
    /// Entries in emission order: value sets, root library, RCTC library, plan definition
    pub entries: Vec<UpsertEntry>,

    /// Canonicals of value sets left out because they are already stored
    pub skipped_value_sets: Vec<String>,

    pub grouper_count: usize,
    pub leaf_count: usize,
}

impl TransformedImport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries as a single transaction bundle, for inspection
    pub fn to_transaction_bundle(&self) -> TransactionBundle {
        TransactionBundle::new(self.entries.clone())
    }
}

/// Builds upsert entries from a transformed bundle
pub struct BundleEntryEmitter {
    repository: Arc<dyn FhirRepository + Send + Sync>,
}

impl BundleEntryEmitter {
    pub fn new(repository: Arc<dyn FhirRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Emit entries for every artifact of the transformed bundle
    ///
    /// Libraries are checked first so that an already stored library aborts
    /// the import before any value set lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Exists`] if the root or RCTC library is already
    /// stored with the same url and version.
    pub async fn emit(&self, transformed: TransformedBundle) -> Result<TransformedImport> {
        for library in [&transformed.root_library, &transformed.rctc_library] {
            self.ensure_library_absent(library).await?;
        }

        let mut entries = Vec::with_capacity(transformed.value_sets.len() + 3);
        let mut skipped_value_sets = Vec::new();
        let mut emitted_ids = HashSet::new();

        for value_set in transformed.value_sets {
            // One conditional PUT per id; a second would conflict inside a transaction
            if let Some(id) = value_set.id.as_deref() {
                if !emitted_ids.insert(id.to_string()) {
                    tracing::debug!(id = %id, "Duplicate ValueSet id, keeping the first");
                    continue;
                }
            }

            if self.is_stored(&value_set).await {
                let canonical = value_set
                    .canonical()
                    .map(|c| c.into_inner())
                    .unwrap_or_else(|| value_set.display_id().to_string());
                tracing::debug!(canonical = %canonical, "ValueSet already stored, skipping");
                skipped_value_sets.push(canonical);
                continue;
            }
            entries.push(UpsertEntry::put(value_set));
        }

        entries.push(UpsertEntry::put(transformed.root_library));
        entries.push(UpsertEntry::put(transformed.rctc_library));
        entries.push(UpsertEntry::put(transformed.plan_definition));

        tracing::info!(
            entries = entries.len(),
            skipped_value_sets = skipped_value_sets.len(),
            groupers = transformed.grouper_count,
            leafs = transformed.leaf_count,
            "Upsert entries emitted"
        );

        Ok(TransformedImport {
            entries,
            skipped_value_sets,
            grouper_count: transformed.grouper_count,
            leaf_count: transformed.leaf_count,
        })
    }

    async fn ensure_library_absent(&self, library: &MetadataResource) -> Result<()> {
        if self.is_stored(library).await {
            return Err(ImportError::Exists {
                resource_type: library.resource_type.clone(),
                url: library.url.clone().unwrap_or_default(),
                version: library.version.clone().unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Existence lookup; transport failures count as "not stored"
    async fn is_stored(&self, resource: &MetadataResource) -> bool {
        let (Some(kind), Some(url)) = (resource.kind(), resource.url.as_deref()) else {
            return false;
        };

        match self
            .repository
            .exists(kind, url, resource.version.as_deref())
            .await
        {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(
                    resource_type = %kind,
                    url = %url,
                    error = %e,
                    "Existence lookup failed, treating resource as new"
                );
                false
            }
        }
    }
}
