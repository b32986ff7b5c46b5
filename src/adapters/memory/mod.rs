//! In-memory repository
//!
//! Backs dry runs and tests. Transactions apply their PUT entries to a map
//! keyed by resource type and id. Failures can be injected per resource id
//! to exercise partial commits.

use crate::adapters::repository::FhirRepository;
use crate::domain::{
    HttpVerb, MetadataResource, RepositoryError, ResourceKind, Result, TransactionBundle,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

type ResourceKey = (String, String);

/// Repository holding resources in a process-local map
#[derive(Default)]
pub struct InMemoryRepository {
    resources: RwLock<HashMap<ResourceKey, MetadataResource>>,
    lookups: RwLock<Vec<(ResourceKind, String, Option<String>)>>,
    transactions: AtomicUsize,
    failing_ids: RwLock<HashSet<String>>,
    fail_lookups: AtomicBool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored resource
    pub async fn insert(&self, resource: MetadataResource) {
        let key = (
            resource.resource_type.clone(),
            resource.id.clone().unwrap_or_default(),
        );
        self.resources.write().await.insert(key, resource);
    }

    pub async fn get(&self, kind: ResourceKind, id: &str) -> Option<MetadataResource> {
        self.resources
            .read()
            .await
            .get(&(kind.as_str().to_string(), id.to_string()))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.resources.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.resources.read().await.is_empty()
    }

    /// Number of transactions received, including rejected ones
    pub fn transaction_count(&self) -> usize {
        self.transactions.load(Ordering::SeqCst)
    }

    /// Existence lookups received, in call order
    pub async fn lookups(&self) -> Vec<(ResourceKind, String, Option<String>)> {
        self.lookups.read().await.clone()
    }

    /// Reject every transaction that contains a resource with this id
    pub async fn fail_transactions_containing(&self, id: impl Into<String>) {
        self.failing_ids.write().await.insert(id.into());
    }

    /// Make every existence lookup fail with a connection error
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FhirRepository for InMemoryRepository {
    async fn exists(&self, kind: ResourceKind, url: &str, version: Option<&str>) -> Result<bool> {
        self.lookups
            .write()
            .await
            .push((kind, url.to_string(), version.map(str::to_string)));

        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(RepositoryError::ConnectionFailed("lookup failure injected".into()).into());
        }

        let resources = self.resources.read().await;
        Ok(resources.values().any(|r| {
            r.kind() == Some(kind)
                && r.url.as_deref() == Some(url)
                && version.map_or(true, |v| r.version.as_deref() == Some(v))
        }))
    }

    async fn transaction(&self, bundle: TransactionBundle) -> Result<Value> {
        self.transactions.fetch_add(1, Ordering::SeqCst);

        {
            let failing = self.failing_ids.read().await;
            if let Some(entry) = bundle.entry.iter().find(|e| {
                e.resource
                    .id
                    .as_deref()
                    .is_some_and(|id| failing.contains(id))
            }) {
                return Err(RepositoryError::TransactionFailed(format!(
                    "{} {} rejected",
                    entry.resource.resource_type,
                    entry.resource.display_id()
                ))
                .into());
            }
        }

        // Validate the whole bundle before applying any entry
        if let Some(entry) = bundle
            .entry
            .iter()
            .find(|e| e.request.method != HttpVerb::Put || e.resource.id.is_none())
        {
            return Err(RepositoryError::ClientError {
                status: 400,
                message: format!("Unsupported entry for {}", entry.request.url),
            }
            .into());
        }

        let mut resources = self.resources.write().await;
        let mut responses = Vec::with_capacity(bundle.len());
        for entry in bundle.entry {
            let key = (
                entry.resource.resource_type.clone(),
                entry.resource.id.clone().unwrap_or_default(),
            );
            let status = if resources.contains_key(&key) {
                "200 OK"
            } else {
                "201 Created"
            };
            resources.insert(key, entry.resource);
            responses.push(json!({ "response": { "status": status } }));
        }

        Ok(json!({
            "resourceType": "Bundle",
            "type": "transaction-response",
            "entry": responses,
        }))
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UpsertEntry;

    fn library(id: &str, url: &str, version: &str) -> MetadataResource {
        let mut library = MetadataResource::new(ResourceKind::Library, id);
        library.url = Some(url.to_string());
        library.version = Some(version.to_string());
        library
    }

    #[tokio::test]
    async fn test_exists_matches_url_and_version() {
        let repository = InMemoryRepository::new();
        repository
            .insert(library("rctc", "http://x/Library/rctc", "1.0.0"))
            .await;

        assert!(repository
            .exists(ResourceKind::Library, "http://x/Library/rctc", Some("1.0.0"))
            .await
            .unwrap());
        assert!(!repository
            .exists(ResourceKind::Library, "http://x/Library/rctc", Some("2.0.0"))
            .await
            .unwrap());
        assert!(repository
            .exists(ResourceKind::Library, "http://x/Library/rctc", None)
            .await
            .unwrap());
        assert!(!repository
            .exists(ResourceKind::ValueSet, "http://x/Library/rctc", None)
            .await
            .unwrap());
        assert_eq!(repository.lookups().await.len(), 4);
    }

    #[tokio::test]
    async fn test_transaction_upserts() {
        let repository = InMemoryRepository::new();
        let bundle = TransactionBundle::new(vec![
            UpsertEntry::put(library("a", "http://x/Library/a", "1")),
            UpsertEntry::put(MetadataResource::new(ResourceKind::ValueSet, "vs")),
        ]);

        let response = repository.transaction(bundle).await.unwrap();
        assert_eq!(response["type"], "transaction-response");
        assert_eq!(response["entry"][0]["response"]["status"], "201 Created");
        assert_eq!(repository.len().await, 2);
        assert!(repository.get(ResourceKind::ValueSet, "vs").await.is_some());
        assert_eq!(repository.transaction_count(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_applies_nothing() {
        let repository = InMemoryRepository::new();
        repository.fail_transactions_containing("bad").await;

        let bundle = TransactionBundle::new(vec![
            UpsertEntry::put(MetadataResource::new(ResourceKind::ValueSet, "good")),
            UpsertEntry::put(MetadataResource::new(ResourceKind::ValueSet, "bad")),
        ]);

        assert!(repository.transaction(bundle).await.is_err());
        assert!(repository.is_empty().await);
        assert_eq!(repository.transaction_count(), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure() {
        let repository = InMemoryRepository::new();
        repository.fail_lookups(true);
        assert!(repository
            .exists(ResourceKind::ValueSet, "http://x/ValueSet/a", None)
            .await
            .is_err());
    }
}
