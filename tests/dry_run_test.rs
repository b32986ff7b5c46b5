//! Integration tests for dry-run mode
//!
//! These tests verify that `--dry-run` routes every lookup and transaction to
//! the in-memory repository while the import runs the full pipeline.

use ersd_import::adapters::memory::InMemoryRepository;
use ersd_import::adapters::repository::create_repository;
use ersd_import::config::{
    ApplicationConfig, FhirConfig, ImportConfig, ImportToolConfig, LoggingConfig,
};
use ersd_import::core::import::ImportCoordinator;
use ersd_import::domain::vocabulary::US_PH_SPECIFICATION_LIBRARY_PROFILE;
use ersd_import::domain::{ImportError, ImportRequest, ResourceKind};
use serde_json::{json, Value};
use std::sync::Arc;

const APP_URL: &str = "https://vsm.example.org/fhir";
const BASE: &str = "http://ersd.aimsplatform.org/fhir";

fn config() -> ImportToolConfig {
    ImportToolConfig {
        application: ApplicationConfig::default(),
        fhir: FhirConfig {
            // Nothing listens here; dry runs must never reach it
            base_url: "http://127.0.0.1:9/fhir".to_string(),
            ..Default::default()
        },
        import: ImportConfig {
            app_authoritative_url: Some(APP_URL.to_string()),
            chunk_size: 2,
            ..Default::default()
        },
        logging: LoggingConfig::console_only(),
    }
}

fn bundle() -> Value {
    json!({
        "resourceType": "Bundle",
        "type": "collection",
        "entry": [
            {"resource": {
                "resourceType": "Library",
                "id": "SpecificationLibrary",
                "url": format!("{BASE}/Library/SpecificationLibrary"),
                "version": "3.0.0",
                "meta": {"profile": [US_PH_SPECIFICATION_LIBRARY_PROFILE]}
            }},
            {"resource": {
                "resourceType": "Library",
                "id": "rctc",
                "url": format!("{BASE}/Library/rctc"),
                "version": "3.0.0"
            }},
            {"resource": {
                "resourceType": "PlanDefinition",
                "id": "plandefinition-ersd-instance-example",
                "url": format!("{BASE}/PlanDefinition/plandefinition-ersd-instance-example"),
                "version": "3.0.0"
            }},
            {"resource": {
                "resourceType": "ValueSet",
                "id": "dxtc",
                "url": format!("{BASE}/ValueSet/dxtc"),
                "version": "20240101",
                "compose": {"include": [{"valueSet": [format!("{BASE}/ValueSet/covid")]}]}
            }},
            {"resource": {
                "resourceType": "ValueSet",
                "id": "covid",
                "url": "http://cts.nlm.nih.gov/fhir/ValueSet/covid",
                "version": "20230602",
                "compose": {"include": [{"system": "http://snomed.info/sct"}]}
            }}
        ]
    })
}

#[test]
fn test_dry_run_uses_in_memory_repository() {
    let repository = create_repository(&config(), true).unwrap();
    assert_eq!(repository.backend_name(), "in-memory");
}

#[tokio::test]
async fn test_dry_run_summary_flag() {
    let repository = create_repository(&config(), true).unwrap();
    let coordinator = ImportCoordinator::new(repository, config().import).with_dry_run(true);

    let summary = coordinator
        .execute(ImportRequest::new(APP_URL, bundle()))
        .await
        .unwrap();

    assert!(summary.dry_run);
    assert!(summary.is_fully_committed());
    assert_eq!(summary.entries_total, 5);
    assert_eq!(summary.chunks.len(), 3);
}

#[tokio::test]
async fn test_import_without_dry_run_flag() {
    let repository = Arc::new(InMemoryRepository::new());
    let coordinator = ImportCoordinator::new(repository.clone(), config().import);

    let summary = coordinator
        .execute(ImportRequest::new(APP_URL, bundle()))
        .await
        .unwrap();

    assert!(!summary.dry_run);
    assert_eq!(repository.len().await, 5);
    assert_eq!(repository.transaction_count(), 3);
    assert!(repository
        .get(ResourceKind::Library, "SpecificationLibrary")
        .await
        .is_some());
}

#[tokio::test]
async fn test_second_import_of_same_release_is_rejected() {
    let repository = Arc::new(InMemoryRepository::new());
    let coordinator = ImportCoordinator::new(repository.clone(), config().import);

    coordinator
        .execute(ImportRequest::new(APP_URL, bundle()))
        .await
        .unwrap();

    let err = coordinator
        .execute(ImportRequest::new(APP_URL, bundle()))
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::Exists { .. }));
    assert_eq!(repository.transaction_count(), 3);
}
