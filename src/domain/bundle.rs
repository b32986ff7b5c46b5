//! Bundle envelopes
//!
//! The input eRSD bundle is read with untyped entry resources so that entries
//! of unsupported types can be reported and skipped without failing the parse.
//! Upsert entries and transaction bundles are what the importer writes.

use super::resource::MetadataResource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// An incoming FHIR Bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub bundle_type: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// HTTP verb of a bundle entry request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleRequest {
    pub method: HttpVerb,
    pub url: String,
}

/// Idempotent upsert of one processed resource
///
/// Serialized as a transaction bundle entry:
/// `{"fullUrl": ..., "resource": ..., "request": {"method": "PUT", "url": "ValueSet?_id=abc"}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    pub resource: MetadataResource,

    pub request: BundleRequest,
}

impl UpsertEntry {
    /// Builds a conditional PUT keyed on the resource id
    pub fn put(resource: MetadataResource) -> Self {
        let url = format!(
            "{}?_id={}",
            resource.resource_type,
            resource.id.as_deref().unwrap_or_default()
        );
        Self {
            full_url: resource.url.clone(),
            request: BundleRequest {
                method: HttpVerb::Put,
                url,
            },
            resource,
        }
    }
}

/// A `transaction` Bundle wrapping one chunk of upserts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBundle {
    pub resource_type: String,

    pub id: String,

    #[serde(rename = "type")]
    pub bundle_type: String,

    #[serde(default)]
    pub entry: Vec<UpsertEntry>,
}

impl TransactionBundle {
    pub fn new(entry: Vec<UpsertEntry>) -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            id: Uuid::new_v4().to_string(),
            bundle_type: "transaction".to_string(),
            entry,
        }
    }

    pub fn len(&self) -> usize {
        self.entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcomeIssue {
    pub severity: String,
    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

/// Minimal FHIR OperationOutcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    pub resource_type: String,
    pub issue: Vec<OperationOutcomeIssue>,
}

impl OperationOutcome {
    /// An outcome with a single informational issue
    pub fn information(diagnostics: impl Into<String>) -> Self {
        Self {
            resource_type: "OperationOutcome".to_string(),
            issue: vec![OperationOutcomeIssue {
                severity: "information".to_string(),
                code: "informational".to_string(),
                diagnostics: Some(diagnostics.into()),
            }],
        }
    }
}
