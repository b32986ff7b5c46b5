//! Bundle entry sorting
//!
//! Splits the input bundle into typed buckets and checks that the bundle
//! carries exactly one root library, one RCTC library and one plan definition.

use crate::domain::{
    Bundle, BundleEntry, ImportError, MetadataResource, ResourceKind, Result,
};
use serde_json::Value;
use std::str::FromStr;

/// Artifacts of a well-formed eRSD bundle
#[derive(Debug, Clone)]
pub struct SortedArtifacts {
    /// Value sets in bundle order
    pub value_sets: Vec<MetadataResource>,
    pub root_library: MetadataResource,
    pub rctc_library: MetadataResource,
    pub plan_definition: MetadataResource,
    /// Resource types of entries that were skipped
    pub skipped: Vec<String>,
}

/// Accumulates bundle entries into typed buckets
#[derive(Debug, Default)]
pub struct BundleSorter {
    value_sets: Vec<MetadataResource>,
    root_libraries: Vec<MetadataResource>,
    rctc_libraries: Vec<MetadataResource>,
    plan_definitions: Vec<MetadataResource>,
    skipped: Vec<String>,
}

impl BundleSorter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts every entry of a bundle and checks arity
    pub fn sort(bundle: Bundle) -> Result<SortedArtifacts> {
        let mut sorter = Self::new();
        for (position, entry) in bundle.entry.into_iter().enumerate() {
            sorter.push(position, entry)?;
        }
        sorter.finish()
    }

    /// Places one entry into its bucket
    ///
    /// Entries without a resource and resources of unsupported types are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Validation`] when a supported resource does not
    /// deserialize.
    pub fn push(&mut self, position: usize, entry: BundleEntry) -> Result<()> {
        let Some(resource) = entry.resource else {
            tracing::debug!(position, "Skipping bundle entry without resource");
            return Ok(());
        };

        let resource_type = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or("<none>")
            .to_string();

        let Ok(kind) = ResourceKind::from_str(&resource_type) else {
            tracing::info!(
                resource_type = %resource_type,
                "Resource type is not supported by import, skipping"
            );
            self.skipped.push(resource_type);
            return Ok(());
        };

        let resource: MetadataResource = serde_json::from_value(resource).map_err(|e| {
            ImportError::Validation(format!(
                "Bundle entry {position} is not a valid {resource_type}: {e}"
            ))
        })?;

        match kind {
            ResourceKind::ValueSet => self.value_sets.push(resource),
            ResourceKind::Library if resource.is_root_specification_library() => {
                self.root_libraries.push(resource)
            }
            ResourceKind::Library => self.rctc_libraries.push(resource),
            ResourceKind::PlanDefinition => self.plan_definitions.push(resource),
        }
        Ok(())
    }

    /// Checks arity and releases the buckets
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Validation`] unless there is exactly one root
    /// specification library, one other library and one plan definition.
    pub fn finish(self) -> Result<SortedArtifacts> {
        let root_library = exactly_one(self.root_libraries, "root specification Library")?;
        let rctc_library = exactly_one(self.rctc_libraries, "RCTC Library")?;
        let plan_definition = exactly_one(self.plan_definitions, "PlanDefinition")?;

        tracing::debug!(
            value_sets = self.value_sets.len(),
            skipped = self.skipped.len(),
            "Sorted bundle entries"
        );

        Ok(SortedArtifacts {
            value_sets: self.value_sets,
            root_library,
            rctc_library,
            plan_definition,
            skipped: self.skipped,
        })
    }
}

fn exactly_one(mut bucket: Vec<MetadataResource>, label: &str) -> Result<MetadataResource> {
    match bucket.len() {
        1 => Ok(bucket.remove(0)),
        found => Err(ImportError::Validation(format!(
            "Bundle must contain exactly one {label}, found {found}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::US_PH_SPECIFICATION_LIBRARY_PROFILE;
    use serde_json::json;

    fn entry(resource: Value) -> BundleEntry {
        BundleEntry {
            resource: Some(resource),
            ..Default::default()
        }
    }

    fn root_library() -> Value {
        json!({
            "resourceType": "Library",
            "id": "root",
            "meta": {"profile": [US_PH_SPECIFICATION_LIBRARY_PROFILE]}
        })
    }

    fn bundle(entries: Vec<Value>) -> Bundle {
        Bundle {
            resource_type: "Bundle".to_string(),
            id: None,
            bundle_type: Some("collection".to_string()),
            entry: entries.into_iter().map(entry).collect(),
            extra: Default::default(),
        }
    }

    #[test]
    fn test_sorts_into_buckets() {
        let sorted = BundleSorter::sort(bundle(vec![
            json!({"resourceType": "ValueSet", "id": "a"}),
            root_library(),
            json!({"resourceType": "Measure", "id": "m"}),
            json!({"resourceType": "Library", "id": "rctc"}),
            json!({"resourceType": "ValueSet", "id": "b"}),
            json!({"resourceType": "PlanDefinition", "id": "pd"}),
        ]))
        .unwrap();

        let ids: Vec<&str> = sorted.value_sets.iter().map(|v| v.display_id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(sorted.root_library.display_id(), "root");
        assert_eq!(sorted.rctc_library.display_id(), "rctc");
        assert_eq!(sorted.plan_definition.display_id(), "pd");
        assert_eq!(sorted.skipped, vec!["Measure".to_string()]);
    }

    #[test]
    fn test_missing_plan_definition() {
        let err = BundleSorter::sort(bundle(vec![
            root_library(),
            json!({"resourceType": "Library", "id": "rctc"}),
        ]))
        .unwrap_err();

        assert!(matches!(err, ImportError::Validation(_)));
        assert!(err.to_string().contains("PlanDefinition"));
    }

    #[test]
    fn test_two_rctc_libraries() {
        let err = BundleSorter::sort(bundle(vec![
            root_library(),
            json!({"resourceType": "Library", "id": "rctc-1"}),
            json!({"resourceType": "Library", "id": "rctc-2"}),
            json!({"resourceType": "PlanDefinition", "id": "pd"}),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn test_malformed_supported_resource() {
        let mut sorter = BundleSorter::new();
        let err = sorter
            .push(3, entry(json!({"resourceType": "ValueSet", "useContext": "oops"})))
            .unwrap_err();
        assert!(err.to_string().contains("Bundle entry 3"));
    }

    #[test]
    fn test_entry_without_resource_is_ignored() {
        let mut sorter = BundleSorter::new();
        sorter.push(0, BundleEntry::default()).unwrap();
        assert!(sorter.finish().is_err());
    }
}
