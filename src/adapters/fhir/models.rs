//! FHIR REST response models
//!
//! Only the members the client inspects are typed.

use serde::Deserialize;
use serde_json::Value;

/// A `searchset` Bundle returned by a `_summary=count` search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchSetResponse {
    #[serde(rename = "resourceType", default)]
    pub resource_type: Option<String>,

    /// Number of matches; present on count summaries
    #[serde(default)]
    pub total: Option<u64>,

    /// Entries; servers that ignore `_summary=count` still return matches here
    #[serde(default)]
    pub entry: Vec<Value>,
}

impl SearchSetResponse {
    /// Whether the search found at least one resource
    pub fn has_matches(&self) -> bool {
        self.total.map(|t| t > 0).unwrap_or(false) || !self.entry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_count_summary() {
        let response: SearchSetResponse =
            serde_json::from_value(json!({"resourceType": "Bundle", "type": "searchset", "total": 0}))
                .unwrap();
        assert!(!response.has_matches());

        let response: SearchSetResponse =
            serde_json::from_value(json!({"resourceType": "Bundle", "total": 2})).unwrap();
        assert!(response.has_matches());
    }

    #[test]
    fn test_entries_without_total() {
        let response: SearchSetResponse = serde_json::from_value(json!({
            "resourceType": "Bundle",
            "entry": [{"resource": {"resourceType": "Library", "id": "rctc"}}]
        }))
        .unwrap();
        assert!(response.has_matches());
    }
}
