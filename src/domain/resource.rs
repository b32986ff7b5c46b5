//! FHIR knowledge-artifact model
//!
//! Only the members the importer reads or rewrites are typed. Every struct
//! keeps the remaining JSON members in an `extra` map so a resource survives
//! a parse/modify/serialize cycle without losing content.

use super::canonical::Canonical;
use super::vocabulary::{
    GROUPER_TYPE_CODE, GROUPER_TYPE_VALUE_SYSTEM, GROUPER_USAGE_CONTEXT_TYPE_SYSTEM,
    MODEL_GROUPER_CODE, MODEL_GROUPER_TEXT, US_PH_SPECIFICATION_LIBRARY_PROFILE,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Resource types the importer knows how to process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Terminology value set
    ValueSet,
    /// Knowledge library (root specification or RCTC)
    Library,
    /// eRSD plan definition
    PlanDefinition,
}

impl ResourceKind {
    /// The FHIR resourceType string
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::ValueSet => "ValueSet",
            ResourceKind::Library => "Library",
            ResourceKind::PlanDefinition => "PlanDefinition",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ValueSet" => Ok(ResourceKind::ValueSet),
            "Library" => Ok(ResourceKind::Library),
            "PlanDefinition" => Ok(ResourceKind::PlanDefinition),
            other => Err(format!("Unsupported resource type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Coding {
    /// Creates a coding from a system and code
    pub fn new(system: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            code: Some(code.into()),
            ..Default::default()
        }
    }

    /// Creates a coding with only a code
    pub fn code_only(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CodeableConcept {
    /// Code of the first coding, if it has one
    pub fn first_code(&self) -> Option<&str> {
        self.coding.first().and_then(|c| c.code.as_deref())
    }
}

/// Coded metadata describing the context an artifact is meant for
///
/// Only the `valueCodeableConcept` choice is typed; other value choices
/// (`valueReference`, `valueQuantity`, ...) are carried in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_codeable_concept: Option<CodeableConcept>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UsageContext {
    /// Creates a usage context with a coded concept value
    pub fn coded(code: Coding, value: CodeableConcept) -> Self {
        Self {
            code: Some(code),
            value_codeable_concept: Some(value),
            extra: Map::new(),
        }
    }

    /// The `grouper-type = model-grouper` marker carried by grouper value sets
    pub fn model_grouper() -> Self {
        Self::coded(
            Coding::new(GROUPER_USAGE_CONTEXT_TYPE_SYSTEM, GROUPER_TYPE_CODE),
            CodeableConcept {
                coding: vec![Coding::new(GROUPER_TYPE_VALUE_SYSTEM, MODEL_GROUPER_CODE)],
                text: Some(MODEL_GROUPER_TEXT.to_string()),
                extra: Map::new(),
            },
        )
    }

    /// The usage context code (`focus`, `priority`, ...)
    pub fn code_str(&self) -> Option<&str> {
        self.code.as_ref().and_then(|c| c.code.as_deref())
    }

    /// Code of the first coding of the value
    pub fn value_code(&self) -> Option<&str> {
        self.value_codeable_concept
            .as_ref()
            .and_then(CodeableConcept::first_code)
    }

    /// Has a code and a coded concept value with at least one coding
    pub fn is_actionable(&self) -> bool {
        self.code.is_some()
            && self
                .value_codeable_concept
                .as_ref()
                .map(|v| !v.coding.is_empty())
                .unwrap_or(false)
    }

    /// Whether this is the model grouper marker
    pub fn is_model_grouper(&self) -> bool {
        self.code_str() == Some(GROUPER_TYPE_CODE) && self.value_code() == Some(MODEL_GROUPER_CODE)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identifier {
    pub fn new(system: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            value: Some(value.into()),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profile: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Extension with the value choices the importer writes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_usage_context: Option<UsageContext>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Extension {
    pub fn boolean(url: impl Into<String>, value: bool) -> Self {
        Self {
            url: url.into(),
            value_boolean: Some(value),
            ..Default::default()
        }
    }

    pub fn uri(url: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            value_uri: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn usage_context(url: impl Into<String>, value: UsageContext) -> Self {
        Self {
            url: url.into(),
            value_usage_context: Some(value),
            ..Default::default()
        }
    }
}

/// FHIR R4 related-artifact types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelatedArtifactType {
    Documentation,
    Justification,
    Citation,
    Predecessor,
    Successor,
    DerivedFrom,
    DependsOn,
    ComposedOf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedArtifact {
    #[serde(rename = "type")]
    pub artifact_type: RelatedArtifactType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RelatedArtifact {
    pub fn new(artifact_type: RelatedArtifactType, resource: impl Into<String>) -> Self {
        Self {
            artifact_type,
            resource: Some(resource.into()),
            extension: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Extensions with the given url
    pub fn extensions_by_url<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a Extension> {
        self.extension.iter().filter(move |e| e.url == url)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeInclude {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_set: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compose {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<ComposeInclude>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A knowledge artifact: ValueSet, Library or PlanDefinition
///
/// `compose` and `expansion` are only populated on value sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResource {
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_context: Vec<UsageContext>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_artifact: Vec<RelatedArtifact>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose: Option<Compose>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansion: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataResource {
    /// Creates an empty resource of the given kind
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            resource_type: kind.as_str().to_string(),
            id: Some(id.into()),
            meta: None,
            extension: Vec::new(),
            url: None,
            identifier: Vec::new(),
            version: None,
            use_context: Vec::new(),
            related_artifact: Vec::new(),
            compose: None,
            expansion: None,
            extra: Map::new(),
        }
    }

    /// The resource kind, or `None` for types the importer does not process
    pub fn kind(&self) -> Option<ResourceKind> {
        ResourceKind::from_str(&self.resource_type).ok()
    }

    /// Canonical reference (`url|version`), if the resource has a url
    pub fn canonical(&self) -> Option<Canonical> {
        let url = self.url.as_deref()?;
        Canonical::from_parts(url, self.version.as_deref()).ok()
    }

    /// Id for log output
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("<no id>")
    }

    /// Profile urls declared in `meta.profile`
    pub fn profiles(&self) -> &[String] {
        self.meta.as_ref().map(|m| m.profile.as_slice()).unwrap_or(&[])
    }

    /// Mutable `meta.profile`, creating `meta` when absent
    pub fn profiles_mut(&mut self) -> &mut Vec<String> {
        &mut self.meta.get_or_insert_with(Meta::default).profile
    }

    pub fn has_profile(&self, profile: &str) -> bool {
        self.profiles().iter().any(|p| p == profile)
    }

    pub fn has_extension(&self, url: &str) -> bool {
        self.extension.iter().any(|e| e.url == url)
    }

    /// Whether this library is the bundle's root specification library
    pub fn is_root_specification_library(&self) -> bool {
        self.has_profile(US_PH_SPECIFICATION_LIBRARY_PROFILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_resource_preserves_unknown_members() {
        let original = json!({
            "resourceType": "ValueSet",
            "id": "vs-1",
            "url": "http://example.org/ValueSet/vs-1",
            "version": "1.0.0",
            "status": "active",
            "name": "Example",
            "compose": {
                "include": [{"system": "http://snomed.info/sct", "concept": [{"code": "1"}]}]
            },
            "useContext": [{
                "code": {"system": "http://terminology.hl7.org/CodeSystem/usage-context-type", "code": "focus"},
                "valueCodeableConcept": {"coding": [{"code": "123"}], "text": "Condition"}
            }]
        });

        let resource: MetadataResource = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(resource.kind(), Some(ResourceKind::ValueSet));
        assert_eq!(resource.extra["status"], "active");
        assert_eq!(resource.use_context[0].code_str(), Some("focus"));

        let round_tripped = serde_json::to_value(&resource).unwrap();
        assert_eq!(round_tripped, original);
    }

    #[test]
    fn test_canonical_uses_version() {
        let mut library = MetadataResource::new(ResourceKind::Library, "rctc");
        assert!(library.canonical().is_none());

        library.url = Some("http://example.org/Library/rctc".to_string());
        library.version = Some("2024".to_string());
        assert_eq!(
            library.canonical().unwrap().as_str(),
            "http://example.org/Library/rctc|2024"
        );
    }

    #[test]
    fn test_unsupported_kind() {
        let resource: MetadataResource =
            serde_json::from_value(json!({"resourceType": "Measure", "id": "m"})).unwrap();
        assert_eq!(resource.kind(), None);
    }

    #[test]
    fn test_usage_context_actionable() {
        let mut context = UsageContext::coded(
            Coding::code_only("priority"),
            CodeableConcept {
                coding: vec![Coding::code_only("routine")],
                ..Default::default()
            },
        );
        assert!(context.is_actionable());
        assert_eq!(context.value_code(), Some("routine"));

        context.value_codeable_concept = Some(CodeableConcept {
            text: Some("routine".to_string()),
            ..Default::default()
        });
        assert!(!context.is_actionable());

        context.value_codeable_concept = None;
        assert!(!context.is_actionable());
    }

    #[test]
    fn test_model_grouper_marker() {
        let marker = UsageContext::model_grouper();
        assert!(marker.is_model_grouper());
        assert!(marker.is_actionable());
    }

    #[test]
    fn test_related_artifact_type_wire_format() {
        let artifact = RelatedArtifact::new(RelatedArtifactType::ComposedOf, "http://x/ValueSet/a");
        let value = serde_json::to_value(&artifact).unwrap();
        assert_eq!(value["type"], "composed-of");
        assert_eq!(value["resource"], "http://x/ValueSet/a");
    }

    #[test]
    fn test_profiles_mut_creates_meta() {
        let mut resource = MetadataResource::new(ResourceKind::Library, "root");
        assert!(resource.profiles().is_empty());
        resource
            .profiles_mut()
            .push(US_PH_SPECIFICATION_LIBRARY_PROFILE.to_string());
        assert!(resource.is_root_specification_library());
    }
}
