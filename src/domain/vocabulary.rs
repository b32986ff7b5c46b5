//! Fixed profile, extension and code-system URLs used by eRSD bundles
//! and the CRMI/VSM conventions the importer rewrites them into.

/// Profile marking the root specification library of an eRSD bundle
pub const US_PH_SPECIFICATION_LIBRARY_PROFILE: &str =
    "http://hl7.org/fhir/us/ecr/StructureDefinition/us-ph-specification-library";

/// Legacy eRSD v1 value set profile, dropped on import
pub const ERSD_VALUESET_PROFILE: &str =
    "http://hl7.org/fhir/us/ecr/StructureDefinition/ersd-valueset";

/// Legacy eRSD v1 value set library profile, dropped from the RCTC library
pub const ERSD_VALUESET_LIBRARY_PROFILE: &str =
    "http://hl7.org/fhir/us/ecr/StructureDefinition/ersd-valueset-library";

/// Profile stamped on grouper value sets
pub const VALUESET_GROUPER_PROFILE: &str =
    "http://aphl.org/fhir/vsm/StructureDefinition/vsm-valuesetgrouper";

/// VSM-hosted profile stamped on leaf value sets
pub const LEAF_VSM_HOSTED_PROFILE: &str =
    "http://aphl.org/fhir/vsm/StructureDefinition/vsm-hostedvalueset";

/// Triggering-condition profile stamped on leaf value sets
pub const LEAF_CONDITION_PROFILE: &str =
    "http://hl7.org/fhir/us/ecr/StructureDefinition/us-ph-triggering-valueset";

/// Manifest profile stamped on the root specification library
pub const CRMI_MANIFEST_LIBRARY_PROFILE: &str =
    "http://hl7.org/fhir/uv/crmi/StructureDefinition/crmi-manifestlibrary";

/// Extension marking a composed-of edge as owned by its source artifact
pub const ARTIFACT_IS_OWNED_EXT: &str = "http://hl7.org/fhir/StructureDefinition/artifact-isOwned";

/// Extension carrying a usage context on a related-artifact edge
pub const CRMI_INTENDED_USAGE_CONTEXT_EXT: &str =
    "http://hl7.org/fhir/uv/crmi/StructureDefinition/crmi-intendedUsageContext";

/// Extension naming the authoritative source of a value set
pub const AUTHORITATIVE_SOURCE_EXT: &str =
    "http://hl7.org/fhir/StructureDefinition/valueset-authoritativeSource";

/// Code system of the grouper usage-context type
pub const GROUPER_USAGE_CONTEXT_TYPE_SYSTEM: &str =
    "http://aphl.org/fhir/vsm/CodeSystem/usage-context-type";

/// Usage-context code identifying the grouper type
pub const GROUPER_TYPE_CODE: &str = "grouper-type";

/// Code system of grouper type values
pub const GROUPER_TYPE_VALUE_SYSTEM: &str = "http://aphl.org/fhir/vsm/CodeSystem/grouper-type";

/// Grouper type value for model groupers
pub const MODEL_GROUPER_CODE: &str = "model-grouper";

/// Display text of the model grouper usage context value
pub const MODEL_GROUPER_TEXT: &str = "Model grouper";

/// Usage-context code for the clinical condition a value set addresses
pub const FOCUS_CODE: &str = "focus";

/// Usage-context code for reporting urgency
pub const PRIORITY_CODE: &str = "priority";

/// Identifier system for URIs, the only system whose values get OID-prefixed
pub const URI_IDENTIFIER_SYSTEM: &str = "urn:ietf:rfc:3986";
