//! eRSD bundle transformation
//!
//! This module rewrites an eRSD bundle into its normalized form. The pipeline
//! is synchronous and runs entirely in memory:
//!
//! - **Sort** entries into typed buckets ([`sorter`])
//! - **Normalize** OID identifiers ([`identifiers`])
//! - **Classify** value sets as grouper or leaf ([`classify`])
//! - **Rewrite** value set profiles and authoritative sources ([`valueset`])
//! - **Link** value sets into the dependency graph ([`graph`])
//! - **Assemble** the root library, RCTC library and plan definition ([`assemble`])

pub mod assemble;
pub mod classify;
pub mod graph;
pub mod identifiers;
pub mod sorter;
pub mod valueset;

use crate::domain::vocabulary::ERSD_VALUESET_LIBRARY_PROFILE;
use crate::domain::{Bundle, ImportError, MetadataResource, Result};

use assemble::{assemble_root_library, rewire_rctc_library, rewrite_plan_definition};
use classify::{classify, clean_use_context};
use graph::DependencyGraph;
use identifiers::normalize_identifiers;
use sorter::{BundleSorter, SortedArtifacts};
use valueset::{prepare_grouper, prepare_leaf, remove_profile};

/// The rewritten artifacts of one bundle, ready for emission
#[derive(Debug, Clone)]
pub struct TransformedBundle {
    /// Value sets in input order
    pub value_sets: Vec<MetadataResource>,
    pub root_library: MetadataResource,
    pub rctc_library: MetadataResource,
    pub plan_definition: MetadataResource,
    pub grouper_count: usize,
    pub leaf_count: usize,
    /// Resource types of skipped entries
    pub skipped: Vec<String>,
}

/// Transforms an eRSD bundle
///
/// This is the main entry point for the transform phase. Nothing is read from
/// or written to a repository.
///
/// # Arguments
///
/// * `bundle` - The input eRSD bundle
/// * `app_authoritative_url` - Base url stamped into grouper authoritative sources
///
/// # Errors
///
/// Returns [`ImportError::Validation`] for malformed bundles and
/// [`ImportError::Conflict`] when a value set's priorities disagree.
///
/// # Examples
///
/// ```
/// use ersd_import::core::transform::transform_bundle;
/// use ersd_import::domain::Bundle;
/// use serde_json::json;
///
/// let bundle: Bundle = serde_json::from_value(json!({
///     "resourceType": "Bundle",
///     "entry": [
///         {"resource": {"resourceType": "Library", "id": "root", "url": "http://x/Library/root",
///             "meta": {"profile": ["http://hl7.org/fhir/us/ecr/StructureDefinition/us-ph-specification-library"]}}},
///         {"resource": {"resourceType": "Library", "id": "rctc", "url": "http://x/Library/rctc", "version": "1"}},
///         {"resource": {"resourceType": "PlanDefinition", "id": "pd", "url": "http://x/PlanDefinition/pd"}}
///     ]
/// })).unwrap();
///
/// let transformed = transform_bundle(bundle, "https://vsm.example.org/fhir").unwrap();
/// assert_eq!(transformed.root_library.related_artifact.len(), 4);
/// ```
pub fn transform_bundle(bundle: Bundle, app_authoritative_url: &str) -> Result<TransformedBundle> {
    let SortedArtifacts {
        mut value_sets,
        mut root_library,
        mut rctc_library,
        mut plan_definition,
        skipped,
    } = BundleSorter::sort(bundle)?;

    let mut graph = DependencyGraph::new();
    for value_set in &mut value_sets {
        value_set.identifier = normalize_identifiers(std::mem::take(&mut value_set.identifier));

        let canonical = value_set.canonical().ok_or_else(|| {
            ImportError::Validation(format!(
                "ValueSet '{}' has no url",
                value_set.display_id()
            ))
        })?;

        let classification = classify(value_set);
        if classification.is_grouper {
            prepare_grouper(value_set, app_authoritative_url);
        } else {
            prepare_leaf(value_set);
        }
        graph.add_value_set(canonical.as_str(), classification)?;
        clean_use_context(value_set);
    }

    for artifact in [&mut root_library, &mut rctc_library, &mut plan_definition] {
        artifact.identifier = normalize_identifiers(std::mem::take(&mut artifact.identifier));
    }
    remove_profile(&mut rctc_library, ERSD_VALUESET_LIBRARY_PROFILE);

    rewire_rctc_library(&mut rctc_library, &graph.groupers);
    assemble_root_library(&mut root_library, &plan_definition, &rctc_library, &graph)?;
    rewrite_plan_definition(&mut plan_definition, &rctc_library);

    tracing::info!(
        value_sets = value_sets.len(),
        groupers = graph.groupers.len(),
        leafs = graph.leafs.len(),
        skipped = skipped.len(),
        "Transformed eRSD bundle"
    );

    Ok(TransformedBundle {
        value_sets,
        root_library,
        rctc_library,
        plan_definition,
        grouper_count: graph.groupers.len(),
        leaf_count: graph.leafs.len(),
        skipped,
    })
}
