//! Root artifact assembly
//!
//! Builds the root specification library's dependency list and re-links the
//! RCTC library and plan definition to the final grouper identities.

use crate::domain::canonical::strip_version;
use crate::domain::vocabulary::CRMI_MANIFEST_LIBRARY_PROFILE;
use crate::domain::{Canonical, ImportError, MetadataResource, Result};

use super::graph::{DependencyEdge, DependencyGraph, EdgeKind, EdgeSet};
use super::valueset::add_profiles;

/// Replaces the root library's related artifacts with the assembled edge list
///
/// The list is: plan definition (owned composed-of, then depends-on), RCTC
/// library (same pair), every grouper edge, every leaf edge.
///
/// # Errors
///
/// Returns [`ImportError::Validation`] when the plan definition or RCTC
/// library has no url.
pub fn assemble_root_library(
    root_library: &mut MetadataResource,
    plan_definition: &MetadataResource,
    rctc_library: &MetadataResource,
    graph: &DependencyGraph,
) -> Result<()> {
    add_profiles(root_library, &[CRMI_MANIFEST_LIBRARY_PROFILE]);

    let plan_canonical = required_canonical(plan_definition)?;
    let rctc_canonical = required_canonical(rctc_library)?;

    let mut related = Vec::with_capacity(4 + graph.groupers.len() + graph.leafs.len());
    for target in [plan_canonical.as_str(), rctc_canonical.as_str()] {
        related.push(DependencyEdge::new(EdgeKind::ComposedOf, target, true).to_related_artifact());
        related.push(DependencyEdge::new(EdgeKind::DependsOn, target, false).to_related_artifact());
    }
    related.extend(graph.groupers.to_related_artifacts());
    related.extend(graph.leafs.to_related_artifacts());

    tracing::debug!(
        root_library = root_library.display_id(),
        edges = related.len(),
        "Assembled root library dependencies"
    );
    root_library.related_artifact = related;
    Ok(())
}

/// Points the RCTC library's edges at the final grouper identities
///
/// For each grouper, existing edges whose target matches it ignoring the
/// version are removed before the grouper edge is appended.
pub fn rewire_rctc_library(rctc_library: &mut MetadataResource, groupers: &EdgeSet) {
    for grouper in groupers.iter() {
        let target = strip_version(&grouper.target);
        rctc_library.related_artifact.retain(|artifact| {
            artifact
                .resource
                .as_deref()
                .map(|resource| strip_version(resource) != target)
                .unwrap_or(true)
        });
        rctc_library
            .related_artifact
            .push(grouper.to_related_artifact());
    }
}

/// Pins plan definition references to the RCTC library's versioned canonical
///
/// Only applies when the RCTC library has both url and version.
pub fn rewrite_plan_definition(
    plan_definition: &mut MetadataResource,
    rctc_library: &MetadataResource,
) {
    let (Some(url), Some(_)) = (rctc_library.url.as_deref(), rctc_library.version.as_deref())
    else {
        return;
    };
    let Some(canonical) = rctc_library.canonical() else {
        return;
    };

    for artifact in &mut plan_definition.related_artifact {
        if artifact.resource.as_deref().is_some_and(|r| r.contains(url)) {
            artifact.resource = Some(canonical.as_str().to_string());
        }
    }
}

fn required_canonical(resource: &MetadataResource) -> Result<Canonical> {
    resource.canonical().ok_or_else(|| {
        ImportError::Validation(format!(
            "{} '{}' has no url",
            resource.resource_type,
            resource.display_id()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::classify::Classification;
    use crate::domain::vocabulary::ARTIFACT_IS_OWNED_EXT;
    use crate::domain::{RelatedArtifact, RelatedArtifactType, ResourceKind};

    fn artifact(kind: ResourceKind, id: &str, version: Option<&str>) -> MetadataResource {
        let mut resource = MetadataResource::new(kind, id);
        resource.url = Some(format!("http://ersd.example.org/{}/{}", kind, id));
        resource.version = version.map(String::from);
        resource
    }

    fn graph() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        graph
            .add_value_set(
                "http://x/ValueSet/g|2",
                Classification {
                    is_grouper: true,
                    ..Default::default()
                },
            )
            .unwrap();
        graph
            .add_value_set("http://x/ValueSet/l|1", Classification::default())
            .unwrap();
        graph
    }

    #[test]
    fn test_root_library_edge_order() {
        let mut root = artifact(ResourceKind::Library, "root", Some("1"));
        let plan = artifact(ResourceKind::PlanDefinition, "plandefinition-ersd", Some("1"));
        let rctc = artifact(ResourceKind::Library, "rctc", Some("1"));

        assemble_root_library(&mut root, &plan, &rctc, &graph()).unwrap();

        let summary: Vec<(RelatedArtifactType, &str)> = root
            .related_artifact
            .iter()
            .map(|ra| (ra.artifact_type, ra.resource.as_deref().unwrap()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (
                    RelatedArtifactType::ComposedOf,
                    "http://ersd.example.org/PlanDefinition/plandefinition-ersd|1"
                ),
                (
                    RelatedArtifactType::DependsOn,
                    "http://ersd.example.org/PlanDefinition/plandefinition-ersd|1"
                ),
                (RelatedArtifactType::ComposedOf, "http://ersd.example.org/Library/rctc|1"),
                (RelatedArtifactType::DependsOn, "http://ersd.example.org/Library/rctc|1"),
                (RelatedArtifactType::ComposedOf, "http://x/ValueSet/g|2"),
                (RelatedArtifactType::DependsOn, "http://x/ValueSet/l|1"),
            ]
        );
        assert_eq!(root.related_artifact[0].extension[0].url, ARTIFACT_IS_OWNED_EXT);
        assert!(root.related_artifact[1].extension.is_empty());
        assert!(root.has_profile(CRMI_MANIFEST_LIBRARY_PROFILE));
    }

    #[test]
    fn test_root_library_requires_plan_definition_url() {
        let mut root = artifact(ResourceKind::Library, "root", Some("1"));
        let plan = MetadataResource::new(ResourceKind::PlanDefinition, "pd");
        let rctc = artifact(ResourceKind::Library, "rctc", Some("1"));

        let err = assemble_root_library(&mut root, &plan, &rctc, &graph()).unwrap_err();
        assert!(matches!(err, ImportError::Validation(_)));
    }

    #[test]
    fn test_rctc_rewire_replaces_any_version() {
        let mut rctc = artifact(ResourceKind::Library, "rctc", Some("1"));
        rctc.related_artifact = vec![
            RelatedArtifact::new(RelatedArtifactType::ComposedOf, "http://x/ValueSet/g|1"),
            RelatedArtifact::new(RelatedArtifactType::DependsOn, "http://x/ValueSet/g"),
            RelatedArtifact::new(RelatedArtifactType::ComposedOf, "http://x/ValueSet/other|1"),
        ];

        rewire_rctc_library(&mut rctc, &graph().groupers);

        let targets: Vec<&str> = rctc
            .related_artifact
            .iter()
            .filter_map(|ra| ra.resource.as_deref())
            .collect();
        assert_eq!(targets, vec!["http://x/ValueSet/other|1", "http://x/ValueSet/g|2"]);
    }

    #[test]
    fn test_plan_definition_pinned_to_rctc_version() {
        let rctc = artifact(ResourceKind::Library, "rctc", Some("2024-06-01"));
        let mut plan = artifact(ResourceKind::PlanDefinition, "pd", Some("1"));
        plan.related_artifact = vec![
            RelatedArtifact::new(
                RelatedArtifactType::DependsOn,
                "http://ersd.example.org/Library/rctc|2020",
            ),
            RelatedArtifact::new(RelatedArtifactType::DependsOn, "http://other/Library/x"),
        ];

        rewrite_plan_definition(&mut plan, &rctc);

        assert_eq!(
            plan.related_artifact[0].resource.as_deref(),
            Some("http://ersd.example.org/Library/rctc|2024-06-01")
        );
        assert_eq!(
            plan.related_artifact[1].resource.as_deref(),
            Some("http://other/Library/x")
        );
    }

    #[test]
    fn test_plan_definition_untouched_without_rctc_version() {
        let rctc = artifact(ResourceKind::Library, "rctc", None);
        let mut plan = artifact(ResourceKind::PlanDefinition, "pd", Some("1"));
        plan.related_artifact = vec![RelatedArtifact::new(
            RelatedArtifactType::DependsOn,
            "http://ersd.example.org/Library/rctc|2020",
        )];

        let before = plan.clone();
        rewrite_plan_definition(&mut plan, &rctc);
        assert_eq!(plan, before);
    }
}
