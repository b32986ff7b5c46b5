//! Dependency graph of the root specification library
//!
//! Every classified value set becomes one edge: groupers as owned
//! `composed-of` edges, leafs as `depends-on` edges. Edges are unique per
//! `(kind, target canonical)`; a value set seen twice merges its condition and
//! priority contexts into the existing edge.

use crate::domain::vocabulary::{ARTIFACT_IS_OWNED_EXT, CRMI_INTENDED_USAGE_CONTEXT_EXT};
use crate::domain::{
    Extension, ImportError, RelatedArtifact, RelatedArtifactType, Result, UsageContext,
};
use std::collections::HashMap;

use super::classify::Classification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    ComposedOf,
    DependsOn,
}

impl From<EdgeKind> for RelatedArtifactType {
    fn from(kind: EdgeKind) -> Self {
        match kind {
            EdgeKind::ComposedOf => RelatedArtifactType::ComposedOf,
            EdgeKind::DependsOn => RelatedArtifactType::DependsOn,
        }
    }
}

/// A related-artifact edge with its usage-context annotations
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyEdge {
    pub kind: EdgeKind,
    pub target: String,
    pub owned: bool,
    pub conditions: Vec<UsageContext>,
    pub priorities: Vec<UsageContext>,
}

impl DependencyEdge {
    pub fn new(kind: EdgeKind, target: impl Into<String>, owned: bool) -> Self {
        Self {
            kind,
            target: target.into(),
            owned,
            conditions: Vec::new(),
            priorities: Vec::new(),
        }
    }

    /// Adds a condition context unless an identical one is present
    pub fn merge_condition(&mut self, condition: UsageContext) {
        if !self.conditions.contains(&condition) {
            self.conditions.push(condition);
        }
    }

    /// Adds a priority context, enforcing one priority code per target
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Conflict`] when the first coding of `priority`
    /// differs from a priority already recorded on this edge.
    pub fn merge_priority(&mut self, priority: UsageContext) -> Result<()> {
        let Some(incoming) = priority.value_code().map(str::to_string) else {
            return Ok(());
        };

        for existing in &self.priorities {
            if let Some(existing_code) = existing.value_code() {
                if existing_code != incoming {
                    return Err(ImportError::Conflict {
                        canonical: self.target.clone(),
                        existing: existing_code.to_string(),
                        incoming,
                    });
                }
            }
        }

        if !self
            .priorities
            .iter()
            .any(|p| p.value_code() == Some(incoming.as_str()))
        {
            self.priorities.push(priority);
        }
        Ok(())
    }

    /// Renders the edge as a FHIR RelatedArtifact
    ///
    /// Extension order: one intended-usage-context per condition, then per
    /// priority, then `isOwned` when owned.
    pub fn to_related_artifact(&self) -> RelatedArtifact {
        let mut artifact = RelatedArtifact::new(self.kind.into(), self.target.clone());
        artifact.extension = self
            .conditions
            .iter()
            .chain(&self.priorities)
            .map(|ctx| Extension::usage_context(CRMI_INTENDED_USAGE_CONTEXT_EXT, ctx.clone()))
            .collect();
        if self.owned {
            artifact
                .extension
                .push(Extension::boolean(ARTIFACT_IS_OWNED_EXT, true));
        }
        artifact
    }
}

/// Insertion-ordered set of edges keyed by `(kind, target)`
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    edges: Vec<DependencyEdge>,
    index: HashMap<(EdgeKind, String), usize>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new edge or merges annotations into the existing one
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Conflict`] on priority disagreement.
    pub fn insert_or_merge(
        &mut self,
        kind: EdgeKind,
        target: &str,
        owned: bool,
        conditions: Vec<UsageContext>,
        priorities: Vec<UsageContext>,
    ) -> Result<()> {
        let key = (kind, target.to_string());
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                self.edges.push(DependencyEdge::new(kind, target, owned));
                self.index.insert(key, self.edges.len() - 1);
                self.edges.len() - 1
            }
        };

        let edge = &mut self.edges[position];
        for condition in conditions {
            edge.merge_condition(condition);
        }
        for priority in priorities {
            edge.merge_priority(priority)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter()
    }

    pub fn get(&self, kind: EdgeKind, target: &str) -> Option<&DependencyEdge> {
        self.index
            .get(&(kind, target.to_string()))
            .map(|&position| &self.edges[position])
    }

    pub fn to_related_artifacts(&self) -> Vec<RelatedArtifact> {
        self.edges
            .iter()
            .map(DependencyEdge::to_related_artifact)
            .collect()
    }
}

/// Grouper and leaf edges collected while walking the bundle's value sets
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub groupers: EdgeSet,
    pub leafs: EdgeSet,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the edge for one classified value set
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Conflict`] when the value set's priorities
    /// disagree with each other or with an earlier value set of the same
    /// canonical.
    pub fn add_value_set(&mut self, canonical: &str, classification: Classification) -> Result<()> {
        let Classification {
            is_grouper,
            conditions,
            priorities,
        } = classification;

        if is_grouper {
            self.groupers
                .insert_or_merge(EdgeKind::ComposedOf, canonical, true, conditions, priorities)
        } else {
            self.leafs
                .insert_or_merge(EdgeKind::DependsOn, canonical, false, conditions, priorities)
        }
    }
}
