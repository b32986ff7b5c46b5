//! Value set classification
//!
//! A value set is a *grouper* when its compose includes other value sets and a
//! *leaf* otherwise. Its `focus` and `priority` usage contexts become edge
//! metadata on the root library and are stripped from the value set itself.

use crate::domain::vocabulary::{FOCUS_CODE, PRIORITY_CODE};
use crate::domain::{MetadataResource, UsageContext};

/// Grouper/leaf label plus the usage contexts that become edge metadata
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Classification {
    pub is_grouper: bool,
    /// Actionable `focus` contexts, in resource order
    pub conditions: Vec<UsageContext>,
    /// Actionable `priority` contexts, in resource order, not yet deduplicated
    pub priorities: Vec<UsageContext>,
}

/// Classifies a value set and extracts its condition and priority contexts
pub fn classify(value_set: &MetadataResource) -> Classification {
    let mut classification = Classification {
        is_grouper: has_grouper_compose(value_set),
        ..Default::default()
    };

    for context in value_set.use_context.iter().filter(|c| c.is_actionable()) {
        match context.code_str() {
            Some(FOCUS_CODE) => classification.conditions.push(context.clone()),
            Some(PRIORITY_CODE) => classification.priorities.push(context.clone()),
            _ => {}
        }
    }

    classification
}

/// Whether any `compose.include` references another value set
pub fn has_grouper_compose(value_set: &MetadataResource) -> bool {
    value_set
        .compose
        .as_ref()
        .map(|compose| {
            compose
                .include
                .iter()
                .any(|include| !include.value_set.is_empty())
        })
        .unwrap_or(false)
}

/// Whether the `grouper-type = model-grouper` usage context is absent
pub fn is_model_grouper_context_missing(value_set: &MetadataResource) -> bool {
    !value_set.use_context.iter().any(UsageContext::is_model_grouper)
}

/// Drops `focus`/`priority` contexts and contexts without a code
pub fn clean_use_context(value_set: &mut MetadataResource) {
    value_set.use_context.retain(|context| {
        matches!(context.code_str(), Some(code) if code != FOCUS_CODE && code != PRIORITY_CODE)
    });
}
