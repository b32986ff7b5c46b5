//! Value set rewriting
//!
//! Groupers and leafs receive different VSM profiles and authoritative-source
//! annotations. Both drop the legacy eRSD v1 value set profile.

use crate::domain::vocabulary::{
    AUTHORITATIVE_SOURCE_EXT, ERSD_VALUESET_PROFILE, LEAF_CONDITION_PROFILE,
    LEAF_VSM_HOSTED_PROFILE, VALUESET_GROUPER_PROFILE,
};
use crate::domain::{Extension, ImportError, MetadataResource, Result, UsageContext};
use std::collections::HashSet;
use url::Url;

use super::classify::is_model_grouper_context_missing;

/// Rewrites a grouper value set in place
///
/// Clears the expansion, adds the model grouper usage context when absent,
/// swaps the legacy profile for the grouper profile and stamps
/// `{app_authoritative_url}/ValueSet/{id}` as authoritative source.
pub fn prepare_grouper(value_set: &mut MetadataResource, app_authoritative_url: &str) {
    value_set.expansion = None;

    if is_model_grouper_context_missing(value_set) {
        value_set.use_context.push(UsageContext::model_grouper());
    }

    add_profiles(value_set, &[VALUESET_GROUPER_PROFILE]);
    remove_profile(value_set, ERSD_VALUESET_PROFILE);

    let source = format!(
        "{}/ValueSet/{}",
        app_authoritative_url,
        value_set.id.as_deref().unwrap_or_default()
    );
    add_authoritative_source(value_set, &source);
}

/// Rewrites a leaf value set in place
///
/// Adds the VSM-hosted and triggering-condition profiles, drops the legacy
/// profile and stamps the value set's own url, upgraded to https when
/// possible, as authoritative source.
pub fn prepare_leaf(value_set: &mut MetadataResource) {
    add_profiles(value_set, &[LEAF_VSM_HOSTED_PROFILE, LEAF_CONDITION_PROFILE]);
    remove_profile(value_set, ERSD_VALUESET_PROFILE);

    let Some(url) = value_set.url.clone() else {
        tracing::warn!(
            value_set = value_set.display_id(),
            "Leaf value set has no url, skipping authoritative source"
        );
        return;
    };

    let source = ensure_https(&url).unwrap_or_else(|e| {
        tracing::debug!(url = %url, error = %e, "Keeping authoritative source url as is");
        url
    });
    add_authoritative_source(value_set, &source);
}

/// Appends profiles, then removes duplicates keeping the first occurrence
pub fn add_profiles(resource: &mut MetadataResource, profiles: &[&str]) {
    let current = resource.profiles_mut();
    current.extend(profiles.iter().map(|p| p.to_string()));

    let mut seen = HashSet::new();
    current.retain(|profile| seen.insert(profile.clone()));
}

/// Removes every occurrence of a profile
pub fn remove_profile(resource: &mut MetadataResource, profile: &str) {
    if let Some(meta) = resource.meta.as_mut() {
        meta.profile.retain(|p| p != profile);
    }
}

/// Adds the authoritative-source extension unless one is already present
pub fn add_authoritative_source(resource: &mut MetadataResource, url: &str) {
    if !resource.has_extension(AUTHORITATIVE_SOURCE_EXT) {
        resource
            .extension
            .push(Extension::uri(AUTHORITATIVE_SOURCE_EXT, url));
    }
}

/// Rewrites a hierarchical url to the https scheme
///
/// Urls already using https are returned unchanged. Everything after the
/// scheme is kept as written.
///
/// # Errors
///
/// Returns [`ImportError::InvalidUrl`] when the string does not parse as an
/// absolute url with a host (`urn:` references, relative paths).
///
/// # Examples
///
/// ```
/// use ersd_import::core::transform::valueset::ensure_https;
///
/// assert_eq!(ensure_https("http://example.com/path").unwrap(), "https://example.com/path");
/// assert!(ensure_https("urn:oid:2.16.840.1").is_err());
/// ```
pub fn ensure_https(url: &str) -> Result<String> {
    let trimmed = url.trim();
    let parsed =
        Url::parse(trimmed).map_err(|e| ImportError::InvalidUrl(format!("{url}: {e}")))?;

    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(ImportError::InvalidUrl(format!("{url}: url has no host")));
    }

    if parsed.scheme() == "https" {
        return Ok(url.to_string());
    }

    match trimmed.split_once(':') {
        Some((_, rest)) => Ok(format!("https:{rest}")),
        None => Err(ImportError::InvalidUrl(format!("{url}: missing scheme"))),
    }
}
