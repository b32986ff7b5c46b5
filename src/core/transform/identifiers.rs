//! OID identifier normalization
//!
//! eRSD bundles frequently carry bare OIDs (`2.16.840.1.113762.1.4.1146.6`)
//! under the URI identifier system. Those are rewritten to `urn:oid:` form.

use crate::domain::vocabulary::URI_IDENTIFIER_SYSTEM;
use crate::domain::Identifier;

const OID_PREFIX: &str = "urn:oid:";

/// Rewrites every qualifying identifier value to its `urn:oid:` form
///
/// An identifier qualifies when its system is `urn:ietf:rfc:3986` and its value
/// starts with a digit and is not already an `http`, `urn:oid` or `urn:uuid`
/// reference. Applying the function twice gives the same result as once.
///
/// # Examples
///
/// ```
/// use ersd_import::core::transform::identifiers::normalize_identifiers;
/// use ersd_import::domain::Identifier;
///
/// let fixed = normalize_identifiers(vec![Identifier::new("urn:ietf:rfc:3986", "12345")]);
/// assert_eq!(fixed[0].value.as_deref(), Some("urn:oid:12345"));
/// ```
pub fn normalize_identifiers(identifiers: Vec<Identifier>) -> Vec<Identifier> {
    identifiers
        .into_iter()
        .map(|mut identifier| {
            if let Some(fixed) = normalized_value(&identifier) {
                tracing::debug!(
                    from = identifier.value.as_deref().unwrap_or_default(),
                    to = %fixed,
                    "Normalized OID identifier"
                );
                identifier.value = Some(fixed);
            }
            identifier
        })
        .collect()
}

/// The `urn:oid:` form of the identifier value, or `None` if it does not qualify
fn normalized_value(identifier: &Identifier) -> Option<String> {
    if identifier.system.as_deref() != Some(URI_IDENTIFIER_SYSTEM) {
        return None;
    }
    let value = identifier.value.as_deref()?;
    let starts_with_digit = value.chars().next().is_some_and(|c| c.is_ascii_digit());
    let already_resolvable = value.starts_with("http")
        || value.starts_with("urn:oid")
        || value.starts_with("urn:uuid");

    (starts_with_digit && !already_resolvable).then(|| format!("{OID_PREFIX}{value}"))
}
