//! Import request and its preconditions

use super::bundle::Bundle;
use super::errors::ImportError;
use super::result::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters of one import invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// Base url stamped into grouper authoritative-source extensions
    #[serde(default)]
    pub app_authoritative_url: Option<String>,

    /// The eRSD bundle as raw JSON
    #[serde(default)]
    pub resource: Option<Value>,
}

/// A request whose preconditions hold
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub app_authoritative_url: String,
    pub bundle: Bundle,
}

impl ImportRequest {
    pub fn new(app_authoritative_url: impl Into<String>, resource: Value) -> Self {
        Self {
            app_authoritative_url: Some(app_authoritative_url.into()),
            resource: Some(resource),
        }
    }

    /// Checks the request preconditions and parses the bundle envelope
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Validation`] when the authoritative url is
    /// missing or blank, when no resource is supplied, or when the resource
    /// is not a Bundle.
    pub fn validate(self) -> Result<ValidatedRequest> {
        let app_authoritative_url = self
            .app_authoritative_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                ImportError::Validation(
                    "appAuthoritativeUrl parameter is required and must not be blank".to_string(),
                )
            })?;

        let resource = self.resource.ok_or_else(|| {
            ImportError::Validation("resource parameter is required".to_string())
        })?;

        let found = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or("<none>");
        if found != "Bundle" {
            return Err(ImportError::Validation(format!(
                "Expected resource of type Bundle, found {found}"
            )));
        }

        let bundle: Bundle = serde_json::from_value(resource)
            .map_err(|e| ImportError::Validation(format!("Malformed Bundle: {e}")))?;

        Ok(ValidatedRequest {
            app_authoritative_url,
            bundle,
        })
    }
}
