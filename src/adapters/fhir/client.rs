//! FHIR REST client
//!
//! Implements [`FhirRepository`] against a FHIR R4 server: existence checks
//! are `_summary=count` searches and commits are transaction bundles POSTed
//! to the server base.

use super::models::SearchSetResponse;
use crate::adapters::repository::FhirRepository;
use crate::config::{AuthType, FhirConfig};
use crate::domain::{ImportError, RepositoryError, ResourceKind, Result, TransactionBundle};
use crate::log_retry_attempt;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

const FHIR_JSON: &str = "application/fhir+json";

/// FHIR server repository
///
/// # Example
///
/// ```no_run
/// use ersd_import::adapters::fhir::FhirServerClient;
/// use ersd_import::adapters::repository::FhirRepository;
/// use ersd_import::config::FhirConfig;
/// use ersd_import::domain::ResourceKind;
///
/// # async fn example() -> ersd_import::domain::Result<()> {
/// let client = FhirServerClient::new(FhirConfig::default())?;
/// let stored = client
///     .exists(ResourceKind::Library, "http://ersd.aimsplatform.org/fhir/Library/rctc", Some("1.0.0"))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct FhirServerClient {
    /// Base URL without trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    config: FhirConfig,
}

impl FhirServerClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: FhirConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled for the FHIR server");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            ImportError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build authorization header value
    fn auth_header_value(&self) -> Option<String> {
        match self.config.auth_type {
            AuthType::None => None,
            AuthType::Bearer => self
                .config
                .token
                .as_ref()
                .map(|token| format!("Bearer {}", token.expose_secret().as_ref())),
            AuthType::Basic => match (&self.config.username, &self.config.password) {
                (Some(username), Some(password)) => {
                    let credentials =
                        format!("{}:{}", username, password.expose_secret().as_ref());
                    let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                    Some(format!("Basic {encoded}"))
                }
                _ => None,
            },
        }
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_header_value() {
            Some(auth) => request.header(AUTHORIZATION, auth),
            None => request,
        }
    }

    /// Retry a request with exponential backoff
    ///
    /// Only transient repository errors are retried.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    let transient = matches!(&e, ImportError::Repository(r) if r.is_transient());
                    if !transient || attempt >= retry.max_retries {
                        return Err(e);
                    }

                    let delay_ms = (retry.initial_delay_ms as f64
                        * retry.backoff_multiplier.powi(attempt as i32 - 1))
                        as u64;
                    let delay_ms = delay_ms.min(retry.max_delay_ms);

                    log_retry_attempt!(attempt, retry.max_retries, &e);
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

fn send_error(e: reqwest::Error) -> ImportError {
    if e.is_timeout() {
        RepositoryError::Timeout(e.to_string()).into()
    } else {
        RepositoryError::ConnectionFailed(e.to_string()).into()
    }
}

/// Maps a non-success response to a repository error
async fn status_error(response: Response) -> ImportError {
    let status = response.status();
    let message = response.text().await.unwrap_or_default();
    let error = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            RepositoryError::AuthenticationFailed(format!("{status}: {message}"))
        }
        s if s.is_server_error() => RepositoryError::ServerError {
            status: s.as_u16(),
            message,
        },
        s => RepositoryError::ClientError {
            status: s.as_u16(),
            message,
        },
    };
    error.into()
}

#[async_trait]
impl FhirRepository for FhirServerClient {
    async fn exists(&self, kind: ResourceKind, url: &str, version: Option<&str>) -> Result<bool> {
        let endpoint = format!("{}/{}", self.base_url, kind);
        let mut query = vec![("url", url), ("_summary", "count")];
        if let Some(version) = version {
            query.push(("version", version));
        }

        tracing::debug!(
            resource_type = %kind,
            url = %url,
            version = version.unwrap_or_default(),
            "Searching for existing resource"
        );

        let response = self
            .retry_request(|| async {
                let request = self
                    .with_auth(self.client.get(&endpoint))
                    .header(ACCEPT, FHIR_JSON)
                    .query(&query);

                let resp = request.send().await.map_err(send_error)?;
                if !resp.status().is_success() {
                    return Err(status_error(resp).await);
                }

                resp.json::<SearchSetResponse>().await.map_err(|e| {
                    ImportError::from(RepositoryError::InvalidResponse(format!(
                        "Malformed search response: {e}"
                    )))
                })
            })
            .await?;

        Ok(response.has_matches())
    }

    async fn transaction(&self, bundle: TransactionBundle) -> Result<Value> {
        let body = serde_json::to_vec(&bundle)?;

        tracing::debug!(
            bundle_id = %bundle.id,
            entries = bundle.len(),
            "Posting transaction bundle"
        );

        self.retry_request(|| async {
            let request = self
                .with_auth(self.client.post(&self.base_url))
                .header(CONTENT_TYPE, FHIR_JSON)
                .header(ACCEPT, FHIR_JSON)
                .body(body.clone());

            let resp = request.send().await.map_err(send_error)?;
            if !resp.status().is_success() {
                return Err(status_error(resp).await);
            }

            resp.json::<Value>().await.map_err(|e| {
                ImportError::from(RepositoryError::TransactionFailed(format!(
                    "Unreadable transaction response: {e}"
                )))
            })
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "fhir-server"
    }
}
