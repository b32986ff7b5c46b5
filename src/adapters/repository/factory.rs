//! Repository factory
//!
//! This module provides the factory function that creates the repository an
//! import commits to, based on configuration.

use crate::adapters::fhir::FhirServerClient;
use crate::adapters::memory::InMemoryRepository;
use crate::adapters::repository::traits::FhirRepository;
use crate::config::ImportToolConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create a repository based on the configuration
///
/// # Arguments
///
/// * `config` - The importer configuration
/// * `dry_run` - When true, an empty in-memory repository is returned and
///   nothing reaches the configured FHIR server
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements FhirRepository
///
/// # Errors
///
/// Returns an error if the FHIR client cannot be created
pub fn create_repository(
    config: &ImportToolConfig,
    dry_run: bool,
) -> Result<Arc<dyn FhirRepository + Send + Sync>> {
    if dry_run {
        tracing::info!("Dry run: using in-memory repository");
        return Ok(Arc::new(InMemoryRepository::new()) as Arc<dyn FhirRepository + Send + Sync>);
    }

    tracing::info!(base_url = %config.fhir.base_url, "Creating FHIR server client");
    let client = FhirServerClient::new(config.fhir.clone())?;

    Ok(Arc::new(client) as Arc<dyn FhirRepository + Send + Sync>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FhirConfig;

    #[test]
    fn test_dry_run_uses_memory() {
        let config = ImportToolConfig {
            application: Default::default(),
            fhir: FhirConfig::default(),
            import: Default::default(),
            logging: Default::default(),
        };

        let repository = create_repository(&config, true).unwrap();
        assert_eq!(repository.backend_name(), "in-memory");

        let repository = create_repository(&config, false).unwrap();
        assert_eq!(repository.backend_name(), "fhir-server");
    }
}
