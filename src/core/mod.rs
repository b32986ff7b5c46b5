//! Core business logic for eRSD import.
//!
//! This module contains the transform pipeline and the import orchestration.
//!
//! # Modules
//!
//! - [`transform`] - Synchronous bundle rewriting (classification, graph, assembly)
//! - [`import`] - Emission, chunking and concurrent commit
//!
//! # Import Workflow
//!
//! 1. **Validate**: Check the request preconditions
//! 2. **Transform**: Normalize, classify and link every artifact
//! 3. **Emit**: Build conditional PUT entries, skipping stored value sets
//! 4. **Commit**: Submit chunks concurrently as transaction bundles
//! 5. **Report**: Produce an import summary with one report per chunk
//!
//! # Example
//!
//! ```rust,no_run
//! use ersd_import::adapters::repository::create_repository;
//! use ersd_import::config::load_config;
//! use ersd_import::core::import::ImportCoordinator;
//! use ersd_import::domain::ImportRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ersd-import.toml")?;
//! let repository = create_repository(&config, false)?;
//!
//! let bundle = serde_json::from_str(&std::fs::read_to_string("ersd-bundle.json")?)?;
//! let request = ImportRequest::new("https://vsm.example.org/fhir", bundle);
//!
//! let coordinator = ImportCoordinator::new(repository, config.import.clone());
//! let summary = coordinator.execute(request).await?;
//!
//! println!("{}", summary.message());
//! println!("Failed chunks: {}", summary.failed_chunks().len());
//! # Ok(())
//! # }
//! ```

pub mod import;
pub mod transform;
