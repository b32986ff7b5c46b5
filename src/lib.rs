// eRSD Import - eRSD/RCTC Bundle Importer for FHIR Servers
// Copyright (c) 2025 eRSD Import Contributors
// Licensed under the MIT License

//! # eRSD Import - eRSD/RCTC Bundle Importer
//!
//! eRSD Import ingests an electronic Reporting and Surveillance Distribution
//! (eRSD) specification bundle, rewrites it into a normalized,
//! dependency-annotated form and commits it to a FHIR server in bounded,
//! concurrently executed transaction chunks.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Normalizing** OID identifiers on every artifact
//! - **Classifying** value sets as groupers or leafs
//! - **Linking** value sets into the root specification library's dependency graph,
//!   with condition and priority annotations checked for conflicts
//! - **Committing** idempotent upserts as concurrent transaction bundles,
//!   isolating per-chunk failures
//!
//! ## Architecture
//!
//! eRSD Import follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (transform, emission, batch commit)
//! - [`adapters`] - External integrations (FHIR server, in-memory repository)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ersd_import::adapters::repository::create_repository;
//! use ersd_import::config::load_config;
//! use ersd_import::core::import::ImportCoordinator;
//! use ersd_import::domain::ImportRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration
//!     let config = load_config("ersd-import.toml")?;
//!
//!     // Create the repository and coordinator
//!     let repository = create_repository(&config, false)?;
//!     let coordinator = ImportCoordinator::new(repository, config.import.clone());
//!
//!     // Execute import
//!     let bundle = serde_json::from_str(&std::fs::read_to_string("ersd-bundle.json")?)?;
//!     let summary = coordinator
//!         .execute(ImportRequest::new("https://vsm.example.org/fhir", bundle))
//!         .await?;
//!
//!     println!("{}", summary.message());
//!     Ok(())
//! }
//! ```
//!
//! ## Transformation
//!
//! The transform is synchronous and touches no repository:
//!
//! ```rust,no_run
//! use ersd_import::core::transform::transform_bundle;
//! use ersd_import::domain::Bundle;
//!
//! # fn example(bundle: Bundle) -> Result<(), Box<dyn std::error::Error>> {
//! let transformed = transform_bundle(bundle, "https://vsm.example.org/fhir")?;
//! println!(
//!     "{} groupers, {} leafs",
//!     transformed.grouper_count, transformed.leaf_count
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! eRSD Import uses the [`domain::ImportError`] type for all errors:
//!
//! ```rust,no_run
//! use ersd_import::domain::ImportError;
//!
//! fn example() -> Result<(), ImportError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = ersd_import::config::load_config("ersd-import.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! A failed chunk is not an error: it is reported in the
//! [`core::import::ImportSummary`] returned by the commit.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
