//! Import command implementation
//!
//! This module implements the `import` command: read an eRSD bundle from a
//! JSON file, transform it and commit it to the configured FHIR server.

use crate::adapters::repository::create_repository;
use crate::config::load_config;
use crate::core::import::{ImportCoordinator, ImportSummary};
use crate::domain::{ImportError, ImportRequest};
use clap::Args;
use std::path::Path;
use tokio::sync::watch;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to the eRSD bundle (JSON)
    pub bundle: String,

    /// Override the authoritative url stamped into grouper value sets
    #[arg(long, value_name = "URL")]
    pub authoritative_url: Option<String>,

    /// Override the number of entries per transaction bundle
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Dry run mode - transform and commit to an in-memory repository only
    #[arg(long)]
    pub dry_run: bool,

    /// Write the emitted entries as a transaction bundle to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Exit code for an import error
///
/// 2 for configuration and validation errors, 3 for conflicts and artifacts
/// that already exist, 5 for everything else.
pub fn exit_code_for(error: &ImportError) -> i32 {
    match error {
        ImportError::Validation(_) | ImportError::Configuration(_) => 2,
        ImportError::Conflict { .. } | ImportError::Exists { .. } => 3,
        _ => 5,
    }
}

/// Exit code for a completed commit: 0 when every chunk committed, 1 otherwise
pub fn exit_code_for_summary(summary: &ImportSummary) -> i32 {
    if summary.is_fully_committed() {
        0
    } else {
        1
    }
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(bundle = %self.bundle, "Starting import command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if let Some(url) = &self.authoritative_url {
            tracing::info!(url = %url, "Overriding authoritative url from CLI");
            config.import.app_authoritative_url = Some(url.clone());
        }

        if let Some(chunk_size) = self.chunk_size {
            tracing::info!(chunk_size, "Overriding chunk size from CLI");
            config.import.chunk_size = chunk_size;
        }

        let dry_run = self.dry_run || config.application.dry_run;

        // Validate configuration
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let bundle = match read_bundle(Path::new(&self.bundle)) {
            Ok(b) => b,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read bundle");
                eprintln!("Failed to read bundle {}: {e}", self.bundle);
                return Ok(exit_code_for(&e));
            }
        };

        if dry_run {
            tracing::info!("Dry run mode enabled - nothing will be written to the FHIR server");
            println!("🔍 DRY RUN MODE - Nothing will be written to the FHIR server");
            println!();
        }

        let repository = match create_repository(&config, dry_run) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create repository");
                eprintln!("Failed to initialize import: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let request = ImportRequest {
            app_authoritative_url: config.import.app_authoritative_url.clone(),
            resource: Some(bundle),
        };

        let coordinator =
            ImportCoordinator::new(repository, config.import.clone()).with_dry_run(dry_run);

        let prepared = match coordinator.prepare(request).await {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Import aborted before commit");
                eprintln!("❌ Import aborted: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!(
            "Transformed bundle: {} groupers, {} leafs, {} entries to commit ({} value sets already stored)",
            prepared.grouper_count,
            prepared.leaf_count,
            prepared.len(),
            prepared.skipped_value_sets.len()
        );

        if let Some(output) = &self.output {
            let json = serde_json::to_string_pretty(&prepared.to_transaction_bundle())?;
            std::fs::write(output, json)?;
            tracing::info!(output = %output, "Emitted entries written");
            println!("📄 Emitted entries written to {output}");
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !dry_run {
            println!();
            println!("Import Configuration:");
            println!("  FHIR server: {}", config.fhir.base_url);
            println!("  Entries: {}", prepared.len());
            println!("  Chunk size: {}", config.import.chunk_size);
            println!();
            print!("Proceed with import? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Import cancelled.");
                return Ok(0);
            }
        }

        println!("🚀 Committing...");

        let summary = tokio::select! {
            result = coordinator.commit(prepared) => match result {
                Ok(summary) => summary,
                Err(e) => {
                    tracing::error!(error = %e, "Commit failed");
                    eprintln!("❌ Commit failed: {e}");
                    return Ok(exit_code_for(&e));
                }
            },
            Ok(()) = shutdown_signal.changed() => {
                tracing::warn!("Import interrupted, pending chunks aborted");
                eprintln!("⚠️  Import interrupted; some chunks may already be committed");
                return Ok(1);
            }
        };

        summary.log_summary();
        print_summary(&summary);

        Ok(exit_code_for_summary(&summary))
    }
}

fn read_bundle(path: &Path) -> Result<serde_json::Value, ImportError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ImportError::Validation(format!("Bundle is not valid JSON: {e}")))
}

fn print_summary(summary: &ImportSummary) {
    println!();
    println!("📊 Import Summary");
    println!("  {}", summary.message());
    println!("  Chunks: {}", summary.chunks.len());
    println!(
        "  Entries committed: {}/{}",
        summary.entries_committed(),
        summary.entries_total
    );
    println!("  Value sets already stored: {}", summary.skipped_value_sets);

    let failed = summary.failed_chunks();
    if failed.is_empty() {
        println!("✅ All chunks committed");
    } else {
        println!("⚠️  {} chunk(s) not committed:", failed.len());
        for chunk in failed {
            println!(
                "   - chunk {} ({} entries): {}",
                chunk.index,
                chunk.size,
                chunk.error().unwrap_or_default()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::import::{ChunkReport, ChunkStatus};
    use chrono::Utc;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&ImportError::Validation("x".into())), 2);
        assert_eq!(exit_code_for(&ImportError::Configuration("x".into())), 2);
        assert_eq!(
            exit_code_for(&ImportError::Conflict {
                canonical: "http://x/ValueSet/a".into(),
                existing: "routine".into(),
                incoming: "emergent".into(),
            }),
            3
        );
        assert_eq!(
            exit_code_for(&ImportError::Exists {
                resource_type: "Library".into(),
                url: "http://x/Library/rctc".into(),
                version: "1".into(),
            }),
            3
        );
        assert_eq!(exit_code_for(&ImportError::Io("x".into())), 5);
    }

    #[test]
    fn test_partial_commit_exit_code() {
        let mut summary = ImportSummary::new(Utc::now());
        assert_eq!(exit_code_for_summary(&summary), 0);

        summary.chunks.push(ChunkReport {
            index: 0,
            size: 1,
            duration: Duration::from_millis(1),
            status: ChunkStatus::Failed("rejected".into()),
        });
        assert_eq!(exit_code_for_summary(&summary), 1);
    }

    #[test]
    fn test_read_bundle_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = read_bundle(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::Validation(_)));
    }

    #[test]
    fn test_read_bundle_missing_file() {
        let err = read_bundle(Path::new("/nonexistent/ersd.json")).unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}
