//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the importer configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Load configuration
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Validate configuration
        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Dry Run: {}", config.application.dry_run);
                println!("  FHIR Server: {}", config.fhir.base_url);
                println!("  Auth Type: {:?}", config.fhir.auth_type);
                println!("  TLS Verify: {}", config.fhir.tls_verify);
                println!(
                    "  Authoritative URL: {}",
                    config
                        .import
                        .app_authoritative_url
                        .as_deref()
                        .unwrap_or("(not set, pass --authoritative-url)")
                );
                println!("  Chunk Size: {}", config.import.chunk_size);
                println!(
                    "  Commit Timeout: {}s",
                    config.import.commit_timeout_secs
                );
                if config.logging.local_enabled {
                    println!("  Log Directory: {}", config.logging.local_path);
                }
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_missing_file_exit_code() {
        let args = ValidateArgs {};
        let code = args.execute("/nonexistent/ersd-import.toml").await.unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_invalid_chunk_size_exit_code() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[fhir]
base_url = "http://localhost:8080/fhir"

[import]
chunk_size = 0

[logging]
local_enabled = false
"#
        )
        .unwrap();

        let args = ValidateArgs {};
        let code = args
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
