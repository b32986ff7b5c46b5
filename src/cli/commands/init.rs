//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "ersd-import.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing eRSD import configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your FHIR server settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set ERSD_FHIR_TOKEN (bearer) or ERSD_FHIR_PASSWORD (basic)");
                println!("  3. Validate configuration: ersd-import validate-config");
                println!("  4. Try a dry run: ersd-import import ersd-bundle.json --dry-run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# eRSD Import Configuration File

[application]
log_level = "info"
dry_run = false

[fhir]
base_url = "http://localhost:8080/fhir"
auth_type = "none"

[import]
app_authoritative_url = "https://vsm.example.org/fhir"
chunk_size = 74
commit_timeout_secs = 600

[logging]
local_enabled = false
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# eRSD Import Configuration File
# Imports eRSD/RCTC specification bundles into a FHIR server
#
# Values of the form ${VAR} are read from the environment (or a .env file).
# Any setting can also be overridden with an ERSD_<SECTION>_<KEY> variable,
# e.g. ERSD_FHIR_BASE_URL or ERSD_IMPORT_CHUNK_SIZE.

# ============================================================================
# Application Configuration
# ============================================================================
[application]
# Log level: trace | debug | info | warn | error
log_level = "info"

# Transform and commit against an in-memory repository only
dry_run = false

# ============================================================================
# FHIR Server Configuration
# ============================================================================
[fhir]
base_url = "https://fhir.example.org/fhir"

# Authentication: none | basic | bearer
auth_type = "bearer"
token = "${ERSD_FHIR_TOKEN}"
# auth_type = "basic"
# username = "importer"
# password = "${ERSD_FHIR_PASSWORD}"

# Request timeout in seconds
timeout_seconds = 60

# TLS certificate verification (disable only for development servers)
tls_verify = true

[fhir.retry]
max_retries = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

# ============================================================================
# Import Configuration
# ============================================================================
[import]
# Base url stamped into grouper value set authoritative sources
# ({app_authoritative_url}/ValueSet/{id}); can be given with --authoritative-url
app_authoritative_url = "https://vsm.example.org/fhir"

# Entries per transaction bundle
chunk_size = 74

# Upper bound on the whole commit phase, in seconds
commit_timeout_secs = 600

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = true

# Local log directory
local_path = "/var/log/ersd-import"

# Log rotation: daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
