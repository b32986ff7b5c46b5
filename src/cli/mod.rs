//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for eRSD import using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// eRSD Import - eRSD/RCTC bundle importer for FHIR servers
#[derive(Parser, Debug)]
#[command(name = "ersd-import")]
#[command(version, about, long_about = None)]
#[command(author = "eRSD Import Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "ersd-import.toml", env = "ERSD_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ERSD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transform an eRSD bundle and commit it to the configured FHIR server
    Import(commands::import::ImportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_import() {
        let cli = Cli::parse_from(["ersd-import", "import", "ersd.json"]);
        assert_eq!(cli.config, "ersd-import.toml");
        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.bundle, "ersd.json");
                assert!(!args.dry_run);
                assert!(args.chunk_size.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_import_overrides() {
        let cli = Cli::parse_from([
            "ersd-import",
            "import",
            "ersd.json",
            "--authoritative-url",
            "https://vsm.example.org/fhir",
            "--chunk-size",
            "20",
            "--dry-run",
            "--output",
            "out.json",
            "--yes",
        ]);
        let Commands::Import(args) = cli.command else {
            panic!("expected import command");
        };
        assert_eq!(
            args.authoritative_url.as_deref(),
            Some("https://vsm.example.org/fhir")
        );
        assert_eq!(args.chunk_size, Some(20));
        assert!(args.dry_run);
        assert!(args.yes);
        assert_eq!(args.output.as_deref(), Some("out.json"));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["ersd-import", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["ersd-import", "--log-level", "debug", "init"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_import_requires_bundle() {
        assert!(Cli::try_parse_from(["ersd-import", "import"]).is_err());
    }
}
