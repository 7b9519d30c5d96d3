use anyhow::{Context, Result};
use clap::Parser;
use sheetfills_core::{ExtractionReport, ExtractorConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = "sheetfills.toml";

#[derive(Parser)]
#[command(name = "sheetfills")]
#[command(about = "Report XLSX header columns grouped by fill color", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the XLSX file (overrides the configured source path)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Every outcome, including bad configuration, is reported on stdout
    let report = match load_config(&cli) {
        Ok(config) => sheetfills_core::extract(&config),
        Err(e) => ExtractionReport::Failed {
            error: format!("{:#}", e),
        },
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("{}", serde_json::json!({ "error": e.to_string() })),
    }
}

fn load_config(cli: &Cli) -> Result<ExtractorConfig> {
    let mut config = if let Some(config_path) = &cli.config {
        ExtractorConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_config_path.exists() {
            ExtractorConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            ExtractorConfig::default()
        }
    };

    if let Some(file) = &cli.file {
        config.source_path = file.clone();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_argument_overrides_source_path() {
        let cli = Cli::parse_from(["sheetfills", "plan.xlsx"]);
        let config = load_config(&cli).unwrap();

        assert_eq!(config.source_path, PathBuf::from("plan.xlsx"));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["sheetfills", "--config", "/nonexistent/sheetfills.toml"]);
        let err = load_config(&cli).unwrap_err();

        assert!(format!("{:#}", err).starts_with("Failed to load config from"));
    }
}
