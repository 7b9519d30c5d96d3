//! Extraction configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Document read when no other source is configured
pub const DEFAULT_SOURCE_PATH: &str = "Strength Periodisation.xlsx";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Spreadsheet to read, relative to the working directory unless absolute
    pub source_path: PathBuf,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
        }
    }
}

impl ExtractorConfig {
    pub fn new<P: Into<PathBuf>>(source_path: P) -> Self {
        Self {
            source_path: source_path.into(),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: ExtractorConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_path() {
        assert_eq!(
            ExtractorConfig::default().source_path,
            PathBuf::from("Strength Periodisation.xlsx")
        );
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheetfills.toml");
        fs::write(&path, "source_path = \"plans/week1.xlsx\"\n").unwrap();

        let config = ExtractorConfig::from_file(&path).unwrap();
        assert_eq!(config.source_path, PathBuf::from("plans/week1.xlsx"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: ExtractorConfig = toml::from_str("").unwrap();
        assert_eq!(config, ExtractorConfig::default());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "source_path = 3\n").unwrap();

        assert!(matches!(
            ExtractorConfig::from_file(&path),
            Err(ConfigError::Toml(_))
        ));
    }
}
