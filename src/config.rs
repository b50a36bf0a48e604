use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DashError, DashResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    pub display: DisplayConfig,
    pub columns: ColumnConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Rows shown in the cleaned-data preview
    pub preview_rows: usize,

    /// Size of the ranked tables (top shortage, top availability, ...)
    pub top_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Substring that marks a column as a test-stage column
    pub stage_marker: String,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig {
                preview_rows: 100,
                top_n: 10,
            },
            columns: ColumnConfig {
                stage_marker: "(A/I/F)".to_string(),
            },
        }
    }
}

impl DashConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> DashResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DashError::configuration(format!("Failed to read config file: {}", e)))?;

        let config: DashConfig = toml::from_str(&content)
            .map_err(|e| DashError::configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    pub fn load_from_env() -> Self {
        let mut config = Self::default();

        // Override with environment variables
        if let Ok(rows) = std::env::var("BOMDASH_PREVIEW_ROWS") {
            if let Ok(value) = rows.parse::<usize>() {
                config.display.preview_rows = value;
            }
        }

        if let Ok(top_n) = std::env::var("BOMDASH_TOP_N") {
            if let Ok(value) = top_n.parse::<usize>() {
                config.display.top_n = value;
            }
        }

        if let Ok(marker) = std::env::var("BOMDASH_STAGE_MARKER") {
            if !marker.is_empty() {
                config.columns.stage_marker = marker;
            }
        }

        config
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> DashResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DashError::configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| DashError::configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = DashConfig::default();
        assert_eq!(config.display.preview_rows, 100);
        assert_eq!(config.display.top_n, 10);
        assert_eq!(config.columns.stage_marker, "(A/I/F)");
    }

    #[test]
    fn test_config_serialization() {
        let config = DashConfig::default();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        config.save_to_file(&config_path).unwrap();

        let loaded_config = DashConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded_config.display.preview_rows, 100);
        assert_eq!(loaded_config.columns.stage_marker, "(A/I/F)");
    }

    #[test]
    fn test_malformed_config_is_a_configuration_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "display = \"not a table\"").unwrap();

        let err = DashConfig::load_from_file(&config_path).unwrap_err();
        assert!(matches!(err, DashError::Configuration { .. }));
        assert!(err.user_message().contains("Configuration error"));
    }
}
