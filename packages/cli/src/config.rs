use constitution_pagination::PaginationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "constitution.config.json";

/// Constitution configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Title printed on the cover page
    #[serde(default = "default_document_title")]
    pub document_title: String,

    /// Page layout constants
    #[serde(flatten)]
    pub pagination: PaginationConfig,
}

fn default_document_title() -> String {
    "Constitution".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = Self::path_in(cwd);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "Loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn path_in(cwd: impl AsRef<Path>) -> PathBuf {
        cwd.as_ref().join(DEFAULT_CONFIG_NAME)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_title: default_document_title(),
            pagination: PaginationConfig::default(),
        }
    }
}
