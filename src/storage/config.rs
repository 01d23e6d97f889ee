//! Configuration handling for catalog-tidy
//!
//! Configuration is stored in `.connect/tidy.toml` (catalog) and
//! `~/.config/catalog-tidy/config.toml` (global). Both files are optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DEFAULT_MODEL_VERSION;

/// Name of the catalog config file inside `.connect/`
pub const CATALOG_CONFIG_FILE: &str = "tidy.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Catalog-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Version stamped into definitions that have none
    pub model_version: String,

    /// Component directories under `.connect/`, processed in this order
    pub components: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            components: vec![
                "sources".to_string(),
                "sinks".to_string(),
                "scanners".to_string(),
            ],
        }
    }
}

impl CatalogConfig {
    /// Rejects values that would make a run write outside the catalog
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_version.trim().is_empty() {
            return Err(ConfigError::Invalid("model_version must not be empty".to_string()));
        }

        for component in &self.components {
            let path = Path::new(component);
            let single = path.components().count() == 1
                && path.file_name().is_some_and(|name| name == component.as_str());
            if component.is_empty() || !single {
                return Err(ConfigError::Invalid(format!(
                    "component '{}' must be a plain directory name",
                    component
                )));
            }
        }

        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Combined configuration (global + catalog)
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub global: GlobalConfig,
}

impl Config {
    /// Loads configuration for the catalog rooted at `root`
    pub fn for_root(root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let catalog = Self::load_catalog_config(root)?;

        Ok(Self { catalog, global })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "catalog-tidy", "catalog-tidy")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads catalog configuration from `root/.connect/tidy.toml`
    fn load_catalog_config(root: &Path) -> Result<CatalogConfig> {
        let config_path = root.join(super::CONNECT_DIR).join(CATALOG_CONFIG_FILE);

        if !config_path.exists() {
            return Ok(CatalogConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read catalog config: {}", config_path.display()))?;

        let config: CatalogConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse catalog config")?;

        config
            .validate()
            .with_context(|| format!("Invalid catalog config: {}", config_path.display()))?;

        Ok(config)
    }
}
