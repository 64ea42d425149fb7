//! Configuration management
//!
//! TOML config under the platform config directory, with SUPABASE_URL and
//! SUPABASE_KEY environment overrides for the remote storage credentials.
//! Paths default under the platform data directory when unset.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data and model file locations
    #[serde(default)]
    pub paths: PathsConfig,
    /// Supabase storage sync settings
    #[serde(default)]
    pub supabase: SupabaseConfig,
}

/// File locations for the example store and model artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Training data log (JSONL); defaults to <data dir>/data/training_data.jsonl
    pub data_file: Option<PathBuf>,
    /// Model artifact; defaults to <data dir>/models/model.json
    pub model_file: Option<PathBuf>,
}

impl PathsConfig {
    pub fn data_file(&self) -> Result<PathBuf> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("data").join("training_data.jsonl")),
        }
    }

    pub fn model_file(&self) -> Result<PathBuf> {
        match &self.model_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("models").join("model.json")),
        }
    }
}

/// Supabase storage settings. Sync is disabled unless both `url` and
/// `key` are set (in the config file or via environment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. https://xyz.supabase.co
    pub url: Option<String>,
    /// Service or anon key
    pub key: Option<String>,
    /// Storage bucket holding the model artifact
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

fn default_bucket() -> String {
    "model-bucket".to_string()
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            key: None,
            bucket: default_bucket(),
        }
    }
}

/// Get the config directory (~/.config/fankygpt on Linux).
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("fankygpt"))
        .context("Could not determine config directory")
}

/// Get the data directory (~/.local/share/fankygpt on Linux).
pub fn data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join("fankygpt"))
        .context("Could not determine data directory")
}

impl Config {
    fn config_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from disk (or defaults when no file exists), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Environment variables win over the config file.
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("SUPABASE_URL") {
            if !url.is_empty() {
                self.supabase.url = Some(url);
            }
        }
        if let Ok(key) = std::env::var("SUPABASE_KEY") {
            if !key.is_empty() {
                self.supabase.key = Some(key);
            }
        }
    }

    /// Persist to the config file, creating the directory on demand.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to encode config")?;
        std::fs::write(&path, content).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.supabase.url.is_none());
        assert_eq!(config.supabase.bucket, "model-bucket");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [supabase]
            url = "https://xyz.supabase.co"
            key = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.supabase.url.as_deref(), Some("https://xyz.supabase.co"));
        assert_eq!(config.supabase.bucket, "model-bucket");
        assert!(config.paths.data_file.is_none());
    }

    #[test]
    fn test_explicit_paths_win() {
        let config: Config = toml::from_str(
            r#"
            [paths]
            data_file = "/tmp/custom.jsonl"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.paths.data_file().unwrap(),
            PathBuf::from("/tmp/custom.jsonl")
        );
    }
}
