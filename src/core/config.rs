use crate::builders::validator::{ConfigValidator, StandardValidator};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the project-local settings, relative to the project root.
pub const CONFIG_FILE_NAME: &str = ".meanlintrc";

/// Contents of `.meanlintrc`. Unknown fields are ignored.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeanLintConfig {
    #[serde(default, deserialize_with = "string_entries")]
    pub disable_rules: Vec<String>,
}

/// Keeps the string entries of an array and skips the rest with a warning.
fn string_entries<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(id) => Some(id),
            other => {
                warn!("{CONFIG_FILE_NAME}: ignoring non-string entry {other} in disableRules");
                None
            }
        })
        .collect())
}

impl MeanLintConfig {
    pub fn disabled_rules(&self) -> HashSet<&str> {
        self.disable_rules.iter().map(String::as_str).collect()
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
    root: PathBuf,
}

impl ConfigManager {
    /// Uses the current working directory as the project root.
    pub fn new() -> Result<Self> {
        let root = std::env::current_dir().context("Failed to read the current directory")?;
        Ok(Self::new_at(root))
    }

    pub fn new_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let config_path = root.join(CONFIG_FILE_NAME);
        Self { config_path, root }
    }

    /// Writes the default configuration unless one already exists.
    /// Returns whether a file was created.
    pub fn initialize(&self) -> Result<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }

        self.save_config(&MeanLintConfig::default())?;
        Ok(true)
    }

    /// Loads the configuration and logs anything suspicious in it.
    pub fn load_validated(&self) -> MeanLintConfig {
        let config = self.load_config();
        for issue in StandardValidator::new().validate_config(&config) {
            warn!("{CONFIG_FILE_NAME}: {issue}");
        }
        config
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }
}

pub trait ConfigProvider {
    /// Never fails: a missing or broken file yields the default configuration.
    fn load_config(&self) -> MeanLintConfig;
    fn save_config(&self, config: &MeanLintConfig) -> Result<()>;
    fn get_config_path(&self) -> &Path;
}

impl ConfigProvider for ConfigManager {
    fn load_config(&self) -> MeanLintConfig {
        let content = match fs::read_to_string(&self.config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.config_path.display(), "no config file, using defaults");
                return MeanLintConfig::default();
            }
            Err(e) => {
                warn!("Could not read {CONFIG_FILE_NAME}, using defaults: {e}");
                return MeanLintConfig::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Could not parse {CONFIG_FILE_NAME}, using defaults: {e}");
                MeanLintConfig::default()
            }
        }
    }

    fn save_config(&self, config: &MeanLintConfig) -> Result<()> {
        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, content)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;

        Ok(())
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
