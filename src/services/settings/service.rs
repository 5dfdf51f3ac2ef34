use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::CardConfig;

const CONFIG_FILE_NAME: &str = "week-grid.toml";

/// Loads and stores the card configuration file.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service for the platform config directory (e.g. `~/.config/week-grid/week-grid.toml`).
    pub fn with_default_path() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "WeekGrid", "week-grid")
            .ok_or_else(|| anyhow!("Could not determine the configuration directory"))?;
        Ok(Self::new(dirs.config_dir().join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate the configuration.
    ///
    /// A missing file yields the defaults; an invalid one is an error.
    pub fn load(&self) -> Result<CardConfig> {
        if !self.path.exists() {
            log::info!(
                "No configuration at {}, using defaults",
                self.path.display()
            );
            return Ok(CardConfig::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read configuration {}", self.path.display()))?;
        let config = CardConfig::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", self.path.display()))?;

        log::debug!(
            "Loaded configuration from {} ({} entities)",
            self.path.display(),
            config.entities.len()
        );
        Ok(config)
    }

    /// Validate and write `config`, creating parent directories as needed.
    pub fn save(&self, config: &CardConfig) -> Result<()> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create configuration directory {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write configuration {}", self.path.display()))?;
        Ok(())
    }
}
