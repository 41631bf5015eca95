use crate::settings::config::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads the settings file once per process. Changes made through
/// [`SettingsManager::update_setting`] only live for this session unless
/// saved.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings_path: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Create a new settings manager with default settings location
    pub fn new() -> Result<Self> {
        Self::from_path(Self::default_settings_path()?)
    }

    /// Create a settings manager from a specific path
    pub fn from_path(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            write_settings(&path, &Settings::default())?;
        }

        let settings = Self::load_from_file_with_backup(&path)?;

        Ok(Self {
            settings_path: path,
            settings,
        })
    }

    /// Get the default settings path (~/.voxchat/settings.toml)
    pub fn default_settings_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".voxchat").join("settings.toml"))
    }

    /// Load settings from a TOML file with backup on parse failure
    fn load_from_file_with_backup(path: &Path) -> Result<Settings> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {path:?}"))?;

        match toml::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!(?path, error = %e, "Settings file is corrupt, restoring defaults");

                let backup_path = path.with_extension("toml.backup");
                fs::rename(path, &backup_path).with_context(|| {
                    format!("Failed to backup corrupted settings to {backup_path:?}")
                })?;

                let default_settings = Settings::default();
                write_settings(path, &default_settings)?;
                Ok(default_settings)
            }
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Update in-memory settings with a closure. Note: settings are not saved to disk
    pub fn update_setting<F>(&mut self, updater: F)
    where
        F: FnOnce(&mut Settings),
    {
        updater(&mut self.settings);
    }

    /// Explicitly persist in-memory settings to disk
    pub fn save(&self) -> Result<()> {
        write_settings(&self.settings_path, &self.settings)
    }

    /// Get the settings file path
    pub fn path(&self) -> &Path {
        &self.settings_path
    }
}

fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {parent:?}"))?;
    }

    let contents = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
    fs::write(path, contents).with_context(|| format!("Failed to write settings to {path:?}"))
}
