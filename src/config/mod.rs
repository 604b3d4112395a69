use crate::models::{AppSettings, AppearanceSettings};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Name of the settings file inside the configuration directory
pub const SETTINGS_FILE_NAME: &str = "barcode_generator_settings.json";

/// Configuration manager for loading and saving the JSON settings file.
///
/// Loading never fails: a missing or unreadable file yields [`AppSettings::default`], and a
/// file that only sets some keys is merged over the defaults.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory holding `barcode_generator_settings.json`
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join(SETTINGS_FILE_NAME),
            config_dir,
        })
    }

    /// Load the settings file, falling back to defaults on any failure.
    pub fn load_settings(&self) -> AppSettings {
        match self.try_load_settings() {
            Ok(Some(settings)) => {
                tracing::info!("Loaded settings from {}", self.settings_path);
                settings
            }
            Ok(None) => {
                tracing::warn!(
                    "Settings file not found at {}, using defaults",
                    self.settings_path
                );
                AppSettings::default()
            }
            Err(e) => {
                tracing::warn!("{:#}, using defaults", e);
                AppSettings::default()
            }
        }
    }

    /// Load the settings file, reporting read and parse errors.
    ///
    /// # Returns
    /// `Ok(None)` if the file does not exist
    pub fn try_load_settings(&self) -> Result<Option<AppSettings>> {
        if !self.settings_path.exists() {
            return Ok(None);
        }

        let file_contents = fs::read_to_string(&self.settings_path)
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let mut settings: AppSettings = serde_json::from_str(&file_contents)
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        if let Err(reason) = settings.appearance.validate() {
            tracing::warn!(
                "Ignoring appearance settings in {}: {}",
                self.settings_path,
                reason
            );
            settings.appearance = AppearanceSettings::default();
        }

        Ok(Some(settings))
    }

    /// Save the settings file.
    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings)
            .context("Failed to serialize settings to JSON")?;

        fs::write(&self.settings_path, json)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Save the settings file, logging instead of returning a write failure.
    ///
    /// # Returns
    /// `true` if the file was written
    pub fn persist_settings(&self, settings: &AppSettings) -> bool {
        match self.save_settings(settings) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Settings not saved: {:#}", e);
                false
            }
        }
    }

    /// Overwrite the settings file with the built-in defaults.
    pub fn reset_settings(&self) -> Result<AppSettings> {
        let defaults = AppSettings::default();
        self.save_settings(&defaults)?;
        tracing::info!("Settings reset to defaults");
        Ok(defaults)
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Get the settings file path.
    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}
