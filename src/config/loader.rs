//! Settings loading functionality.
//!
//! This module provides the [`SettingsLoader`] type for loading engine
//! settings from a YAML file and layering environment overrides on top.

use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::Settings;

/// Environment variable overriding the master workbook path.
pub const MASTER_FILE_ENV: &str = "MAESTROS_FILE_PATH";

/// Environment variable overriding the server bind address.
pub const BIND_ENV: &str = "INCIDENT_ENGINE_BIND";

/// Loads engine settings.
///
/// # Example
///
/// ```no_run
/// use incident_engine::config::SettingsLoader;
///
/// let settings = SettingsLoader::load("./config/settings.yaml")?;
/// println!("Master data: {}", settings.master_data.path.display());
/// # Ok::<(), incident_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SettingsLoader;

impl SettingsLoader {
    /// Loads settings from a YAML file, applies environment overrides and
    /// validates the result.
    ///
    /// # Returns
    ///
    /// Returns the settings on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML (`ConfigParseError`)
    /// - A value is out of range (`InvalidSetting`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Settings> {
        let settings = Self::load_yaml(path.as_ref())?;
        let settings = Self::apply_overrides(settings, |key| std::env::var(key).ok());
        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Like [`SettingsLoader::load`], but falls back to the defaults when no
    /// path is given.
    pub fn load_or_default(path: Option<&Path>) -> EngineResult<Settings> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let settings =
                    Self::apply_overrides(Settings::default(), |key| std::env::var(key).ok());
                Self::validate(&settings)?;
                Ok(settings)
            }
        }
    }

    /// Loads and parses the YAML file without overrides.
    fn load_yaml(path: &Path) -> EngineResult<Settings> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Applies environment overrides using the given variable lookup.
    pub fn apply_overrides<F>(mut settings: Settings, lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(MASTER_FILE_ENV).filter(|v| !v.trim().is_empty()) {
            debug!(path = %path, "Master data path overridden from environment");
            settings.master_data.path = PathBuf::from(path);
        }
        if let Some(bind) = lookup(BIND_ENV).filter(|v| !v.trim().is_empty()) {
            debug!(bind = %bind, "Bind address overridden from environment");
            settings.server.bind = bind;
        }
        settings
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(settings: &Settings) -> EngineResult<()> {
        if settings.pricing.social_security_rate < Decimal::ZERO {
            return Err(EngineError::InvalidSetting {
                key: "pricing.social_security_rate".to_string(),
                message: format!(
                    "must not be negative, got {}",
                    settings.pricing.social_security_rate
                ),
            });
        }
        if settings.export.rows_per_page == 0 {
            return Err(EngineError::InvalidSetting {
                key: "export.rows_per_page".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
