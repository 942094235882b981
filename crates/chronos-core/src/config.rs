//! TOML-based application configuration.
//!
//! Stores the observer's taxonomy (teaching modes/actions), the subject
//! picker list, and report rendering preferences. Stored at
//! `~/.config/chronos/config.toml`; set `CHRONOS_ENV=dev` to use a separate
//! development directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TaxonomyError};
use crate::taxonomy::{ActionDef, ModeDef, Taxonomy};

/// Taxonomy configuration: the closed mode/action sets for this observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    #[serde(default = "default_modes")]
    pub modes: Vec<ModeDef>,
    #[serde(default = "default_actions")]
    pub actions: Vec<ActionDef>,
}

/// Report rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Viewer timezone as minutes east of UTC.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/chronos/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
    /// Subjects offered by the presentation layer's picker.
    #[serde(default = "default_subjects")]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub report: ReportConfig,
}

// Default functions
fn default_modes() -> Vec<ModeDef> {
    Taxonomy::classroom_default().modes().map(|(_, m)| m.clone()).collect()
}
fn default_actions() -> Vec<ActionDef> {
    Taxonomy::classroom_default().actions().map(|(_, a)| a.clone()).collect()
}
fn default_subjects() -> Vec<String> {
    ["國文", "英文", "數學", "社會", "自然", "體育", "藝術", "綜合"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_utc_offset_minutes() -> i32 {
    8 * 60
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            modes: default_modes(),
            actions: default_actions(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            taxonomy: TaxonomyConfig::default(),
            subjects: default_subjects(),
            report: ReportConfig::default(),
        }
    }
}

/// Returns `~/.config/chronos[-dev]/` based on CHRONOS_ENV.
///
/// Set CHRONOS_ENV=dev to use the development data directory.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CHRONOS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("chronos-dev")
    } else {
        base_dir.join("chronos")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DirUnavailable(e.to_string()))?;
    Ok(dir)
}

impl Config {
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Build the validated taxonomy from this config.
    pub fn taxonomy(&self) -> Result<Taxonomy, TaxonomyError> {
        Taxonomy::new(self.taxonomy.modes.clone(), self.taxonomy.actions.clone())
    }

    /// The report timezone as a chrono offset.
    pub fn report_offset(&self) -> chrono::FixedOffset {
        chrono::FixedOffset::east_opt(self.report.utc_offset_minutes * 60)
            .unwrap_or_else(|| chrono::FixedOffset::east_opt(0).expect("zero offset is valid"))
    }
}
