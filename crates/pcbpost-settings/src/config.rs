//! Tool-wide settings
//!
//! Where pcb2gcode lives, which converter settings file each layer uses,
//! and how runs are laid out on disk. Stored as JSON or TOML, chosen by
//! file extension.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use pcbpost_core::BoardLayer;

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Default output folder, relative to the project directory
pub const DEFAULT_OUTPUT_FOLDER: &str = "gcode";

/// Settings shared across all projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// pcb2gcode executable
    pub executable_path: Option<PathBuf>,
    /// Converter settings for the front copper layer
    pub front_copper_settings: Option<PathBuf>,
    /// Converter settings for the back copper layer
    pub back_copper_settings: Option<PathBuf>,
    /// Converter settings for the front engraving layer
    pub front_engraving_settings: Option<PathBuf>,
    /// Converter settings for the back engraving layer
    pub back_engraving_settings: Option<PathBuf>,
    /// Converter settings for the board outline
    pub outline_settings: Option<PathBuf>,
    /// Converter settings for drilling
    pub drill_settings: Option<PathBuf>,
    /// Last project directory used
    pub project_path: Option<PathBuf>,
    /// Output folder inside the project directory
    pub output_folder: String,
    /// Write `combined.ngc` after conversion
    pub combine_outputs: bool,
    /// Accept a drill file whose last section has no footer
    pub allow_missing_footer: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            executable_path: None,
            front_copper_settings: None,
            back_copper_settings: None,
            front_engraving_settings: None,
            back_engraving_settings: None,
            outline_settings: None,
            drill_settings: None,
            project_path: None,
            output_folder: DEFAULT_OUTPUT_FOLDER.to_string(),
            combine_outputs: false,
            allow_missing_footer: false,
        }
    }
}

impl ToolSettings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pcbpost").join("settings.json"))
    }

    /// Load from the default location, falling back to defaults if absent
    pub fn load_or_default() -> SettingsResult<Self> {
        Self::load_or_default_from(Self::default_path().as_deref())
    }

    /// Load from `path` if it names an existing file, otherwise use defaults
    ///
    /// `None` means no settings location could be determined.
    pub fn load_or_default_from(path: Option<&Path>) -> SettingsResult<Self> {
        match path {
            Some(path) if path.is_file() => Self::load_from_file(path),
            Some(path) => {
                debug!("No tool settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                warn!("Could not determine config directory, using default tool settings");
                Ok(Self::default())
            }
        }
    }

    /// Load settings from a `.json` or `.toml` file
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let settings: Self = match format_of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a `.json` or `.toml` file, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        let folder = Path::new(&self.output_folder);
        if folder.is_absolute()
            || folder
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(SettingsError::InvalidSetting {
                key: "output_folder".to_string(),
                reason: "must stay inside the project directory".to_string(),
            });
        }

        if self
            .executable_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(SettingsError::InvalidSetting {
                key: "executable_path".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Output folder name, with the default substituted for an empty value
    pub fn output_folder(&self) -> &str {
        if self.output_folder.trim().is_empty() {
            DEFAULT_OUTPUT_FOLDER
        } else {
            &self.output_folder
        }
    }

    /// Converter settings file for a layer
    pub fn layer_settings(&self, layer: BoardLayer) -> Option<&PathBuf> {
        match layer {
            BoardLayer::FrontCopper => self.front_copper_settings.as_ref(),
            BoardLayer::BackCopper => self.back_copper_settings.as_ref(),
            BoardLayer::FrontEngraving => self.front_engraving_settings.as_ref(),
            BoardLayer::BackEngraving => self.back_engraving_settings.as_ref(),
            BoardLayer::Outline => self.outline_settings.as_ref(),
            BoardLayer::Drilling => self.drill_settings.as_ref(),
        }
    }
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )
        .into()),
    }
}
