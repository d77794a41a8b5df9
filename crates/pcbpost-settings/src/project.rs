//! Per-project settings
//!
//! Each board project keeps a `PCB2GCode.json` next to its Gerber files,
//! naming the input file for each layer and whether tool changes are kept.
//! Keys are upper-case tags written in sorted order with 4-space indent so
//! the file diffs cleanly.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ConfigError, SettingsResult};

/// File name of the per-project settings file
pub const PROJECT_SETTINGS_FILE: &str = "PCB2GCode.json";

/// A `"Y"`/`"N"` flag
///
/// Only `"Y"` (either case) reads as yes. Any other value, including an
/// empty string, `null` or a non-string, reads as no.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum YesNo {
    #[default]
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

impl<'de> Deserialize<'de> for YesNo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = deserializer.deserialize_any(LenientString)?;
        Ok(match value.as_deref() {
            Some(v) if v.eq_ignore_ascii_case("y") => Self::Yes,
            Some(v) if v.eq_ignore_ascii_case("n") => Self::No,
            other => {
                warn!("Unrecognized Y/N value {:?}, treated as N", other);
                Self::No
            }
        })
    }
}

/// Accepts a string and maps `null` or any scalar of another type to `None`
struct LenientString;

impl<'de> Visitor<'de> for LenientString {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

/// A layer file name; `null` or a non-string value means no file
fn file_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(deserializer
        .deserialize_any(LenientString)?
        .unwrap_or_default())
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl From<YesNo> for bool {
    fn from(value: YesNo) -> Self {
        value == YesNo::Yes
    }
}

/// Settings stored in a board project directory
///
/// Field order matches the sorted key order of the file. Each key is read
/// on its own, so one odd value never discards the others.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Back copper Gerber file name
    #[serde(rename = "BACK_COPPER", deserialize_with = "file_name")]
    pub back_copper: String,
    /// Back engraving Gerber file name
    #[serde(rename = "BACK_ENGRAVING", deserialize_with = "file_name")]
    pub back_engraving: String,
    /// Excellon drill file name
    #[serde(rename = "DRILLING", deserialize_with = "file_name")]
    pub drilling: String,
    /// Front copper Gerber file name
    #[serde(rename = "FRONT_COPPER", deserialize_with = "file_name")]
    pub front_copper: String,
    /// Front engraving Gerber file name
    #[serde(rename = "FRONT_ENGRAVING", deserialize_with = "file_name")]
    pub front_engraving: String,
    /// Board outline Gerber file name
    #[serde(rename = "OUTLINE", deserialize_with = "file_name")]
    pub outline: String,
    /// Comment out M6/M0 after conversion
    #[serde(rename = "REMOVE_TOOL_CHANGES")]
    pub remove_tool_changes: YesNo,
}

impl ProjectSettings {
    /// Path of the settings file inside a project directory
    pub fn file_path(project_dir: &Path) -> PathBuf {
        project_dir.join(PROJECT_SETTINGS_FILE)
    }

    /// Whether tool changes should be removed
    pub fn remove_tool_changes(&self) -> bool {
        self.remove_tool_changes.into()
    }

    /// Load settings from a file, failing on any error
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content).map_err(|e| {
            ConfigError::Corrupted(format!("{}: {}", path.display(), e))
        })?;
        Ok(settings)
    }

    /// Load the project's settings
    ///
    /// A project without a settings file gets defaults. A badly formed file
    /// is ignored with a warning, also leaving defaults.
    pub fn load(project_dir: &Path) -> Self {
        let path = Self::file_path(project_dir);
        if !path.is_file() {
            debug!("No project settings at {}", path.display());
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Badly formed settings info ignored: {}", e);
                Self::default()
            }
        }
    }

    /// Serialize as sorted, 4-space indented JSON
    pub fn to_json(&self) -> SettingsResult<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| ConfigError::Corrupted(e.to_string()).into())
    }

    /// Save into the project directory
    ///
    /// Returns `false` without writing if the directory does not exist.
    pub fn save(&self, project_dir: &Path) -> SettingsResult<bool> {
        if !project_dir.is_dir() {
            debug!(
                "Project directory {} does not exist, settings not saved",
                project_dir.display()
            );
            return Ok(false);
        }
        fs::write(Self::file_path(project_dir), self.to_json()?)?;
        Ok(true)
    }
}
