//! PCBPost Settings Crate
//!
//! Loads and saves the per-project settings file and the tool-wide settings,
//! and turns them into the immutable configuration the stages run with.

pub mod config;
pub mod error;
pub mod persistence;
pub mod project;

pub use config::ToolSettings;
pub use error::{ConfigError, SettingsError, SettingsResult};
pub use persistence::{layer_sources, resolve_output_dir, resolve_post_process_config, ProjectContext};
pub use project::{ProjectSettings, YesNo, PROJECT_SETTINGS_FILE};
