//! Post-processing configuration
//!
//! The stages never read settings files themselves. They receive this
//! immutable struct, built at the boundary from whatever store holds the
//! project settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::GCODE_EXTENSION;

/// Fixed name of the drill file the converter is told to write
pub const DRILL_OUTPUT_FILE: &str = "drill.ngc";

/// Fixed name of the combined review file
pub const COMBINED_OUTPUT_FILE: &str = "combined.ngc";

/// Inputs to a post-processing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProcessConfig {
    /// Directory holding the generated G-code
    pub output_dir: PathBuf,
    /// Comment out M6 and M0 lines in every G-code file
    pub remove_tool_changes: bool,
    /// Write the combined review file
    pub combine: bool,
    /// Name of the multi-tool drill file inside `output_dir`
    pub drill_file_name: String,
    /// Extension shared by all G-code files, without the dot
    pub extension: String,
    /// Name of the combined review file inside `output_dir`
    pub combined_file_name: String,
    /// Accept a drill file whose last tool section has no footer
    pub allow_missing_footer: bool,
}

impl PostProcessConfig {
    /// Create a config for an output directory with default names
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            remove_tool_changes: true,
            combine: false,
            drill_file_name: DRILL_OUTPUT_FILE.to_string(),
            extension: GCODE_EXTENSION.to_string(),
            combined_file_name: COMBINED_OUTPUT_FILE.to_string(),
            allow_missing_footer: false,
        }
    }

    /// Set whether tool changes are removed
    pub fn with_remove_tool_changes(mut self, enabled: bool) -> Self {
        self.remove_tool_changes = enabled;
        self
    }

    /// Set whether the combined file is written
    pub fn with_combine(mut self, enabled: bool) -> Self {
        self.combine = enabled;
        self
    }

    /// Set whether a missing drill footer is tolerated
    pub fn with_allow_missing_footer(mut self, allowed: bool) -> Self {
        self.allow_missing_footer = allowed;
        self
    }

    /// Full path of the drill file
    pub fn drill_file_path(&self) -> PathBuf {
        self.output_dir.join(&self.drill_file_name)
    }

    /// Full path of the combined file
    pub fn combined_file_path(&self) -> PathBuf {
        self.output_dir.join(&self.combined_file_name)
    }
}
