//! Tool change suppression
//!
//! When the operator changes bits by hand between files, the `M6` tool
//! change and `M0` pause commands only get in the way. This comments them
//! out in place, keeping the original command text readable after the `;`.

use std::path::Path;

use pcbpost_core::{
    list_files_with_extension, read_lines, suppress_line, write_lines, GcodeLine,
    PostProcessConfig, PostProcessError, Result, Stage, StageReport, GCODE_EXTENSION,
};
use tracing::{debug, info, warn};

/// Comment out tool change and pause lines
///
/// Returns the rewritten lines and the number of lines changed. Lines that
/// are not commands at column 0 come back unchanged.
pub fn suppress_tool_changes(lines: Vec<GcodeLine>) -> (Vec<GcodeLine>, usize) {
    let mut changed = 0;
    let lines = lines
        .into_iter()
        .map(|line| match suppress_line(line.as_str()) {
            Some(commented) => {
                changed += 1;
                GcodeLine::new(commented)
            }
            None => line,
        })
        .collect();
    (lines, changed)
}

/// Rewrites G-code files with tool changes commented out
#[derive(Debug, Clone)]
pub struct ToolChangeSuppressor {
    extension: String,
}

impl Default for ToolChangeSuppressor {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolChangeSuppressor {
    /// Create a suppressor for `.ngc` files
    pub fn new() -> Self {
        Self {
            extension: GCODE_EXTENSION.to_string(),
        }
    }

    /// Create a suppressor from a run configuration
    pub fn from_config(config: &PostProcessConfig) -> Self {
        Self {
            extension: config.extension.clone(),
        }
    }

    /// Suppress tool changes in one file
    ///
    /// The file is rewritten only if a line changed. Returns whether it was.
    pub fn suppress_file(&self, path: &Path) -> Result<bool> {
        let lines = read_lines(path)?;
        let (lines, changed) = suppress_tool_changes(lines);
        if changed == 0 {
            debug!("No tool changes in {}", path.display());
            return Ok(false);
        }

        write_lines(path, &lines)?;
        info!("Removed {} tool changes from {}", changed, path.display());
        Ok(true)
    }

    /// Suppress tool changes in every G-code file of `output_dir`
    ///
    /// Returns the number of files modified. A directory with no G-code
    /// files is a no-op.
    pub fn suppress(&self, output_dir: &Path) -> usize {
        self.suppress_with_report(output_dir).written.len()
    }

    /// Suppress tool changes in `output_dir`, reporting every outcome
    pub fn suppress_with_report(&self, output_dir: &Path) -> StageReport {
        let mut report = StageReport::new(Stage::SuppressToolChanges);
        info!("Removing all tool changes in {}", output_dir.display());

        let files = match list_files_with_extension(output_dir, &self.extension) {
            Ok(files) => files,
            Err(e) => {
                report.record_failure(&e);
                return report;
            }
        };

        if files.is_empty() {
            let err = PostProcessError::EmptyDirectory {
                path: output_dir.to_path_buf(),
                extension: self.extension.clone(),
            };
            warn!("{}", err);
            return report.with_note("no G-code files found");
        }

        for path in files {
            match self.suppress_file(&path) {
                Ok(true) => {
                    report.written.push(path.clone());
                    report.processed.push(path);
                }
                Ok(false) => report.processed.push(path),
                Err(e) => report.record_failure(&e),
            }
        }

        report
    }

    /// Suppress tool changes in the directory named by a run configuration
    pub fn run(&self, config: &PostProcessConfig) -> StageReport {
        self.suppress_with_report(&config.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppress_tool_changes() {
        let lines = GcodeLine::split("G90\nM6 T3 (change to tool 3)\nM0 (pause)\nM3 S1000\n");
        let (lines, changed) = suppress_tool_changes(lines);
        assert_eq!(changed, 2);
        assert_eq!(lines[0].as_str(), "G90\n");
        assert_eq!(lines[1].as_str(), ";M6 T3 (change to tool 3)\n");
        assert_eq!(lines[2].as_str(), ";M0 (pause)\n");
        assert_eq!(lines[3].as_str(), "M3 S1000\n");
    }

    #[test]
    fn test_suppress_is_idempotent() {
        let once = suppress_tool_changes(GcodeLine::split("M6 T1\nM0 \n")).0;
        let (twice, changed) = suppress_tool_changes(once.clone());
        assert_eq!(changed, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_indented_command_untouched() {
        let (lines, changed) = suppress_tool_changes(GcodeLine::split("  M6 T1\n"));
        assert_eq!(changed, 0);
        assert_eq!(lines[0].as_str(), "  M6 T1\n");
    }
}
