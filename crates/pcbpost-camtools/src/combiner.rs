//! Combined review file
//!
//! Concatenates every generated G-code file into one so the whole job can be
//! loaded into a viewer at once. Inputs are taken in file-name order, and
//! the combined file itself is never one of them.

use std::path::{Path, PathBuf};

use pcbpost_core::{
    list_files_with_extension, read_lines, write_lines, GcodeLine, PostProcessConfig,
    PostProcessError, Stage, StageReport, COMBINED_OUTPUT_FILE, GCODE_EXTENSION,
};
use tracing::{info, warn};

/// Identifying first line of the combined file
pub fn combined_header(file_count: usize) -> String {
    format!("( Combined G-code: {} files )\n", file_count)
}

/// Concatenates G-code files into a single review file
#[derive(Debug, Clone)]
pub struct Combiner {
    extension: String,
    combined_file_name: String,
}

impl Default for Combiner {
    fn default() -> Self {
        Self::new()
    }
}

impl Combiner {
    /// Create a combiner writing `combined.ngc`
    pub fn new() -> Self {
        Self {
            extension: GCODE_EXTENSION.to_string(),
            combined_file_name: COMBINED_OUTPUT_FILE.to_string(),
        }
    }

    /// Create a combiner from a run configuration
    pub fn from_config(config: &PostProcessConfig) -> Self {
        Self {
            extension: config.extension.clone(),
            combined_file_name: config.combined_file_name.clone(),
        }
    }

    /// Path of the combined file inside `output_dir`
    pub fn combined_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.combined_file_name)
    }

    /// Combine every G-code file in `output_dir`
    ///
    /// Returns the combined file, or `None` if there was nothing to combine
    /// or it could not be written.
    pub fn combine(&self, output_dir: &Path) -> Option<PathBuf> {
        self.combine_with_report(output_dir).written.into_iter().next()
    }

    /// Combine every G-code file in `output_dir`, reporting every outcome
    pub fn combine_with_report(&self, output_dir: &Path) -> StageReport {
        self.combine_into(output_dir, self.combined_path(output_dir))
    }

    fn combine_into(&self, output_dir: &Path, combined_path: PathBuf) -> StageReport {
        let mut report = StageReport::new(Stage::Combine);

        let files = match list_files_with_extension(output_dir, &self.extension) {
            Ok(files) => files,
            Err(e) => {
                report.record_failure(&e);
                return report;
            }
        };

        // A combined file left by an earlier run must not feed back in
        let inputs: Vec<PathBuf> = files
            .into_iter()
            .filter(|path| path.file_name() != combined_path.file_name())
            .collect();

        if inputs.is_empty() {
            let err = PostProcessError::EmptyDirectory {
                path: output_dir.to_path_buf(),
                extension: self.extension.clone(),
            };
            warn!("{}", err);
            return report.with_note("no G-code files found");
        }

        let mut body: Vec<GcodeLine> = Vec::new();
        for path in inputs {
            match read_lines(&path) {
                Ok(mut lines) => {
                    // Keep the next file from running into an unterminated last line
                    if let Some(last) = lines.last_mut() {
                        if !last.has_line_ending() {
                            *last = GcodeLine::new(format!("{}\n", last.as_str()));
                        }
                    }
                    body.extend(lines);
                    report.processed.push(path);
                }
                Err(e) => report.record_failure(&e),
            }
        }

        if report.processed.is_empty() {
            return report.with_note("no readable G-code files");
        }

        let header = GcodeLine::new(combined_header(report.processed.len()));
        match write_lines(&combined_path, std::iter::once(&header).chain(body.iter())) {
            Ok(()) => {
                info!(
                    "Combined {} files into {}",
                    report.processed.len(),
                    combined_path.display()
                );
                report.written.push(combined_path);
            }
            Err(e) => report.record_failure(&e),
        }

        report
    }

    /// Combine the directory named by a run configuration
    pub fn run(&self, config: &PostProcessConfig) -> StageReport {
        self.combine_into(&config.output_dir, config.combined_file_path())
    }
}
