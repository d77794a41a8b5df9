//! Conversion jobs for the external pcb2gcode utility
//!
//! PCBPost does not launch the converter. It plans the jobs (which layers
//! have both an input file and converter settings) and hands each one to a
//! [`ConversionRunner`]. Post-processing only ever looks at the files the
//! runner left in the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use pcbpost_core::{
    remove_files_with_extension, BoardLayer, LayerSource, PostProcessError, Stage, StageReport,
    DRILL_OUTPUT_FILE, GCODE_EXTENSION,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One invocation of the converter for one board layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionJob {
    /// Layer being converted
    pub layer: BoardLayer,
    /// Converter settings file
    pub config_file: PathBuf,
    /// Gerber or Excellon input
    pub input_file: PathBuf,
    /// Directory the converter writes into
    pub output_dir: PathBuf,
}

impl ConversionJob {
    /// Command-line arguments for the converter
    ///
    /// The drill output name is fixed so the splitter can find it.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--output-dir".to_string(),
            self.output_dir.to_string_lossy().to_string(),
            "--config".to_string(),
            self.config_file.to_string_lossy().to_string(),
            self.layer.mode_flag().to_string(),
            self.input_file.to_string_lossy().to_string(),
        ];
        if self.layer.is_drill() {
            args.push("--drill-output".to_string());
            args.push(DRILL_OUTPUT_FILE.to_string());
        }
        args
    }
}

/// Result of running one job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Whether the converter reported success
    pub success: bool,
    /// Files the converter produced
    pub produced: Vec<PathBuf>,
    /// Converter diagnostics, if any
    pub message: Option<String>,
}

impl ConversionOutcome {
    /// A successful outcome
    pub fn succeeded(produced: Vec<PathBuf>) -> Self {
        Self {
            success: true,
            produced,
            message: None,
        }
    }

    /// A failed outcome
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            produced: Vec::new(),
            message: Some(message.into()),
        }
    }
}

/// Runs conversion jobs
///
/// Implementations decide how the converter is reached (a subprocess, a
/// remote service, a test fake). An `Err` means the runner itself could not
/// run the job; a converter that ran and failed returns `Ok` with
/// `success == false`.
pub trait ConversionRunner {
    fn run(&self, job: &ConversionJob) -> Result<ConversionOutcome>;
}

/// Plan one job per layer whose input and settings files both exist
///
/// Input file names are resolved against `project_dir`. Layers with no
/// input name, no settings file, or a missing file are skipped.
pub fn plan_jobs(sources: &[LayerSource], project_dir: &Path, output_dir: &Path) -> Vec<ConversionJob> {
    let mut jobs = Vec::new();
    for source in sources {
        if source.input_file.trim().is_empty() {
            debug!("{}: no input file configured", source.layer);
            continue;
        }
        let Some(config_file) = &source.config_file else {
            debug!("{}: no converter settings file configured", source.layer);
            continue;
        };
        let input_file = project_dir.join(&source.input_file);
        if !config_file.is_file() || !input_file.is_file() {
            debug!(
                "{}: skipped, {} or {} does not exist",
                source.layer,
                config_file.display(),
                input_file.display()
            );
            continue;
        }
        jobs.push(ConversionJob {
            layer: source.layer,
            config_file: config_file.clone(),
            input_file,
            output_dir: output_dir.to_path_buf(),
        });
    }
    jobs
}

/// Make `output_dir` ready for a fresh conversion
///
/// Creates the directory if needed, otherwise removes G-code left by an
/// earlier run so stale files are not post-processed.
pub fn prepare_output_dir(output_dir: &Path) -> pcbpost_core::Result<Vec<PathBuf>> {
    if !output_dir.is_dir() {
        fs::create_dir_all(output_dir).map_err(|e| PostProcessError::io(output_dir, e))?;
        info!("Created output folder {}", output_dir.display());
        return Ok(Vec::new());
    }
    let removed = remove_files_with_extension(output_dir, GCODE_EXTENSION)?;
    if !removed.is_empty() {
        info!("Removed {} old G-code files", removed.len());
    }
    Ok(removed)
}

/// Remove the SVG previews the converter writes as a side effect
pub fn remove_byproducts(output_dir: &Path) -> pcbpost_core::Result<Vec<PathBuf>> {
    remove_files_with_extension(output_dir, "svg")
}

/// Run every job, recording failures without stopping
pub fn run_jobs(runner: &dyn ConversionRunner, jobs: &[ConversionJob]) -> StageReport {
    let mut report = StageReport::new(Stage::Conversion);
    if jobs.is_empty() {
        return report.with_note("no conversion jobs");
    }

    for job in jobs {
        info!("Running {} conversion of {}", job.layer, job.input_file.display());
        let outcome = match runner.run(job) {
            Ok(outcome) => outcome,
            Err(e) => ConversionOutcome::failed(format!("{:#}", e)),
        };

        if outcome.success {
            report.processed.push(job.input_file.clone());
            report.written.extend(outcome.produced);
        } else {
            let err = PostProcessError::Conversion {
                layer: job.layer.to_string(),
                reason: outcome
                    .message
                    .unwrap_or_else(|| "converter reported failure".to_string()),
            };
            report.record_failure(&err);
        }
    }

    report
}
