//! Run reports
//!
//! Stages never fail as a whole. Each file is processed on its own and the
//! outcome is recorded here, so a run is best effort but fully observable.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::PostProcessError;

/// Pipeline stage identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// External converter jobs
    Conversion,
    /// Concatenation into the review file
    Combine,
    /// Per-tool drill file split
    SplitDrill,
    /// Commenting out M6/M0 lines
    SuppressToolChanges,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conversion => write!(f, "conversion"),
            Self::Combine => write!(f, "combine"),
            Self::SplitDrill => write!(f, "split drill"),
            Self::SuppressToolChanges => write!(f, "suppress tool changes"),
        }
    }
}

/// A file-scoped failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    /// File the failure is scoped to, when there is one
    pub path: Option<PathBuf>,
    /// Rendered error message
    pub error: String,
}

impl From<&PostProcessError> for FileFailure {
    fn from(err: &PostProcessError) -> Self {
        Self {
            path: err.path().map(|p| p.to_path_buf()),
            error: err.to_string(),
        }
    }
}

impl From<PostProcessError> for FileFailure {
    fn from(err: PostProcessError) -> Self {
        Self::from(&err)
    }
}

/// Outcome of one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    /// Which stage ran
    pub stage: Stage,
    /// Files read and handled without error
    pub processed: Vec<PathBuf>,
    /// Files written by the stage (new files or in-place rewrites)
    pub written: Vec<PathBuf>,
    /// Inputs that were looked for or considered but not acted on
    pub skipped: Vec<PathBuf>,
    /// Per-file failures
    pub failed: Vec<FileFailure>,
    /// Why the stage did nothing, if it was a no-op
    pub note: Option<String>,
}

impl StageReport {
    /// Create an empty report for a stage
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            processed: Vec::new(),
            written: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            note: None,
        }
    }

    /// Record a failure
    pub fn record_failure(&mut self, err: &PostProcessError) {
        tracing::error!("{} stage: {}", self.stage, err);
        self.failed.push(FileFailure::from(err));
    }

    /// Mark the stage as a no-op with a reason
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// True if any file failed
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// True if the stage did nothing at all
    pub fn is_noop(&self) -> bool {
        self.processed.is_empty() && self.written.is_empty() && self.failed.is_empty()
    }
}

/// Outcome of a whole pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Stage reports in run order
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage report
    pub fn push(&mut self, report: StageReport) {
        self.stages.push(report);
    }

    /// Look up the report of a stage
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|r| r.stage == stage)
    }

    /// Total files processed across stages
    pub fn total_processed(&self) -> usize {
        self.stages.iter().map(|r| r.processed.len()).sum()
    }

    /// Total files skipped across stages
    pub fn total_skipped(&self) -> usize {
        self.stages.iter().map(|r| r.skipped.len()).sum()
    }

    /// Total failures across stages
    pub fn total_failed(&self) -> usize {
        self.stages.iter().map(|r| r.failed.len()).sum()
    }

    /// True if any stage recorded a failure
    pub fn has_failures(&self) -> bool {
        self.stages.iter().any(StageReport::has_failures)
    }
}

impl std::fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for report in &self.stages {
            write!(
                f,
                "{}: {} processed, {} written, {} skipped, {} failed",
                report.stage,
                report.processed.len(),
                report.written.len(),
                report.skipped.len(),
                report.failed.len()
            )?;
            if let Some(note) = &report.note {
                write!(f, " ({})", note)?;
            }
            writeln!(f)?;
            for failure in &report.failed {
                writeln!(f, "  failed: {}", failure.error)?;
            }
        }
        Ok(())
    }
}
