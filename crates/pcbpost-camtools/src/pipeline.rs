//! Post-processing pipeline
//!
//! Runs the stages in order against one output directory:
//!
//! 1. Combine (optional) - write the review file
//! 2. Split drill - one file per drill bit
//! 3. Suppress tool changes (optional) - comment out M6/M0
//!
//! Each stage finishes before the next starts and looks at whatever files
//! exist at that moment, so per-tool drill files written in step 2 are
//! picked up by step 3.

use pcbpost_core::{PipelineReport, PostProcessConfig, Stage, StageReport};
use tracing::info;

use crate::combiner::Combiner;
use crate::converter::{run_jobs, ConversionJob, ConversionRunner};
use crate::drill_splitter::DrillSplitter;
use crate::tool_change::ToolChangeSuppressor;

/// Runs the post-processing stages for one configuration
#[derive(Debug, Clone)]
pub struct PostProcessor {
    config: PostProcessConfig,
}

impl PostProcessor {
    /// Create a post-processor for a run configuration
    pub fn new(config: PostProcessConfig) -> Self {
        Self { config }
    }

    /// Run every enabled stage
    pub fn run(&self) -> PipelineReport {
        let mut report = PipelineReport::new();
        self.run_stages(&mut report);
        report
    }

    /// Run conversion jobs first, then every enabled stage
    ///
    /// A failed job is recorded and the remaining jobs and stages still run.
    pub fn run_with_converter(
        &self,
        runner: &dyn ConversionRunner,
        jobs: &[ConversionJob],
    ) -> PipelineReport {
        let mut report = PipelineReport::new();
        report.push(run_jobs(runner, jobs));
        self.run_stages(&mut report);
        report
    }

    fn run_stages(&self, report: &mut PipelineReport) {
        let config = &self.config;
        info!("Post-processing {}", config.output_dir.display());

        if config.combine {
            report.push(Combiner::from_config(config).run(config));
        } else {
            report.push(StageReport::new(Stage::Combine).with_note("disabled"));
        }

        report.push(DrillSplitter::from_config(config).run(config));

        if config.remove_tool_changes {
            report.push(ToolChangeSuppressor::from_config(config).run(config));
        } else {
            report.push(StageReport::new(Stage::SuppressToolChanges).with_note("disabled"));
        }

        info!(
            "Post-processing done: {} processed, {} skipped, {} failed",
            report.total_processed(),
            report.total_skipped(),
            report.total_failed()
        );
    }
}
