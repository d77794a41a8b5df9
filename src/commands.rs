//! Subcommand execution
//!
//! Every command returns a [`CommandOutput`]. Per-file failures end up in the
//! report; only bad arguments or unreadable settings come back as `Err`.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pcbpost_camtools::{
    plan_jobs, Combiner, ConversionJob, DrillSplitter, PostProcessor, ToolChangeSuppressor,
};
use pcbpost_core::{PipelineReport, PostProcessConfig};
use pcbpost_settings::{ProjectContext, ProjectSettings, ToolSettings};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{Command, DirArgs, ProjectArgs, RunArgs, SplitArgs};

/// Converter name used when the tool settings do not name an executable
pub const DEFAULT_CONVERTER: &str = "pcb2gcode";

/// Converter command lines for a project
#[derive(Debug, Clone, Serialize)]
pub struct ConversionPlan {
    pub executable: PathBuf,
    pub jobs: Vec<ConversionJob>,
}

impl fmt::Display for ConversionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.jobs.is_empty() {
            return writeln!(f, "no conversion jobs");
        }
        for job in &self.jobs {
            writeln!(
                f,
                "{}: {} {}",
                job.layer,
                self.executable.display(),
                job.args().join(" ")
            )?;
        }
        Ok(())
    }
}

/// What a command produced
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    Report(PipelineReport),
    Plan(ConversionPlan),
}

impl CommandOutput {
    /// Render as text or pretty JSON
    pub fn render(&self, json: bool) -> Result<String> {
        if json {
            return serde_json::to_string_pretty(self).context("Failed to serialize output");
        }
        Ok(match self {
            Self::Report(report) => report.to_string(),
            Self::Plan(plan) => plan.to_string(),
        })
    }
}

/// Run a parsed subcommand
pub fn execute(command: &Command) -> Result<CommandOutput> {
    match command {
        Command::Run(args) => run(args),
        Command::Project(args) => project(args),
        Command::Split(args) => Ok(split(args)),
        Command::Suppress(args) => Ok(suppress(args)),
        Command::Combine(args) => Ok(combine(args)),
    }
}

fn run(args: &RunArgs) -> Result<CommandOutput> {
    if !args.output_dir.is_dir() {
        anyhow::bail!("Output directory {} does not exist", args.output_dir.display());
    }
    let config = PostProcessConfig::new(&args.output_dir)
        .with_remove_tool_changes(!args.stages.keep_tool_changes)
        .with_combine(args.stages.combine)
        .with_allow_missing_footer(args.stages.allow_missing_footer);
    Ok(CommandOutput::Report(PostProcessor::new(config).run()))
}

fn load_tool_settings(path: Option<&Path>) -> Result<ToolSettings> {
    match path {
        Some(path) => ToolSettings::load_from_file(path)
            .with_context(|| format!("Failed to load tool settings from {}", path.display())),
        None => ToolSettings::load_or_default().context("Failed to load tool settings"),
    }
}

fn project(args: &ProjectArgs) -> Result<CommandOutput> {
    if !args.project_dir.is_dir() {
        anyhow::bail!("Project directory {} does not exist", args.project_dir.display());
    }
    let tool = load_tool_settings(args.settings.as_deref())?;
    let context = ProjectContext::load(&args.project_dir, tool);

    if !ProjectSettings::file_path(context.project_dir()).exists() {
        context
            .save()
            .context("Failed to write default project settings")?;
        info!(
            "Wrote default project settings to {}",
            ProjectSettings::file_path(context.project_dir()).display()
        );
    }

    if args.plan {
        let jobs = plan_jobs(
            &context.layer_sources(),
            context.project_dir(),
            &context.output_dir(),
        );
        let executable = context
            .tool()
            .executable_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONVERTER));
        return Ok(CommandOutput::Plan(ConversionPlan { executable, jobs }));
    }

    let config = context.post_process_config();
    debug!("Post-processing config: {:?}", config);
    Ok(CommandOutput::Report(PostProcessor::new(config).run()))
}

fn split(args: &SplitArgs) -> CommandOutput {
    let output_dir = args.output_dir.clone().unwrap_or_else(|| {
        args.drill_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let report = DrillSplitter::new()
        .with_allow_missing_footer(args.allow_missing_footer)
        .split_with_report(&args.drill_file, &output_dir);
    single_stage(report)
}

fn suppress(args: &DirArgs) -> CommandOutput {
    single_stage(ToolChangeSuppressor::new().suppress_with_report(&args.dir))
}

fn combine(args: &DirArgs) -> CommandOutput {
    single_stage(Combiner::new().combine_with_report(&args.dir))
}

fn single_stage(report: pcbpost_core::StageReport) -> CommandOutput {
    let mut pipeline = PipelineReport::new();
    pipeline.push(report);
    CommandOutput::Report(pipeline)
}
