//! # PCBPost
//!
//! Post-processor for the G-code that pcb2gcode writes for a PCB project,
//! aimed at machines without an automatic tool changer:
//! - splits the multi-tool drill file into one file per drill bit
//! - comments out tool changes (M6) and pauses (M0)
//! - optionally concatenates everything into one file for review
//!
//! ## Architecture
//!
//! 1. **pcbpost-core** - line classification, file I/O, config and reports
//! 2. **pcbpost-camtools** - the drill splitter, suppressor, combiner and pipeline
//! 3. **pcbpost-settings** - project and tool settings persistence
//! 4. **pcbpost** - the command-line binary

pub mod cli;
pub mod commands;

pub use pcbpost_camtools::{Combiner, DrillSplitter, PostProcessor, ToolChangeSuppressor};
pub use pcbpost_core::{PipelineReport, PostProcessConfig, PostProcessError, Stage, StageReport};
pub use pcbpost_settings::{ProjectContext, ProjectSettings, ToolSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Logs go to stderr so report output on stdout stays parseable.
/// `RUST_LOG` overrides the default level, which is `debug` when
/// `verbose` is set and `info` otherwise.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .with_line_number(verbose)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
