//! # PCBPost CAM Tools
//!
//! Post-processing stages for G-code written by pcb2gcode.
//!
//! ## Stages
//!
//! - **Drill Splitter**: One file per drill bit from a multi-tool drill file
//! - **Tool Change Suppressor**: Comment out `M6` and `M0` for manual bit changes
//! - **Combiner**: Concatenate all output into a single review file
//!
//! ## Supporting Infrastructure
//!
//! - **Converter**: Conversion job planning and the runner interface
//! - **Pipeline**: Runs the stages in order and aggregates a report

pub mod combiner;
pub mod converter;
pub mod drill_splitter;
pub mod pipeline;
pub mod tool_change;

// Re-export commonly used items
pub use combiner::{combined_header, Combiner};
pub use converter::{
    plan_jobs, prepare_output_dir, remove_byproducts, run_jobs, ConversionJob, ConversionOutcome,
    ConversionRunner,
};
pub use drill_splitter::{DrillSections, DrillSplitter, SplitState, Transition};
pub use pipeline::PostProcessor;
pub use tool_change::{suppress_tool_changes, ToolChangeSuppressor};
