//! # PCBPost Core
//!
//! Core types and helpers shared by the PCBPost stages:
//! - G-code line classification against the pcb2gcode text markers
//! - Line-preserving file reading and writing
//! - Error types and per-stage run reports
//! - The immutable run configuration and board layer descriptions

pub mod config;
pub mod error;
pub mod file_io;
pub mod gcode;
pub mod layer;
pub mod report;

pub use config::{PostProcessConfig, COMBINED_OUTPUT_FILE, DRILL_OUTPUT_FILE};
pub use error::{PostProcessError, Result};
pub use file_io::{list_files_with_extension, read_lines, remove_files_with_extension, write_lines};
pub use gcode::{
    is_tool_change_command, suppress_line, GcodeLine, LineKind,
    BIT_COUNT_REWRITE, BIT_SIZES_REWRITE, COMMENT_MARKER,
};
pub use layer::{BoardLayer, LayerSource};
pub use report::{FileFailure, PipelineReport, Stage, StageReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File extension shared by every G-code file the converter writes
pub const GCODE_EXTENSION: &str = "ngc";
