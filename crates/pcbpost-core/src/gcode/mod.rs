//! G-code line handling
//!
//! This module provides:
//! - The `GcodeLine` type (one line of text, line ending included)
//! - Classification against the pcb2gcode drill file markers
//! - The tool-change and pause command matcher used by suppression

pub mod line;
pub mod markers;

pub use line::*;
pub use markers::*;
