//! Marker patterns found in pcb2gcode output
//!
//! Drill files written by pcb2gcode carry comment lines announcing each tool
//! change, a closing "All done" retract, and two header annotations that list
//! the drill bits in use. These are matched textually, never parsed.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Replacement for the "This file uses N drill bit sizes" header line.
pub const BIT_COUNT_REWRITE: &str = "( This file uses 1 drill bit size. )\n";

/// Replacement for the "Bit sizes:" header line.
pub const BIT_SIZES_REWRITE: &str = "( Modified by post-processor )\n";

/// Character prepended to a suppressed command line.
pub const COMMENT_MARKER: char = ';';

/// Classification of a drill file line, in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    /// `(MSG, Change tool ...)` starts a new tool section
    ToolChangeMarker,
    /// `G00 Z... ( All done ...` starts the footer
    FooterMarker,
    /// `( This file uses N drill bit sizes ...`
    BitCountHeader,
    /// `( Bit sizes: ...`
    BitSizesHeader,
    /// Anything else
    Plain,
}

impl LineKind {
    /// Classify a line. The first matching pattern wins.
    pub fn classify(line: &str) -> Self {
        if tool_change_regex().is_match(line) {
            Self::ToolChangeMarker
        } else if footer_regex().is_match(line) {
            Self::FooterMarker
        } else if bit_count_regex().is_match(line) {
            Self::BitCountHeader
        } else if bit_sizes_regex().is_match(line) {
            Self::BitSizesHeader
        } else {
            Self::Plain
        }
    }

    /// Replacement text for header annotation kinds.
    pub fn rewrite(self) -> Option<&'static str> {
        match self {
            Self::BitCountHeader => Some(BIT_COUNT_REWRITE),
            Self::BitSizesHeader => Some(BIT_SIZES_REWRITE),
            _ => None,
        }
    }
}

impl std::fmt::Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToolChangeMarker => write!(f, "tool change marker"),
            Self::FooterMarker => write!(f, "footer marker"),
            Self::BitCountHeader => write!(f, "bit count header"),
            Self::BitSizesHeader => write!(f, "bit sizes header"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

fn tool_change_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\(MSG, Change tool").expect("invalid regex pattern"))
}

fn footer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^G00\sZ\d.+ \( All done").expect("invalid regex pattern"))
}

fn bit_count_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\( This file uses \d+ drill bit sizes").expect("invalid regex pattern")
    })
}

fn bit_sizes_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\( Bit sizes:").expect("invalid regex pattern"))
}

fn tool_command_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^M[06]\s").expect("invalid regex pattern"))
}

/// True if the line starts with an `M6` tool change or `M0` pause command.
///
/// Matching is anchored at column 0 and case-sensitive, so a line that has
/// already been commented out never matches again.
pub fn is_tool_change_command(line: &str) -> bool {
    tool_command_regex().is_match(line)
}

/// Comment out a tool change or pause line, or `None` if it is neither.
pub fn suppress_line(line: &str) -> Option<String> {
    if is_tool_change_command(line) {
        let mut out = String::with_capacity(line.len() + 1);
        out.push(COMMENT_MARKER);
        out.push_str(line);
        Some(out)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_markers() {
        assert_eq!(
            LineKind::classify("(MSG, Change tool bit to drill size 0.8mm)\n"),
            LineKind::ToolChangeMarker
        );
        assert_eq!(
            LineKind::classify("(msg, change TOOL bit to drill size 1mm)\n"),
            LineKind::ToolChangeMarker
        );
        assert_eq!(
            LineKind::classify("G00 Z10.0000 ( All done -- retract )\n"),
            LineKind::FooterMarker
        );
        assert_eq!(
            LineKind::classify("( This file uses 3 drill bit sizes. )\n"),
            LineKind::BitCountHeader
        );
        assert_eq!(
            LineKind::classify("( Bit sizes: [0.8mm] [1mm] [3mm] )\n"),
            LineKind::BitSizesHeader
        );
        assert_eq!(LineKind::classify("G81 X1.0 Y2.0\n"), LineKind::Plain);
    }

    #[test]
    fn test_markers_anchor_at_line_start() {
        assert_eq!(
            LineKind::classify(" (MSG, Change tool bit)\n"),
            LineKind::Plain
        );
        assert_eq!(
            LineKind::classify("G01 Z10.0 ( All done )\n"),
            LineKind::Plain
        );
        // Z needs a digit right after it
        assert_eq!(
            LineKind::classify("G00 Z-1.0 ( All done )\n"),
            LineKind::Plain
        );
    }

    #[test]
    fn test_bit_sizes_matches_anywhere() {
        assert_eq!(
            LineKind::classify("G04 P0 ( Bit sizes: [1mm] )\n"),
            LineKind::BitSizesHeader
        );
    }

    #[test]
    fn test_rewrite() {
        assert_eq!(
            LineKind::classify("( This file uses 12 drill bit sizes. )\n").rewrite(),
            Some(BIT_COUNT_REWRITE)
        );
        assert_eq!(
            LineKind::classify("( Bit sizes: [1mm] )").rewrite(),
            Some(BIT_SIZES_REWRITE)
        );
        assert_eq!(LineKind::classify("G90\n").rewrite(), None);
        assert_eq!(LineKind::ToolChangeMarker.rewrite(), None);
    }

    #[test]
    fn test_tool_change_command() {
        assert!(is_tool_change_command("M6 T3 (change to tool 3)\n"));
        assert!(is_tool_change_command("M0\t(pause)\n"));
        assert!(is_tool_change_command("M6\n"));
        assert!(!is_tool_change_command("M6"));
        assert!(!is_tool_change_command("M06 T1\n"));
        assert!(!is_tool_change_command("M3 S1000\n"));
        assert!(!is_tool_change_command("G00 M6 T1\n"));
        assert!(!is_tool_change_command("m6 T1\n"));
        assert!(!is_tool_change_command(";M6 T3\n"));
    }

    #[test]
    fn test_suppress_line() {
        assert_eq!(
            suppress_line("M6 T3 (change to tool 3)\n").as_deref(),
            Some(";M6 T3 (change to tool 3)\n")
        );
        assert_eq!(suppress_line("G01 X1\n"), None);
    }
}
