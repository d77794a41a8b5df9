//! Drill file splitter
//!
//! pcb2gcode writes every drill size into one file and separates them with
//! `(MSG, Change tool ...)` comments. Machines without a tool changer are
//! easier to run from one file per bit, so this splits the drill file into
//! header, one body per tool, and footer, then writes
//! `header + body[i] + footer` for each tool.
//!
//! Sections are delimited by an explicit state machine:
//!
//! ```text
//! HEADER --tool change--> BODY --tool change--> BODY (next tool)
//!    |                     |
//!    +----footer marker----+--footer marker--> FOOTER (final)
//! ```

use std::path::{Path, PathBuf};

use pcbpost_core::{
    read_lines, write_lines, GcodeLine, LineKind, PostProcessConfig, PostProcessError, Result,
    Stage, StageReport,
};
use tracing::{debug, info, warn};

/// Section currently being accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitState {
    /// Lines before the first tool change
    Header,
    /// Lines belonging to the current tool
    Body,
    /// Lines from the "All done" marker to end of file
    Footer,
}

/// Effect of a line on the section layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep appending to the current section
    Stay,
    /// Close the open body (if any) and start a new one
    OpenBody,
    /// Close the open body (if any) and start the footer
    EnterFooter,
}

impl SplitState {
    /// Transition table. Footer is terminal, Header is never re-entered.
    pub fn transition(self, kind: LineKind) -> (Transition, SplitState) {
        match (self, kind) {
            (Self::Footer, _) => (Transition::Stay, Self::Footer),
            (_, LineKind::ToolChangeMarker) => (Transition::OpenBody, Self::Body),
            (_, LineKind::FooterMarker) => (Transition::EnterFooter, Self::Footer),
            (state, _) => (Transition::Stay, state),
        }
    }
}

/// A drill file partitioned into its sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrillSections {
    /// Lines before the first tool change, header annotations rewritten
    pub header: Vec<GcodeLine>,
    /// One body per tool, in file order; each starts with its marker line
    pub bodies: Vec<Vec<GcodeLine>>,
    /// Footer marker line and everything after it
    pub footer: Vec<GcodeLine>,
    /// Whether a body was still open at end of input
    pub unterminated_body: bool,
}

impl DrillSections {
    /// Partition lines into header, bodies and footer
    pub fn parse<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = GcodeLine>,
    {
        let mut sections = DrillSections::default();
        let mut state = SplitState::Header;
        let mut body: Vec<GcodeLine> = Vec::new();

        for line in lines {
            let kind = line.kind();
            let (transition, next) = state.transition(kind);

            match transition {
                Transition::OpenBody => {
                    if state == SplitState::Body {
                        sections.bodies.push(std::mem::take(&mut body));
                    }
                }
                Transition::EnterFooter => {
                    if state == SplitState::Body {
                        sections.bodies.push(std::mem::take(&mut body));
                    }
                }
                Transition::Stay => {}
            }
            state = next;

            // Each output file uses a single bit, so the bit listing is replaced
            let line = match kind.rewrite() {
                Some(text) => line.with_text(text),
                None => line,
            };

            match state {
                SplitState::Header => sections.header.push(line),
                SplitState::Body => body.push(line),
                SplitState::Footer => sections.footer.push(line),
            }
        }

        if state == SplitState::Body {
            sections.bodies.push(body);
            sections.unterminated_body = true;
        }

        sections
    }

    /// Number of tool sections found
    pub fn tool_count(&self) -> usize {
        self.bodies.len()
    }

    /// Lines of the single-tool file for body `index` (0-based)
    pub fn tool_file_lines(&self, index: usize) -> Option<impl Iterator<Item = &GcodeLine>> {
        self.bodies.get(index).map(|body| {
            self.header
                .iter()
                .chain(body.iter())
                .chain(self.footer.iter())
        })
    }
}

/// Splits a multi-tool drill file into one file per tool
#[derive(Debug, Clone, Default)]
pub struct DrillSplitter {
    allow_missing_footer: bool,
}

impl DrillSplitter {
    /// Create a splitter that rejects drill files without a footer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a splitter from a run configuration
    pub fn from_config(config: &PostProcessConfig) -> Self {
        Self {
            allow_missing_footer: config.allow_missing_footer,
        }
    }

    /// Accept drill files whose last tool section is not followed by a footer
    pub fn with_allow_missing_footer(mut self, allowed: bool) -> Self {
        self.allow_missing_footer = allowed;
        self
    }

    /// Name of the single-tool file for 1-based `tool_id`
    ///
    /// `drill.ngc` becomes `drill_1.ngc`, `drill_2.ngc`, ...
    pub fn tool_file_name(drill_path: &Path, tool_id: usize) -> String {
        let stem = drill_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "drill".to_string());
        match drill_path.extension() {
            Some(ext) => format!("{}_{}.{}", stem, tool_id, ext.to_string_lossy()),
            None => format!("{}_{}", stem, tool_id),
        }
    }

    /// Read and partition a drill file
    ///
    /// # Errors
    /// `MissingInput` or `Io` if the file cannot be read, `MalformedSection`
    /// if a tool section is never closed by the footer and missing footers
    /// are not allowed
    pub fn read_sections(&self, drill_path: &Path) -> Result<DrillSections> {
        let lines = read_lines(drill_path)?;
        let sections = DrillSections::parse(lines);

        if sections.unterminated_body {
            if !self.allow_missing_footer {
                return Err(PostProcessError::MalformedSection {
                    path: drill_path.to_path_buf(),
                    reason: format!(
                        "tool section {} has no \"All done\" footer",
                        sections.tool_count()
                    ),
                });
            }
            warn!(
                "Drill file {} has no footer, last tool section runs to end of file",
                drill_path.display()
            );
        }

        Ok(sections)
    }

    /// Split `drill_path` into per-tool files in `output_dir`
    ///
    /// Returns the created files in tool order. A missing drill file is a
    /// no-op. Failures are logged; use [`DrillSplitter::split_with_report`]
    /// to inspect them.
    pub fn split(&self, drill_path: &Path, output_dir: &Path) -> Vec<PathBuf> {
        self.split_with_report(drill_path, output_dir).written
    }

    /// Split `drill_path` into per-tool files, reporting every outcome
    pub fn split_with_report(&self, drill_path: &Path, output_dir: &Path) -> StageReport {
        let report = StageReport::new(Stage::SplitDrill);

        if !drill_path.is_file() {
            warn!("No drill file at {}", drill_path.display());
            let mut report = report.with_note("no drill file");
            report.skipped.push(drill_path.to_path_buf());
            return report;
        }

        info!("Splitting drill file {} by tool size", drill_path.display());
        let mut report = report;

        let sections = match self.read_sections(drill_path) {
            Ok(sections) => sections,
            Err(e) => {
                report.record_failure(&e);
                return report;
            }
        };
        report.processed.push(drill_path.to_path_buf());

        if sections.tool_count() == 0 {
            info!("No tool changes in {}, nothing to split", drill_path.display());
            return report.with_note("no tool changes");
        }
        debug!(
            "Drill file has {} header lines, {} tools, {} footer lines",
            sections.header.len(),
            sections.tool_count(),
            sections.footer.len()
        );

        for (index, body) in sections.bodies.iter().enumerate() {
            let tool_id = index + 1;
            let file_path = output_dir.join(Self::tool_file_name(drill_path, tool_id));
            let tool = body.first().map(|l| l.text()).unwrap_or_default();
            info!(
                "Creating single tool drill file {} for {}",
                file_path.display(),
                tool
            );

            let lines = sections.tool_file_lines(index).into_iter().flatten();
            match write_lines(&file_path, lines) {
                Ok(()) => report.written.push(file_path),
                Err(e) => report.record_failure(&e),
            }
        }

        report
    }

    /// Split the drill file named by a run configuration
    pub fn run(&self, config: &PostProcessConfig) -> StageReport {
        self.split_with_report(&config.drill_file_path(), &config.output_dir)
    }
}
