use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Post-process pcb2gcode output for single-tool machines
#[derive(Debug, Parser)]
#[command(name = "pcbpost", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print the run report as JSON
    #[arg(long, global = true, help = "Print the run report as JSON")]
    pub json: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run every post-processing stage on an output directory
    Run(RunArgs),
    /// Run a board project using its PCB2GCode.json and the tool settings
    Project(ProjectArgs),
    /// Split a multi-tool drill file into one file per tool
    Split(SplitArgs),
    /// Comment out tool changes and pauses in every G-code file
    Suppress(DirArgs),
    /// Concatenate every G-code file into combined.ngc
    Combine(DirArgs),
}

/// Stage switches shared by `run`
#[derive(Debug, Clone, Args)]
pub struct StageArgs {
    /// Leave M6 and M0 lines as they are
    #[arg(long, help = "Leave M6 and M0 lines as they are")]
    pub keep_tool_changes: bool,

    /// Write combined.ngc before splitting
    #[arg(long, help = "Write combined.ngc before splitting")]
    pub combine: bool,

    /// Accept a drill file whose last tool section has no footer
    #[arg(long, help = "Accept a drill file whose last tool section has no footer")]
    pub allow_missing_footer: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Directory holding the generated G-code
    #[arg(index = 1)]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub stages: StageArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    /// Board project directory
    #[arg(index = 1)]
    pub project_dir: PathBuf,

    /// Tool settings file (.json or .toml)
    #[arg(long, help = "Tool settings file (.json or .toml)")]
    pub settings: Option<PathBuf>,

    /// Print the planned converter command lines instead of post-processing
    #[arg(long, help = "Print the planned converter command lines")]
    pub plan: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SplitArgs {
    /// Multi-tool drill file
    #[arg(index = 1)]
    pub drill_file: PathBuf,

    /// Where to write drill_<n>.ngc (defaults to the drill file's directory)
    #[arg(long, help = "Where to write the per-tool files")]
    pub output_dir: Option<PathBuf>,

    /// Accept a drill file whose last tool section has no footer
    #[arg(long, help = "Accept a drill file whose last tool section has no footer")]
    pub allow_missing_footer: bool,
}

#[derive(Debug, Clone, Args)]
pub struct DirArgs {
    /// Directory holding the generated G-code
    #[arg(index = 1)]
    pub dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from(["pcbpost", "run", "gcode", "--combine", "--json"]);
        assert!(cli.json);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.output_dir, PathBuf::from("gcode"));
                assert!(args.stages.combine);
                assert!(!args.stages.keep_tool_changes);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_project() {
        let cli = Cli::parse_from([
            "pcbpost",
            "-v",
            "project",
            "boards/blinky",
            "--settings",
            "tool.toml",
            "--plan",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Command::Project(args) => {
                assert_eq!(args.settings, Some(PathBuf::from("tool.toml")));
                assert!(args.plan);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
