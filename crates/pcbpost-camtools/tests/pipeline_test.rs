use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Result};
use pcbpost_camtools::converter::{
    plan_jobs, prepare_output_dir, remove_byproducts, ConversionJob, ConversionOutcome,
    ConversionRunner,
};
use pcbpost_camtools::pipeline::PostProcessor;
use pcbpost_core::{BoardLayer, LayerSource, PostProcessConfig, Stage};
use tempfile::TempDir;

const DRILL: &str = "\
( This file uses 2 drill bit sizes. )
(MSG, Change tool bit to drill size 0.8mm)
M0 (Temporary machine stop.)
G81 X1 Y1
(MSG, Change tool bit to drill size 1mm)
M0 (Temporary machine stop.)
G81 X2 Y2
G00 Z10.0000 ( All done -- retract )
M2
";

/// Writes canned G-code instead of running pcb2gcode
struct FakeRunner {
    calls: RefCell<Vec<BoardLayer>>,
}

impl FakeRunner {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ConversionRunner for FakeRunner {
    fn run(&self, job: &ConversionJob) -> Result<ConversionOutcome> {
        self.calls.borrow_mut().push(job.layer);
        let (name, content) = match job.layer {
            BoardLayer::Drilling => ("drill.ngc", DRILL.to_string()),
            BoardLayer::FrontCopper => ("front.ngc", "G90\nM6 T1\nG01 X1\n".to_string()),
            BoardLayer::Outline => bail!("converter crashed"),
            _ => return Ok(ConversionOutcome::failed("unsupported layer")),
        };
        let path = job.output_dir.join(name);
        fs::write(&path, content)?;
        fs::write(job.output_dir.join(format!("{}.svg", name)), "<svg/>")?;
        Ok(ConversionOutcome::succeeded(vec![path]))
    }
}

fn job(layer: BoardLayer, output_dir: &std::path::Path) -> ConversionJob {
    ConversionJob {
        layer,
        config_file: PathBuf::from("layer.cfg"),
        input_file: PathBuf::from("board.gbr"),
        output_dir: output_dir.to_path_buf(),
    }
}

#[test]
fn test_full_run_splits_then_suppresses() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("drill.ngc"), DRILL).unwrap();
    fs::write(dir.path().join("front.ngc"), "G90\nM6 T1\n").unwrap();

    let config = PostProcessConfig::new(dir.path()).with_combine(true);
    let report = PostProcessor::new(config).run();

    assert!(!report.has_failures());
    let stages: Vec<Stage> = report.stages.iter().map(|s| s.stage).collect();
    assert_eq!(
        stages,
        vec![Stage::Combine, Stage::SplitDrill, Stage::SuppressToolChanges]
    );

    // Combined before splitting, suppressed after
    let combined = fs::read_to_string(dir.path().join("combined.ngc")).unwrap();
    assert!(combined.starts_with("( Combined G-code: 2 files )\n"));
    assert!(combined.contains(";M6 T1\n"));

    let tool_2 = fs::read_to_string(dir.path().join("drill_2.ngc")).unwrap();
    assert_eq!(
        tool_2,
        "( This file uses 1 drill bit size. )\n\
         (MSG, Change tool bit to drill size 1mm)\n\
         ;M0 (Temporary machine stop.)\n\
         G81 X2 Y2\n\
         G00 Z10.0000 ( All done -- retract )\n\
         M2\n"
    );
}

#[test]
fn test_disabled_stages_are_noted() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("front.ngc"), "M6 T1\n").unwrap();

    let config = PostProcessConfig::new(dir.path()).with_remove_tool_changes(false);
    let report = PostProcessor::new(config).run();

    let suppress = report.stage(Stage::SuppressToolChanges).unwrap();
    assert_eq!(suppress.note.as_deref(), Some("disabled"));
    assert_eq!(report.stage(Stage::Combine).unwrap().note.as_deref(), Some("disabled"));
    assert_eq!(
        report.stage(Stage::SplitDrill).unwrap().note.as_deref(),
        Some("no drill file")
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("front.ngc")).unwrap(),
        "M6 T1\n"
    );
}

#[test]
fn test_converter_failures_do_not_stop_post_processing() {
    let dir = TempDir::new().unwrap();
    let runner = FakeRunner::new();
    let jobs = vec![
        job(BoardLayer::FrontCopper, dir.path()),
        job(BoardLayer::Outline, dir.path()),
        job(BoardLayer::BackEngraving, dir.path()),
        job(BoardLayer::Drilling, dir.path()),
    ];

    let config = PostProcessConfig::new(dir.path());
    let report = PostProcessor::new(config).run_with_converter(&runner, &jobs);

    assert_eq!(runner.calls.borrow().len(), 4);
    let conversion = report.stage(Stage::Conversion).unwrap();
    assert_eq!(conversion.failed.len(), 2);
    assert!(conversion.failed[0].error.contains("converter crashed"));
    assert!(conversion.failed[1].error.contains("unsupported layer"));
    assert_eq!(conversion.written.len(), 2);

    assert_eq!(report.stage(Stage::SplitDrill).unwrap().written.len(), 2);
    // drill.ngc, drill_1.ngc, drill_2.ngc, front.ngc
    assert_eq!(
        report.stage(Stage::SuppressToolChanges).unwrap().written.len(),
        4
    );

    let removed = remove_byproducts(dir.path()).unwrap();
    assert_eq!(removed.len(), 2);
}

#[test]
fn test_plan_jobs_skips_missing_inputs() {
    let project = TempDir::new().unwrap();
    let cfg = project.path().join("millproject");
    fs::write(&cfg, "metric=true\n").unwrap();
    fs::write(project.path().join("board-F_Cu.gbr"), "G04*").unwrap();
    fs::write(project.path().join("board.drl"), "M48").unwrap();
    let output = project.path().join("gcode");

    let sources = vec![
        LayerSource::new(BoardLayer::FrontCopper, Some(cfg.clone()), "board-F_Cu.gbr"),
        LayerSource::new(BoardLayer::BackCopper, Some(cfg.clone()), "board-B_Cu.gbr"),
        LayerSource::new(BoardLayer::Outline, None, "board-Edge_Cuts.gbr"),
        LayerSource::new(BoardLayer::FrontEngraving, Some(cfg.clone()), ""),
        LayerSource::new(BoardLayer::Drilling, Some(cfg.clone()), "board.drl"),
    ];

    let jobs = plan_jobs(&sources, project.path(), &output);

    let layers: Vec<BoardLayer> = jobs.iter().map(|j| j.layer).collect();
    assert_eq!(layers, vec![BoardLayer::FrontCopper, BoardLayer::Drilling]);
    assert_eq!(jobs[1].input_file, project.path().join("board.drl"));
    assert_eq!(jobs[1].output_dir, output);
}

#[test]
fn test_prepare_output_dir() {
    let project = TempDir::new().unwrap();
    let output = project.path().join("gcode");

    assert!(prepare_output_dir(&output).unwrap().is_empty());
    assert!(output.is_dir());

    fs::write(output.join("old.ngc"), "G90\n").unwrap();
    fs::write(output.join("keep.txt"), "notes").unwrap();
    let removed = prepare_output_dir(&output).unwrap();
    assert_eq!(removed, vec![output.join("old.ngc")]);
    assert!(output.join("keep.txt").exists());
}
