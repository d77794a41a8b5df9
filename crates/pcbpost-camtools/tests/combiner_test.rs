use std::fs;
use std::path::Path;

use pcbpost_camtools::combiner::Combiner;
use tempfile::TempDir;

fn lines_of(n: usize, prefix: &str) -> String {
    (0..n).map(|i| format!("{} {}\n", prefix, i)).collect()
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count()
}

#[test]
fn test_combined_line_count() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("back.ngc"), lines_of(5, "G01 X")).unwrap();
    fs::write(dir.path().join("drill.ngc"), lines_of(3, "G81 X")).unwrap();
    fs::write(dir.path().join("outline.ngc"), lines_of(7, "G01 Y")).unwrap();

    let combined = Combiner::new().combine(dir.path()).unwrap();

    assert_eq!(combined, dir.path().join("combined.ngc"));
    assert_eq!(line_count(&combined), 16);
}

#[test]
fn test_inputs_in_name_order_after_header() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.ngc"), "(b)\n").unwrap();
    fs::write(dir.path().join("a.ngc"), "(a)\n").unwrap();

    let combined = Combiner::new().combine(dir.path()).unwrap();

    assert_eq!(
        fs::read_to_string(combined).unwrap(),
        "( Combined G-code: 2 files )\n(a)\n(b)\n"
    );
}

#[test]
fn test_rerun_does_not_include_previous_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("front.ngc"), lines_of(4, "G01 X")).unwrap();

    let combiner = Combiner::new();
    let first = combiner.combine(dir.path()).unwrap();
    let first_text = fs::read_to_string(&first).unwrap();

    let report = combiner.combine_with_report(dir.path());
    assert_eq!(report.processed, vec![dir.path().join("front.ngc")]);
    assert_eq!(fs::read_to_string(&first).unwrap(), first_text);
    assert_eq!(line_count(&first), 5);
}

#[test]
fn test_unterminated_last_line_does_not_merge() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.ngc"), "G90\nM2").unwrap();
    fs::write(dir.path().join("b.ngc"), "G91\n").unwrap();

    let combined = Combiner::new().combine(dir.path()).unwrap();

    assert_eq!(
        fs::read_to_string(combined).unwrap(),
        "( Combined G-code: 2 files )\nG90\nM2\nG91\n"
    );
}

#[test]
fn test_nothing_to_combine() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("front.svg"), "<svg/>").unwrap();

    let report = Combiner::new().combine_with_report(dir.path());

    assert!(report.written.is_empty());
    assert_eq!(report.note.as_deref(), Some("no G-code files found"));
    assert!(!dir.path().join("combined.ngc").exists());
}

#[test]
fn test_missing_directory_reported() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gcode");

    let report = Combiner::new().combine_with_report(&missing);

    assert!(report.has_failures());
    assert!(Combiner::new().combine(&missing).is_none());
}
