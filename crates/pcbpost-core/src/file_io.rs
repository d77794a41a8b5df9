//! File I/O helpers
//!
//! Reads and writes G-code files as sequences of [`GcodeLine`] so content
//! round-trips byte for byte, and enumerates files in an output directory
//! by extension.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{PostProcessError, Result};
use crate::gcode::GcodeLine;

/// Read a whole file into lines, line endings preserved
///
/// # Errors
/// `MissingInput` if the file does not exist, `Io` for any other failure
pub fn read_lines(path: &Path) -> Result<Vec<GcodeLine>> {
    if !path.is_file() {
        return Err(PostProcessError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| PostProcessError::io(path, e))?;
    Ok(GcodeLine::split(&content))
}

/// Write lines to a file, replacing any existing content
///
/// The writer is flushed before returning so a reported success means the
/// bytes reached the file.
pub fn write_lines<'a, I>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = &'a GcodeLine>,
{
    let file = File::create(path).map_err(|e| PostProcessError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer
            .write_all(line.as_str().as_bytes())
            .map_err(|e| PostProcessError::io(path, e))?;
    }
    writer.flush().map_err(|e| PostProcessError::io(path, e))?;
    Ok(())
}

/// List regular files in `dir` whose extension equals `extension`
///
/// The match is case-sensitive, so `front.NGC` is left alone, and the
/// result is sorted by file name so every stage sees the same order
/// regardless of the filesystem.
pub fn list_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| PostProcessError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PostProcessError::io(dir, e))?;
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == extension);
        if matches && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Delete every file in `dir` with the given extension
///
/// Returns the paths that were removed. A file that cannot be removed is
/// logged and skipped.
pub fn remove_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for path in list_files_with_extension(dir, extension)? {
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(e) => tracing::warn!("Error while deleting file {}: {}", path.display(), e),
        }
    }
    Ok(removed)
}
