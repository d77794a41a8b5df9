//! Error types for the post-processing stages.
//!
//! Every variant that concerns a file carries the path, so a failure can be
//! reported against that file alone while sibling files keep processing.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while post-processing G-code output.
#[derive(Error, Debug)]
pub enum PostProcessError {
    /// An expected input file does not exist.
    #[error("Missing input file: {}", path.display())]
    MissingInput {
        /// Path that was expected to exist.
        path: PathBuf,
    },

    /// A directory holds no files with the expected extension.
    #[error("No .{extension} files found in {}", path.display())]
    EmptyDirectory {
        /// Directory that was scanned.
        path: PathBuf,
        /// Extension that was matched, without the leading dot.
        extension: String,
    },

    /// Reading or writing a single file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A drill file's sections could not be delimited.
    #[error("Malformed section in {}: {reason}", path.display())]
    MalformedSection {
        /// Drill file being split.
        path: PathBuf,
        /// What was wrong with the section layout.
        reason: String,
    },

    /// An external conversion job did not succeed.
    #[error("Conversion of {layer} failed: {reason}")]
    Conversion {
        /// Board layer the job was converting.
        layer: String,
        /// Failure description reported by the runner.
        reason: String,
    },
}

impl PostProcessError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Path of the file the error is scoped to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::MissingInput { path }
            | Self::EmptyDirectory { path, .. }
            | Self::Io { path, .. }
            | Self::MalformedSection { path, .. } => Some(path),
            Self::Conversion { .. } => None,
        }
    }
}

/// Result type alias for post-processing operations.
pub type Result<T> = std::result::Result<T, PostProcessError>;
