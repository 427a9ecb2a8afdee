//! Error handling for the lapp CLI.
//!
//! Library failures arrive as [`LappError`] and keep their miette diagnostic
//! codes; the CLI adds the few failures of its own (missing paths, watching).

use lapp_plugin::LappError;
use miette::Report;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Manifest, metadata, output or option errors from the post-processor
    #[error(transparent)]
    Lapp(#[from] LappError),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        CliError::Lapp(err.into())
    }
}

/// Convert a CLI error into a miette report for rendering
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Lapp(e) => Report::new(e),
        CliError::FileNotFound(path) => miette::miette!(
            help = "Pass --root or run lapp from the project directory",
            "File not found: {}",
            path.display()
        ),
        CliError::Watch(e) => miette::miette!(
            help = "Check that the file still exists and the watch limit is not exhausted",
            "File watcher error: {e}"
        ),
        _ => miette::miette!("{}", err),
    }
}
