//! Error types for the lapp post-build step

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LappError>;

/// Errors that abort a lapp build
///
/// Manifest errors surface when the processor is constructed, before any
/// build work. Metadata and write errors surface on build completion.
#[derive(Error, Debug, Diagnostic)]
pub enum LappError {
    /// package.json could not be read
    #[error("Failed to read manifest {}: {source}", .path.display())]
    #[diagnostic(
        code(lapp::manifest::read_failed),
        help("Run the build from the directory containing package.json")
    )]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// package.json is not valid JSON
    #[error("Failed to parse manifest {}: {source}", .path.display())]
    #[diagnostic(code(lapp::manifest::parse_failed))]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required identity field is missing or has the wrong type
    #[error("Please make sure {field} is defined in package.json")]
    #[diagnostic(code(lapp::manifest::invalid_field))]
    InvalidManifestField {
        field: &'static str,
        #[help]
        expected: &'static str,
    },

    /// lapp-meta.json is missing or unreadable
    #[error("File {} doesn't exist, please make sure you've configured it right", .path.display())]
    #[diagnostic(
        code(lapp::meta::read_failed),
        help("Create lapp-meta.json next to package.json or set `metaFile` in lapp.config.json")
    )]
    MetaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// lapp-meta.json does not parse, even with comments stripped
    #[error("Failed to parse JSON in {}: {source}", .path.display())]
    #[diagnostic(
        code(lapp::meta::parse_failed),
        help("Comments are allowed, everything else must be valid JSON")
    )]
    MetaParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The strict copy could not be written into the build directory
    #[error("Failed to write {}: {source}", .path.display())]
    #[diagnostic(
        code(lapp::meta::write_failed),
        help("Check permissions of the build output directory")
    )]
    MetaWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The working directory could not be determined
    #[error("I/O error: {0}")]
    #[diagnostic(code(lapp::io))]
    Io(#[from] std::io::Error),

    /// Plugin options could not be assembled
    #[error("Invalid lapp configuration: {0}")]
    #[diagnostic(code(lapp::config::invalid))]
    Config(String),
}

impl LappError {
    pub fn invalid_field(field: &'static str, expected: &'static str) -> Self {
        Self::InvalidManifestField { field, expected }
    }

    pub fn meta_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MetaRead {
            path: path.into(),
            source,
        }
    }

    pub fn meta_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::MetaParse {
            path: path.into(),
            source,
        }
    }

    pub fn meta_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MetaWrite {
            path: path.into(),
            source,
        }
    }

    /// True for failures detected while loading the manifest
    pub fn is_manifest_error(&self) -> bool {
        matches!(
            self,
            Self::ManifestRead { .. }
                | Self::ManifestParse { .. }
                | Self::InvalidManifestField { .. }
        )
    }
}

impl From<figment::Error> for LappError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}
