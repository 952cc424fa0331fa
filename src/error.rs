//! Conversion pipeline errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating, invoking, or collecting output from the
/// external office converter.
///
/// Heading extraction has no error type: it degrades to fewer recognized
/// headings instead of failing.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// No office-suite executable at any known location.
    #[error("LibreOffice not found (searched: {})", display_paths(.searched))]
    ConverterNotFound { searched: Vec<PathBuf> },

    /// The library-style conversion call failed; no partial output is usable.
    #[error("conversion failed: {reason}")]
    ConversionFailed { reason: String },

    /// The converter binary could not be started at all.
    #[error("failed to launch {}: {source}", .program.display())]
    SubprocessLaunch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converter ran and exited unsuccessfully.
    #[error("converter exited with {}: {stderr}", status_text(.status))]
    SubprocessError { status: Option<i32>, stderr: String },

    /// The converter exited cleanly but left no qualifying output file.
    #[error("converter produced no .{extension} file in {} (listing: {listing:?})", .dir.display())]
    OutputNotProduced {
        dir: PathBuf,
        extension: String,
        listing: Vec<String>,
    },

    /// The converter did not finish in time and was killed.
    #[error("converter timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Scratch workspace I/O failed.
    #[error("workspace I/O error at {}: {source}", .path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    pub(crate) fn workspace(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Workspace {
            path: path.into(),
            source,
        }
    }

    /// Wrap any pipeline error as the failure of a library-style call.
    pub(crate) fn into_conversion_failed(self) -> Self {
        match self {
            Self::ConversionFailed { .. } | Self::ConverterNotFound { .. } => self,
            other => Self::ConversionFailed {
                reason: other.to_string(),
            },
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[allow(clippy::ref_option)]
fn status_text(status: &Option<i32>) -> String {
    status.map_or_else(|| "signal".to_string(), |code| format!("status {code}"))
}
