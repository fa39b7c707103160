//! External export binary.
//!
//! The pipeline only needs "turn this scratch document into that output
//! file"; [`Exporter`] is that seam. [`InkscapeExporter`] runs the real
//! binary, tests substitute a recording fake.

mod inkscape;

use std::{io, path::Path, time::Duration};
use thiserror::Error;

pub use inkscape::{DEFAULT_COMMAND, DEFAULT_TIMEOUT, InkscapeExporter};

/// Converts one scratch document into an output file.
pub trait Exporter {
    fn export(&mut self, source: &Path, destination: &Path) -> Result<(), ExportError>;
}

/// Exporter failures. All of them end the run.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("`{program}` was not found on the search path")]
    NotFound { program: String },

    #[error("Failed to spawn `{program}`: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("Failed to wait for `{program}`: {source}")]
    Wait { program: String, source: io::Error },

    #[error("`{program}` did not finish within {}s and was killed", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },
}
