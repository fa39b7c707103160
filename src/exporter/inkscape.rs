//! Inkscape command-line exporter.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus},
    thread,
    time::{Duration, Instant},
};

use super::{ExportError, Exporter};
use crate::{debug, logger};

/// Command used when none is configured; destination and source are appended.
pub const DEFAULT_COMMAND: &[&str] = &[
    "inkscape",
    "--vacuum-defs",
    "--export-plain-svg",
    "--export-type=svg",
    "--export-area-drawing",
];

/// Longest a single export may run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs a command template once per layer.
#[derive(Debug, Clone)]
pub struct InkscapeExporter {
    command: Vec<String>,
    timeout: Duration,
    /// Program path, looked up on first export.
    resolved: Option<PathBuf>,
}

impl Default for InkscapeExporter {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND.iter().map(|s| s.to_string()).collect(), DEFAULT_TIMEOUT)
    }
}

impl InkscapeExporter {
    /// `command` is the program followed by its fixed arguments.
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self {
            command,
            timeout,
            resolved: None,
        }
    }

    pub fn program(&self) -> &str {
        self.command.first().map_or("", String::as_str)
    }

    /// Fixed arguments followed by the destination and source.
    pub fn args(&self, source: &Path, destination: &Path) -> Vec<OsString> {
        let mut export_filename = OsString::from("--export-filename=");
        export_filename.push(destination);

        self.command
            .iter()
            .skip(1)
            .map(OsString::from)
            .chain([export_filename, source.as_os_str().to_owned()])
            .collect()
    }

    fn resolve(&mut self) -> Result<PathBuf, ExportError> {
        if let Some(path) = &self.resolved {
            return Ok(path.clone());
        }
        let program = self.program();
        let path = which::which(program).map_err(|_| ExportError::NotFound {
            program: program.to_string(),
        })?;
        debug!("exporter"; "using {}", path.display());
        self.resolved = Some(path.clone());
        Ok(path)
    }

    /// Wait for `child` until the timeout, killing it once exceeded.
    fn wait(&self, child: &mut Child) -> Result<ExitStatus, ExportError> {
        let started = Instant::now();
        loop {
            let polled = child.try_wait().map_err(|source| ExportError::Wait {
                program: self.program().to_string(),
                source,
            })?;
            if let Some(status) = polled {
                return Ok(status);
            }

            if started.elapsed() >= self.timeout {
                child.kill().ok();
                child.wait().ok();
                return Err(ExportError::Timeout {
                    program: self.program().to_string(),
                    timeout: self.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Exporter for InkscapeExporter {
    fn export(&mut self, source: &Path, destination: &Path) -> Result<(), ExportError> {
        let program = self.resolve()?;
        let args = self.args(source, destination);
        debug!("exporter"; "{} {:?}", self.program(), args);

        let mut child = Command::new(&program)
            .args(&args)
            .stdout(logger::log_stdio())
            .stderr(logger::log_stdio())
            .spawn()
            .map_err(|source| ExportError::Spawn {
                program: self.program().to_string(),
                source,
            })?;

        let status = self.wait(&mut child)?;
        if !status.success() {
            debug!("exporter"; "`{}` exited with {}", self.program(), status);
        }
        Ok(())
    }
}
