//! Logging utilities with colored output, progress display and a run log.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for details shown with `--verbose` (always kept in the run log)
//! - `ProgressLine` for the single-line per-layer export counter
//! - an optional run log file that mirrors every line without colors
//!
//! # Example
//!
//! ```ignore
//! log!("export"; "{} layers", count);
//! debug!("layer"; "skip hidden: {}", label);
//!
//! let progress = ProgressLine::new("layers", 12);
//! progress.inc();
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    fs::File,
    io::{self, Write, stdout},
    path::Path,
    process::Stdio,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Active progress bar count (for log coordination)
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Run log sink, opened when `--use-logging` is enabled.
static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message.
///
/// Shown on the terminal only with `--verbose`, but always written to the
/// run log when one is open.
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() || $crate::logger::has_log_file() {
            $crate::logger::debug($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    write_terminal(module, message);
    write_file(module, message);
}

/// Debug counterpart of [`log`], see [`debug!`](crate::debug).
#[inline]
pub fn debug(module: &str, message: &str) {
    if is_verbose() {
        write_terminal(module, message);
    }
    write_file(module, message);
}

#[allow(clippy::cast_possible_truncation)] // Safe: bars count is always small
fn write_terminal(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();

    let bar_count = BAR_COUNT.load(Ordering::SeqCst);
    if bar_count > 0 {
        execute!(stdout, cursor::MoveToColumn(0)).ok();
        execute!(stdout, Clear(ClearType::CurrentLine)).ok();
    }

    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

fn write_file(module: &str, message: &str) {
    if let Some(file) = LOG_FILE.lock().as_mut() {
        writeln!(file, "[{module}] {message}").ok();
    }
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "export" => prefix.bright_blue().bold().to_string(),
        "done" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Run Log File
// ============================================================================

/// Open (truncating) the run log file. Subsequent log lines are mirrored there.
pub fn open_log_file(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    *LOG_FILE.lock() = Some(file);
    Ok(())
}

/// Close the run log file, flushing pending output.
pub fn close_log_file() {
    if let Some(mut file) = LOG_FILE.lock().take() {
        file.flush().ok();
    }
}

/// Whether a run log file is currently open.
pub fn has_log_file() -> bool {
    LOG_FILE.lock().is_some()
}

/// A `Stdio` handle appending to the run log, or `Stdio::null()` without one.
///
/// Used to route the exporter's stdout/stderr.
pub fn log_stdio() -> Stdio {
    let mut guard = LOG_FILE.lock();
    match guard.as_mut() {
        Some(file) => {
            file.flush().ok();
            file.try_clone().map_or_else(|_| Stdio::null(), Stdio::from)
        }
        None => Stdio::null(),
    }
}

// ============================================================================
// Progress Line (single-line counter)
// ============================================================================

/// Single-line progress display
///
/// Displays: `[export] layers(3/12)`
///
/// The counter updates in place. Log lines printed in between clear the
/// line first, and the counter is redrawn on the next `inc`.
pub struct ProgressLine {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
}

impl ProgressLine {
    /// Create a new progress display.
    pub fn new(name: &'static str, total: usize) -> Self {
        BAR_COUNT.store(1, Ordering::SeqCst);

        let progress = Self {
            name,
            total,
            current: AtomicUsize::new(0),
        };
        progress.display();
        progress
    }

    /// Increment the counter and redraw.
    #[inline]
    pub fn inc(&self) {
        self.current.fetch_add(1, Ordering::Relaxed);
        self.display();
    }

    fn line(&self) -> String {
        let current = self.current.load(Ordering::Relaxed);
        format!("{}({}/{})", self.name, current, self.total)
    }

    /// Display the current progress line (overwrites current line).
    fn display(&self) {
        let prefix = colorize_prefix("export", "export");

        let mut stdout = stdout().lock();
        // Clear line and write progress (no newline - stays on same line)
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        write!(stdout, "{} {}", prefix, self.line()).ok();
        stdout.flush().ok();
    }

    /// Finish progress display, preserve line and move to next line.
    pub fn finish(self) {
        BAR_COUNT.store(0, Ordering::SeqCst);

        let prefix = colorize_prefix("export", "export");
        let mut stdout = stdout().lock();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        writeln!(stdout, "{} {}", prefix, self.line()).ok();
        stdout.flush().ok();
        drop(stdout);

        std::mem::forget(self); // Prevent Drop from clearing
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        BAR_COUNT.store(0, Ordering::SeqCst);

        // Clear the line on drop (if not finished properly)
        let mut stdout = stdout().lock();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        stdout.flush().ok();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_line_text() {
        let progress = ProgressLine::new("layers", 3);
        progress.inc();
        assert_eq!(progress.line(), "layers(1/3)");
        progress.inc();
        assert_eq!(progress.line(), "layers(2/3)");
        progress.finish();
    }

    #[test]
    fn test_colorize_prefix_contains_module() {
        let prefix = colorize_prefix("layer", "layer");
        assert!(prefix.contains("[layer]"));
    }
}
