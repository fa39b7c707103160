//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Interpret an option value the way Inkscape passes booleans.
///
/// Only a case-insensitive `true` is true; anything else is false.
pub fn parse_toggle(value: &str) -> Result<bool, String> {
    Ok(value.eq_ignore_ascii_case("true"))
}

/// Find the default config file.
///
/// Looks next to the input document first, then in the current directory.
///
/// # Example
/// ```text
/// ~/art/icons.svg     ← input
/// ~/art/stencil.toml  ← found!
/// ```
pub fn find_config_file(config_name: &Path, input: &Path) -> Option<PathBuf> {
    let beside_input = input.parent().map(|dir| dir.join(config_name));
    let in_cwd = std::env::current_dir().ok().map(|cwd| cwd.join(config_name));

    beside_input
        .into_iter()
        .chain(in_cwd)
        .find(|candidate| candidate.is_file())
}
