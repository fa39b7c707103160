//! Path helpers.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`), falling back
/// to joining relative paths onto the current directory.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve `path` against `base` unless it is already absolute.
#[inline]
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Make a layer label usable as a single file-name component.
///
/// Path separators become `_` so the output stays inside its directory.
pub fn file_component(label: &str) -> String {
    label.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against() {
        let base = Path::new("/work/stencil");
        assert_eq!(resolve_against(base, Path::new("out")), PathBuf::from("/work/stencil/out"));
        assert_eq!(resolve_against(base, Path::new("/tmp/out")), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_file_component() {
        assert_eq!(file_component("Top"), "Top");
        assert_eq!(file_component(r"a/b\c"), "a_b_c");
    }

    #[test]
    fn test_normalize_keeps_absolute() {
        let path = Path::new("/definitely/not/here");
        assert_eq!(normalize_path(path), path.to_path_buf());
    }
}
