//! Self-deleting scratch files.

use std::{
    fs::File,
    io,
    path::Path,
};

use tempfile::NamedTempFile;

/// A temporary `.svg` file removed from disk when dropped.
#[derive(Debug)]
pub struct ScratchFile {
    inner: NamedTempFile,
}

impl ScratchFile {
    /// Create an empty scratch file in the system temp directory.
    pub fn create() -> io::Result<Self> {
        let inner = tempfile::Builder::new()
            .prefix("stencil-")
            .suffix(".svg")
            .tempfile()?;
        Ok(Self { inner })
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// The open file handle, for writing the contents.
    pub fn file(&mut self) -> &mut File {
        self.inner.as_file_mut()
    }
}
