//! File access behind a mockable seam.

use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

use crate::Result;
use ldif_core::Error;

/// Reads and writes whole text files.
#[cfg_attr(test, mockall::automock)]
pub trait TextStore {
    /// Reads the file at `path` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the file does not exist and [`Error::Io`] for any other
    /// failure.
    fn read_text(&self, path: &Path) -> Result<String>;

    /// Replaces the contents of the file at `path` with `text`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the parent directory does not exist and [`Error::Io`] for
    /// any other failure.
    fn write_text(&self, path: &Path, text: &str) -> Result<()>;
}

/// [`TextStore`] over the local filesystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsStore {
    create_dirs: bool,
}

impl FsStore {
    /// Creates a store that never creates directories.
    #[must_use]
    pub const fn new() -> Self {
        Self { create_dirs: false }
    }

    /// Creates missing parent directories before writing when enabled.
    #[must_use]
    pub const fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }
}

impl TextStore for FsStore {
    fn read_text(&self, path: &Path) -> Result<String> {
        let text = fs::read_to_string(path).map_err(|err| io_error(path, &err))?;
        debug!(path = %path.display(), bytes = text.len(), "read LDIF file");
        Ok(text)
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        if self.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|err| io_error(parent, &err))?;
            }
        }
        fs::write(path, text).map_err(|err| io_error(path, &err))?;
        debug!(path = %path.display(), bytes = text.len(), "wrote LDIF file");
        Ok(())
    }
}

fn io_error(path: &Path, err: &io::Error) -> Error {
    let path = path.display().to_string();
    if err.kind() == io::ErrorKind::NotFound {
        Error::NotFound(path)
    } else {
        Error::Io {
            path,
            message: err.to_string(),
        }
    }
}
