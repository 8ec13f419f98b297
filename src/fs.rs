//! The file system as the release sees it, so tests can swap in something that isn't a disk.

use std::{
    io,
    path::{Path, PathBuf},
};

use miette::Diagnostic;
use thiserror::Error;
use tracing::trace;

/// Reads, writes, and lists the files of a project.
pub trait FileStore {
    /// Read the whole file at `path`.
    ///
    /// ## Errors
    /// [`Error::NotFound`] if there is no such file, [`Error::Read`] for anything else.
    fn read(&self, path: &Path) -> Result<String, Error>;

    /// Replace the contents of `path` with `contents`.
    ///
    /// ## Errors
    /// If the file can't be written.
    fn write(&self, path: &Path, contents: &str) -> Result<(), Error>;

    /// The names of the entries directly inside `directory`.
    ///
    /// ## Errors
    /// If the directory can't be read.
    fn list(&self, directory: &Path) -> Result<Vec<String>, Error>;
}

/// The real file system.
#[derive(Clone, Copy, Debug, Default)]
pub struct Disk;

impl FileStore for Disk {
    fn read(&self, path: &Path) -> Result<String, Error> {
        trace!("Reading {}", path.display());
        std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                Error::NotFound { path: path.into() }
            } else {
                Error::Read {
                    path: path.into(),
                    source,
                }
            }
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), Error> {
        trace!("Writing {} to {}", contents, path.display());
        std::fs::write(path, contents).map_err(|source| Error::Write {
            path: path.into(),
            source,
        })
    }

    fn list(&self, directory: &Path) -> Result<Vec<String>, Error> {
        let list_error = |source| Error::List {
            path: directory.into(),
            source,
        };
        std::fs::read_dir(directory)
            .map_err(list_error)?
            .map(|entry| {
                entry
                    .map(|entry| entry.file_name().to_string_lossy().into_owned())
                    .map_err(list_error)
            })
            .collect()
    }
}

#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    #[error("{path} does not exist")]
    #[diagnostic(code(fs::not_found))]
    NotFound { path: PathBuf },
    #[error("Error reading from {path}: {source}")]
    #[diagnostic(
        code(fs::read),
        help("Make sure you have permission to read this file.")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Error writing to {path}: {source}")]
    #[diagnostic(
        code(fs::write),
        help("Make sure you have permission to write to this file.")
    )]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Error listing the files in {path}: {source}")]
    #[diagnostic(
        code(fs::list),
        help("Make sure the project directory exists and that you have permission to read it.")
    )]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
