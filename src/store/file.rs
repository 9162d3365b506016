use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::error::Category;

use crate::fsutil;
use crate::reading::{Identity, Reading};

use super::{Error, ReadingStore, Result};

/// Stores one reading as a JSON document on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store for the default slot of a check, see [`location()`](super::location()).
    pub fn new(base_dir: impl AsRef<Path>, program: impl AsRef<Path>, identity: &Identity) -> Self {
        Self::at(super::location(base_dir, program, identity))
    }

    /// Creates a store for an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn resolve<'a>(&'a self, location: Option<&'a Path>) -> &'a Path {
        location.unwrap_or(&self.path)
    }
}

impl ReadingStore for FileStore {
    /// Atomically replaces the stored reading.
    ///
    /// # Errors
    ///
    /// - [`Error::Encode`] if the reading holds a non-finite float or an integer
    ///   outside `i64::MIN..=u64::MAX`.
    /// - [`Error::Io`] if the file cannot be written.
    fn save(&self, reading: &Reading, location: Option<&Path>) -> Result<()> {
        let path = self.resolve(location);
        let mut encoded = serde_json::to_vec(reading).map_err(|source| Error::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        encoded.push(b'\n');

        fsutil::write_atomic(path, |w| w.write_all(&encoded)).map_err(|err| Error::Io {
            path: err.path,
            source: err.source,
        })?;
        log::debug!(
            "Saved reading @{} with {} values to `{}`",
            reading.timestamp(),
            reading.values().len(),
            path.display()
        );
        Ok(())
    }

    /// Loads the stored reading.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if nothing was ever saved at the location.
    /// - [`Error::Io`] if the file exists but cannot be read.
    /// - [`Error::Corrupt`] if the content is not a valid reading.
    fn load(&self, location: Option<&Path>) -> Result<Reading> {
        let path = self.resolve(location);
        let reader = fsutil::open_file_reader(path).map_err(|err| {
            if err.source.kind() == ErrorKind::NotFound {
                Error::NotFound { path: err.path }
            } else {
                Error::Io {
                    path: err.path,
                    source: err.source,
                }
            }
        })?;

        let reading: Reading = serde_json::from_reader(reader).map_err(|source| {
            if source.classify() == Category::Io {
                Error::Io {
                    path: path.to_path_buf(),
                    source: source.into(),
                }
            } else {
                Error::Corrupt {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        log::debug!(
            "Loaded reading @{} with {} values from `{}`",
            reading.timestamp(),
            reading.values().len(),
            path.display()
        );
        Ok(reading)
    }
}
