use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Error that occurs when opening a file fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to open file `{path}`: {source}")]
pub struct FileOpenError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Error that occurs when atomically replacing a file fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to write file `{path}`: {source}")]
pub struct FileWriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Opens a file at the given path and wraps it in a [`BufReader`].
///
/// # Errors
///
/// Returns a [`FileOpenError`] if the file cannot be opened.
///
/// # Example
/// ```no_run
/// # use counter_rate::fsutil;
/// let reader = fsutil::open_file_reader("/some/file.txt")?;
/// # Ok::<(), fsutil::FileOpenError>(())
/// ```
pub fn open_file_reader(path: impl AsRef<Path>) -> Result<BufReader<File>, FileOpenError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FileOpenError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Replaces the file at `path` with whatever `write` produces.
///
/// The content is written to a temporary file in the same directory, synced,
/// and renamed over `path`, so a concurrent reader sees either the old or the
/// new content. Missing parent directories are created.
///
/// # Errors
///
/// Returns a [`FileWriteError`] if any step fails; the temporary file is
/// removed in that case.
pub fn write_atomic<F>(path: impl AsRef<Path>, write: F) -> Result<(), FileWriteError>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let path = path.as_ref();
    let wrap = |source| FileWriteError {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(wrap)?;

    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(wrap)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        write(&mut writer).map_err(wrap)?;
        writer.flush().map_err(wrap)?;
    }
    tmp.as_file().sync_all().map_err(wrap)?;
    tmp.persist(path).map_err(|err| wrap(err.error))?;

    Ok(())
}
