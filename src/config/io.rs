use crate::error::{ConfigError, Result};
use crate::path_error;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to a config file when it is backed up.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Raw document storage used by the config pipeline.
pub trait ConfigIo {
    /// Read every byte of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotExist`] when the file is absent and
    /// [`ConfigError::BlockedPath`] when a path component is a regular file.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Create parent directories, then create or truncate `path` and write `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories or the file cannot be written.
    fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Rename `path` to `path.bak`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Backup`] if the rename fails.
    fn backup(&self, path: &Path) -> Result<()>;
}

/// `path` with [`BACKUP_SUFFIX`] appended to its file name.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// [`ConfigIo`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsIo;

impl ConfigIo for FsIo {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| {
            path_error::translate(path, e, |path, source| ConfigError::Read { path, source })
        })
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dirs(parent).map_err(|e| {
                path_error::translate(parent, e, |path, source| ConfigError::Write { path, source })
            })?;
        }

        let mut file = open_truncated(path)
            .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })?;

        let written = file.write_all(data);
        let synced = file.sync_all();
        combine(written, synced)
            .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })
    }

    fn backup(&self, path: &Path) -> Result<()> {
        fs::rename(path, backup_path(path))
            .map_err(|source| ConfigError::Backup { path: path.to_path_buf(), source })
    }
}

#[cfg(unix)]
fn create_dirs(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o750).create(dir)
}

#[cfg(not(unix))]
fn create_dirs(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn open_truncated(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new().read(true).write(true).create(true).truncate(true).mode(0o600).open(path)
}

#[cfg(not(unix))]
fn open_truncated(path: &Path) -> io::Result<fs::File> {
    OpenOptions::new().read(true).write(true).create(true).truncate(true).open(path)
}

// Keeps both failures when writing and flushing to disk each fail.
fn combine(written: io::Result<()>, synced: io::Result<()>) -> io::Result<()> {
    match (written, synced) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Err(write_err), Err(sync_err)) => {
            Err(io::Error::new(write_err.kind(), format!("{write_err}; {sync_err}")))
        },
    }
}

/// In-memory [`ConfigIo`] for callers that must not touch the disk.
#[derive(Debug, Default)]
pub struct MemoryIo {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file.
    #[must_use]
    pub fn with_file<P: Into<PathBuf>, D: Into<Vec<u8>>>(self, path: P, data: D) -> Self {
        self.files.borrow_mut().insert(path.into(), data.into());
        self
    }

    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }
}

impl ConfigIo for MemoryIo {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.get(path).ok_or_else(|| ConfigError::NotExist { path: path.to_path_buf() })
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        self.files.borrow_mut().insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn backup(&self, path: &Path) -> Result<()> {
        let mut files = self.files.borrow_mut();
        let data = files.remove(path).ok_or_else(|| ConfigError::Backup {
            path: path.to_path_buf(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })?;
        files.insert(backup_path(path), data);
        Ok(())
    }
}
