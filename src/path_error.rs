//! Translation of "not a directory" filesystem errors into actionable messages.

use crate::error::ConfigError;
use std::io;
use std::path::{Path, PathBuf};

/// Classify an I/O error raised while operating on `path`.
///
/// `NotFound` becomes [`ConfigError::NotExist`]. A "not a directory" error is
/// translated into [`ConfigError::BlockedPath`] naming the regular file that
/// sits where a directory was expected. Anything else is handed to `fallback`.
pub fn translate(
    path: &Path,
    err: io::Error,
    fallback: impl FnOnce(PathBuf, io::Error) -> ConfigError,
) -> ConfigError {
    match err.kind() {
        io::ErrorKind::NotFound => ConfigError::NotExist { path: path.to_path_buf() },
        io::ErrorKind::NotADirectory => match find_regular_file(path) {
            Some(blocking) => ConfigError::BlockedPath { path: blocking, source: err },
            None => fallback(path.to_path_buf(), err),
        },
        _ => fallback(path.to_path_buf(), err),
    }
}

/// Walk upward from `path` until a component that is a regular file is found.
///
/// Stops at the filesystem root, at a relative path's first component, or
/// when taking the parent makes no progress.
pub fn find_regular_file(path: &Path) -> Option<PathBuf> {
    let mut current = path;
    loop {
        if current.metadata().is_ok_and(|meta| meta.is_file()) {
            return Some(current.to_path_buf());
        }

        let parent = current.parent()?;
        if parent == current || parent.as_os_str().is_empty() || parent.parent().is_none() {
            return None;
        }
        current = parent;
    }
}
