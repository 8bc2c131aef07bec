//! Moves configuration out of the historical `<home>/.config/instill` location.

use crate::error::{ConfigError, Result};
use crate::paths::{is_dir, is_file, Environment, STATE_FILE};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Move the historical config directory to `new_path` if it exists.
///
/// # Errors
///
/// Returns [`ConfigError::NotExist`] when there is no historical directory,
/// [`ConfigError::SamePath`] when it already is `new_path`, or
/// [`ConfigError::Migrate`] when the rename fails.
pub fn auto_migrate_config_dir(env: &Environment, new_path: &Path) -> Result<()> {
    let old_path = env.legacy_config_dir();
    if !is_dir(&old_path) {
        return Err(ConfigError::NotExist { path: old_path });
    }
    migrate_dir(&old_path, new_path)
}

/// Move `state.yml` from the historical config directory into `new_path`.
///
/// # Errors
///
/// Same conditions as [`auto_migrate_config_dir`], applied to the state file.
pub fn auto_migrate_state_dir(env: &Environment, new_path: &Path) -> Result<()> {
    let old_path = env.legacy_config_dir();
    if !is_dir(&old_path) {
        return Err(ConfigError::NotExist { path: old_path });
    }
    migrate_file(&old_path, new_path, STATE_FILE)
}

/// Rename the whole directory `old_path` to `new_path`.
///
/// # Errors
///
/// Returns an error if the paths are equal, `old_path` is not a directory, or
/// the rename fails.
pub fn migrate_dir(old_path: &Path, new_path: &Path) -> Result<()> {
    if old_path == new_path {
        return Err(ConfigError::SamePath { path: old_path.to_path_buf() });
    }
    if !is_dir(old_path) {
        return Err(ConfigError::NotExist { path: old_path.to_path_buf() });
    }

    ensure_parent(new_path);
    fs::rename(old_path, new_path).map_err(|source| ConfigError::Migrate {
        from: old_path.to_path_buf(),
        to: new_path.to_path_buf(),
        source,
    })?;
    info!("Moved {} to {}", old_path.display(), new_path.display());
    Ok(())
}

/// Move the single file `file` from directory `old_path` to directory `new_path`.
///
/// # Errors
///
/// Returns an error if the directories are equal, the source file is missing,
/// or the rename fails.
pub fn migrate_file(old_path: &Path, new_path: &Path, file: &str) -> Result<()> {
    if old_path == new_path {
        return Err(ConfigError::SamePath { path: old_path.to_path_buf() });
    }

    let old_file = old_path.join(file);
    let new_file = new_path.join(file);
    if !is_file(&old_file) {
        return Err(ConfigError::NotExist { path: old_file });
    }

    ensure_parent(&new_file);
    fs::rename(&old_file, &new_file).map_err(|source| ConfigError::Migrate {
        from: old_file.clone(),
        to: new_file.clone(),
        source,
    })?;
    info!("Moved {} to {}", old_file.display(), new_file.display());
    Ok(())
}

// The rename that follows reports any real failure.
fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            debug!("Could not create {}: {e}", parent.display());
        }
    }
}
