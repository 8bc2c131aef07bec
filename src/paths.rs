//! Config, state and data directory resolution.

use crate::migrate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Variable naming a config directory that is used as is.
pub const INSTILL_CONFIG_DIR_ENV: &str = "INSTILL_CONFIG_DIR";
const XDG_CONFIG_HOME_ENV: &str = "XDG_CONFIG_HOME";
const XDG_STATE_HOME_ENV: &str = "XDG_STATE_HOME";
const XDG_DATA_HOME_ENV: &str = "XDG_DATA_HOME";
const APP_DATA_ENV: &str = "AppData";
const LOCAL_APP_DATA_ENV: &str = "LocalAppData";

const APP_DIR: &str = "instill";
const WINDOWS_APP_DIR: &str = "Instill CLI";

/// Primary config document.
pub const CONFIG_FILE: &str = "config.yml";
/// Per-host settings, kept beside [`CONFIG_FILE`].
pub const HOSTS_FILE: &str = "hosts.yml";
/// Runtime state, kept in the state directory.
pub const STATE_FILE: &str = "state.yml";

/// Snapshot of every input the directory resolver consults.
///
/// Empty variables are stored as `None` so they behave exactly like unset ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub config_dir_override: Option<PathBuf>,
    pub xdg_config_home: Option<PathBuf>,
    pub xdg_state_home: Option<PathBuf>,
    pub xdg_data_home: Option<PathBuf>,
    pub app_data: Option<PathBuf>,
    pub local_app_data: Option<PathBuf>,
    /// User home directory; empty when the platform lookup fails.
    pub home: PathBuf,
    pub windows: bool,
}

impl Environment {
    /// Capture the current process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            config_dir_override: env_path(INSTILL_CONFIG_DIR_ENV),
            xdg_config_home: env_path(XDG_CONFIG_HOME_ENV),
            xdg_state_home: env_path(XDG_STATE_HOME_ENV),
            xdg_data_home: env_path(XDG_DATA_HOME_ENV),
            app_data: env_path(APP_DATA_ENV),
            local_app_data: env_path(LOCAL_APP_DATA_ENV),
            home: directories::BaseDirs::new()
                .map(|dirs| dirs.home_dir().to_path_buf())
                .unwrap_or_default(),
            windows: cfg!(windows),
        }
    }

    /// Environment rooted at `home` with no variables set.
    pub fn with_home<P: Into<PathBuf>>(home: P) -> Self {
        Self { home: home.into(), ..Self::default() }
    }

    /// Historical config directory, `<home>/.config/instill` on every platform.
    pub fn legacy_config_dir(&self) -> PathBuf {
        self.home.join(".config").join(APP_DIR)
    }

    fn windows_var(&self, value: Option<&PathBuf>) -> Option<PathBuf> {
        value.filter(|_| self.windows).cloned()
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name).filter(|value| !value.is_empty()).map(PathBuf::from)
}

/// Config directory with precedence:
/// 1. `INSTILL_CONFIG_DIR`, used as-is
/// 2. `XDG_CONFIG_HOME`/instill
/// 3. `AppData`/Instill CLI (windows only)
/// 4. `HOME`/.config/instill
pub fn config_dir(env: &Environment) -> PathBuf {
    if let Some(dir) = &env.config_dir_override {
        dir.clone()
    } else if let Some(base) = &env.xdg_config_home {
        base.join(APP_DIR)
    } else if let Some(base) = env.windows_var(env.app_data.as_ref()) {
        base.join(WINDOWS_APP_DIR)
    } else {
        env.legacy_config_dir()
    }
}

/// State directory with precedence:
/// 1. `XDG_STATE_HOME`/instill
/// 2. `LocalAppData`/Instill CLI (windows only)
/// 3. `HOME`/.local/instill/state
pub fn state_dir(env: &Environment) -> PathBuf {
    if let Some(base) = &env.xdg_state_home {
        base.join(APP_DIR)
    } else if let Some(base) = env.windows_var(env.local_app_data.as_ref()) {
        base.join(WINDOWS_APP_DIR)
    } else {
        env.home.join(".local").join(APP_DIR).join("state")
    }
}

/// Data directory with precedence:
/// 1. `XDG_DATA_HOME`/instill
/// 2. `LocalAppData`/Instill CLI (windows only)
/// 3. `HOME`/.local/share/instill
pub fn data_dir(env: &Environment) -> PathBuf {
    if let Some(base) = &env.xdg_data_home {
        base.join(APP_DIR)
    } else if let Some(base) = env.windows_var(env.local_app_data.as_ref()) {
        base.join(WINDOWS_APP_DIR)
    } else {
        env.home.join(".local").join("share").join(APP_DIR)
    }
}

/// The three directories, computed once per call from an [`Environment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPaths {
    pub config_dir: PathBuf,
    pub state_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl ResolvedPaths {
    /// Compute all paths. Touches nothing on disk.
    pub fn resolve(env: &Environment) -> Self {
        Self { config_dir: config_dir(env), state_dir: state_dir(env), data_dir: data_dir(env) }
    }

    /// Move legacy state and config out of `<home>/.config/instill` when the
    /// resolved directories do not exist yet.
    ///
    /// Best effort: failures are logged and dropped. The state file moves first
    /// so it is not carried along with the config directory.
    pub fn migrate_if_needed(&self, env: &Environment) {
        if !is_dir(&self.state_dir) {
            match migrate::auto_migrate_state_dir(env, &self.state_dir) {
                Ok(()) => debug!("Migrated state file into {}", self.state_dir.display()),
                Err(e) => debug!("State migration skipped: {e}"),
            }
        }

        if !is_dir(&self.config_dir) && env.config_dir_override.is_none() {
            match migrate::auto_migrate_config_dir(env, &self.config_dir) {
                Ok(()) => debug!("Migrated config directory into {}", self.config_dir.display()),
                Err(e) => debug!("Config migration skipped: {e}"),
            }
        }
    }

    pub fn config_files(&self) -> ConfigFiles {
        ConfigFiles::in_dir(&self.config_dir)
    }

    pub fn state_file(&self) -> PathBuf {
        self.state_dir.join(STATE_FILE)
    }
}

/// Locations of the primary config document and its hosts sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFiles {
    pub config: PathBuf,
    pub hosts: PathBuf,
}

impl ConfigFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self { config: dir.join(CONFIG_FILE), hosts: dir.join(HOSTS_FILE) }
    }

    /// `config` with the hosts file as its sibling.
    pub fn beside(config: &Path) -> Self {
        Self { config: config.to_path_buf(), hosts: config.with_file_name(HOSTS_FILE) }
    }
}

pub(crate) fn is_dir(path: &Path) -> bool {
    path.metadata().is_ok_and(|meta| meta.is_dir())
}

pub(crate) fn is_file(path: &Path) -> bool {
    path.metadata().is_ok_and(|meta| !meta.is_dir())
}
