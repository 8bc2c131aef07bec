#![allow(dead_code)]

use instill_config::Environment;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Legacy per-host config.yml as written by old CLI releases.
pub const LEGACY_CONFIG: &str = "instill.tech:\n  - user: monalisa\n    oauth_token: gho_abc\n    git_protocol: https\n";

/// Test fixture rooted at a temporary home directory
pub struct TestFixture {
    /// Temporary directory that will be cleaned up on drop
    pub temp: TempDir,
    /// Fake `HOME`
    pub home: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with an empty home directory
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempdir()?;
        let home = temp_dir.path().join("home");
        fs::create_dir_all(&home)?;

        Ok(Self { temp: temp_dir, home })
    }

    /// Environment with only the home directory set
    pub fn env(&self) -> Environment {
        Environment::with_home(&self.home)
    }

    /// Historical `<home>/.config/instill` directory
    pub fn legacy_dir(&self) -> PathBuf {
        self.home.join(".config").join("instill")
    }

    /// Path inside the temporary directory but outside home
    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    /// Create a file under the legacy directory
    pub fn with_legacy_file(&self, name: &str, content: &str) -> std::io::Result<&Self> {
        write_file(&self.legacy_dir().join(name), content)?;
        Ok(self)
    }
}

/// Write `content` to `path`, creating parent directories
pub fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
