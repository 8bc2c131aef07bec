use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ConfigError`.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while resolving, reading, migrating or merging configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file or directory is honestly absent.
    #[error("{} does not exist", path.display())]
    NotExist { path: PathBuf },

    /// Migration source and destination are the same path.
    #[error("same path: {}", path.display())]
    SamePath { path: PathBuf },

    /// The document root is not a mapping.
    #[error("expected a top level map in {}", path.display())]
    SchemaViolation { path: PathBuf },

    /// A mapping holds the same key twice and cannot be serialized.
    #[error("mapping has duplicate key `{key}`")]
    DuplicateKey { key: String },

    /// The per-host flat map could not be decoded during legacy conversion.
    #[error("error decoding legacy format: {reason}")]
    LegacyDecode { reason: String },

    /// Renaming the file to its `.bak` sibling failed.
    #[error("failed to back up existing config {}: {source}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A regular file sits where a directory was expected.
    #[error("remove or rename regular file `{}` (must be a directory)", path.display())]
    BlockedPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),

    /// Moving a legacy directory or file failed after all checks passed.
    #[error("failed to move {} to {}: {source}", from.display(), to.display())]
    Migrate {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Converting a legacy config failed; wraps the underlying cause.
    #[error("error migrating legacy config: {0}")]
    LegacyMigration(#[source] Box<ConfigError>),

    /// Re-reading a freshly converted config failed.
    #[error("failed to reparse migrated config: {0}")]
    Reparse(#[source] Box<ConfigError>),
}

impl ConfigError {
    /// Whether this error signals an absent file rather than a failure.
    pub const fn is_not_exist(&self) -> bool {
        matches!(self, Self::NotExist { .. })
    }
}
