#![allow(clippy::self_named_module_files)]

use crate::document::{Document, Node};
use crate::error::{ConfigError, Result};
use crate::merge::{self, HOSTS_KEY};
use crate::paths::{ConfigFiles, Environment, ResolvedPaths};
use std::path::Path;
use tracing::{debug, info};

pub mod io;
pub mod legacy;

use io::ConfigIo;

/// Configuration tree bound to the files it is written back to.
///
/// Per-host settings live under `hosts.<hostname>.<key>`; everything else is
/// a root-level key.
pub struct Config<'io> {
    io: &'io dyn ConfigIo,
    files: ConfigFiles,
    doc: Document,
}

impl std::fmt::Debug for Config<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config").field("files", &self.files).field("doc", &self.doc).finish()
    }
}

impl<'io> Config<'io> {
    pub fn new(io: &'io dyn ConfigIo, files: ConfigFiles, doc: Document) -> Self {
        Self { io, files, doc }
    }

    pub fn new_blank(io: &'io dyn ConfigIo, files: ConfigFiles) -> Self {
        Self::new(io, files, Document::blank())
    }

    /// The primary config file.
    pub fn path(&self) -> &Path {
        &self.files.config
    }

    pub const fn files(&self) -> &ConfigFiles {
        &self.files
    }

    pub const fn document(&self) -> &Document {
        &self.doc
    }

    /// Value of `key` for `host`, falling back to the root-level key.
    ///
    /// An empty `host` reads only the root level.
    pub fn get(&self, host: &str, key: &str) -> Option<String> {
        let root = self.doc.root();
        let host_value = (!host.is_empty())
            .then(|| root.get(HOSTS_KEY))
            .flatten()
            .and_then(Node::as_mapping)
            .and_then(|hosts| hosts.get(host))
            .and_then(Node::as_mapping)
            .and_then(|entry| entry.get(key));

        host_value.or_else(|| root.get(key)).and_then(Node::text).map(|text| text.into_owned())
    }

    /// Set `key` to `value` for `host`, or at the root level when `host` is empty.
    pub fn set(&mut self, host: &str, key: &str, value: &str) {
        let root = self.doc.root_mut();
        if host.is_empty() {
            root.insert(key, Node::string(value));
        } else {
            root.mapping_entry(HOSTS_KEY).mapping_entry(host).insert(key, Node::string(value));
        }
    }

    /// Hostnames under `hosts`, in document order.
    pub fn hosts(&self) -> Vec<String> {
        self.doc
            .root()
            .get(HOSTS_KEY)
            .and_then(Node::as_mapping)
            .map(|hosts| {
                hosts.iter().filter_map(|(k, _)| k.text()).map(|k| k.into_owned()).collect()
            })
            .unwrap_or_default()
    }

    /// Save the tree, the `hosts` subtree to the hosts file and the rest to
    /// the config file.
    ///
    /// The hosts file is only written when the tree has a `hosts` mapping, so
    /// a config without hosts never truncates an existing hosts file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or either write fails.
    pub fn write(&self) -> Result<()> {
        let (primary, hosts) = self.split_hosts();
        if let Some(hosts) = hosts {
            self.io.write(&self.files.hosts, &hosts.to_bytes()?)?;
            debug!("Wrote hosts to {}", self.files.hosts.display());
        }
        self.io.write(&self.files.config, &primary.to_bytes()?)?;
        debug!("Wrote config to {}", self.files.config.display());
        Ok(())
    }

    /// Serialize the whole tree, `hosts` included, to the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_combined(&self) -> Result<()> {
        self.io.write(&self.files.config, &self.doc.to_bytes()?)?;
        debug!("Wrote combined config to {}", self.files.config.display());
        Ok(())
    }

    fn split_hosts(&self) -> (Document, Option<Document>) {
        let mut root = self.doc.root().clone();
        let hosts = root.get(HOSTS_KEY).and_then(Node::as_mapping).cloned();
        if hosts.is_some() {
            root.take_all(HOSTS_KEY);
        }
        (Document::from_root(root), hosts.map(Document::from_root))
    }
}

fn read_document(io: &dyn ConfigIo, path: &Path) -> Result<Document> {
    let data = io.read(path)?;
    Document::parse(path, &data)
}

/// Load the config file, upgrading the legacy layout or merging `hosts.yml`.
///
/// A missing config file starts from a blank document. A legacy document is
/// backed up, rewritten and read again; otherwise a present hosts file is
/// spliced in under `hosts`.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed,
/// the legacy conversion fails, or a present hosts file is unreadable.
pub fn parse_config<'io>(io: &'io dyn ConfigIo, files: &ConfigFiles) -> Result<Config<'io>> {
    let mut doc = match read_document(io, &files.config) {
        Ok(doc) => doc,
        Err(e) if e.is_not_exist() => {
            debug!("No config at {}, starting blank", files.config.display());
            Document::blank()
        },
        Err(e) => return Err(e),
    };

    if legacy::is_legacy(&doc) {
        info!("Migrating legacy config {}", files.config.display());
        legacy::migrate_config(io, &files.config)
            .map_err(|e| ConfigError::LegacyMigration(Box::new(e)))?;
        doc = read_document(io, &files.config).map_err(|e| ConfigError::Reparse(Box::new(e)))?;
    } else {
        match read_document(io, &files.hosts) {
            Ok(hosts) => {
                if merge::merge_hosts(&mut doc, hosts) {
                    debug!("Merged hosts from {}", files.hosts.display());
                }
            },
            Err(e) if e.is_not_exist() => debug!("No hosts file at {}", files.hosts.display()),
            Err(e) => return Err(e),
        }
    }

    Ok(Config::new(io, files.clone(), doc))
}

/// Resolve directories from `env`, run pending migrations, and load the config.
///
/// # Errors
///
/// See [`parse_config`].
pub fn parse_default_config<'io>(env: &Environment, io: &'io dyn ConfigIo) -> Result<Config<'io>> {
    let paths = ResolvedPaths::resolve(env);
    paths.migrate_if_needed(env);
    parse_config(io, &paths.config_files())
}
