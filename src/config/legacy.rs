use super::io::ConfigIo;
use super::Config;
use crate::document::{Document, LegacyHostsMap};
use crate::error::Result;
use crate::paths::ConfigFiles;
use std::path::Path;
use tracing::{debug, info};

/// Value that marks a document written in the legacy layout.
pub const LEGACY_MARKER: &str = "instill.tech";

/// Whether any node directly inside the root mapping reads `instill.tech`.
pub fn is_legacy(doc: &Document) -> bool {
    doc.root().content().any(|node| node.is_text(LEGACY_MARKER))
}

/// Rewrite a legacy config file in the current layout.
///
/// The file is re-read and decoded as a [`LegacyHostsMap`]; every host's flat
/// key/value pairs are applied to a blank [`Config`] with [`Config::set`]. The
/// original is renamed to `<file>.bak` before the new document, `hosts`
/// included, is written in its place.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded, the backup fails,
/// or the converted document cannot be written. Nothing is written when the
/// backup fails.
pub fn migrate_config(io: &dyn ConfigIo, path: &Path) -> Result<()> {
    let data = io.read(path)?;
    let legacy = LegacyHostsMap::parse(path, &data)?;

    let mut cfg = Config::new_blank(io, ConfigFiles::beside(path));
    for host in &legacy.hosts {
        if host.entries.is_empty() {
            debug!("Skipping legacy host {} with no entries", host.hostname);
            continue;
        }
        for (key, value) in &host.entries {
            cfg.set(&host.hostname, key, value);
        }
    }

    io.backup(path)?;
    info!("Backed up legacy config {}", path.display());

    cfg.write_combined()
}
