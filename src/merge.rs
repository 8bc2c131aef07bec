use crate::document::{Document, Node};
use tracing::warn;

/// Key under which per-host settings live.
pub const HOSTS_KEY: &str = "hosts";

/// Fold a secondary hosts document into `primary` under the `hosts` key.
///
/// The `hosts` entry is placed in front of all existing root entries, holding
/// the hosts document's hostnames in their order. Hostnames from a `hosts`
/// mapping already in `primary` follow unless the hosts document also names
/// them, in which case the hosts document wins. An empty hosts document leaves
/// `primary` untouched.
///
/// Returns `true` when anything was merged.
pub fn merge_hosts(primary: &mut Document, hosts: Document) -> bool {
    if hosts.root().is_empty() {
        return false;
    }

    let root = primary.root_mut();
    let mut merged = hosts.into_root();
    let mut shadowed = 0;
    for existing in root.take_all(HOSTS_KEY) {
        let Node::Mapping(existing) = existing else {
            warn!("Ignoring non-mapping `{HOSTS_KEY}` in config");
            continue;
        };
        for (hostname, settings) in existing.iter() {
            let present = hostname.text().is_some_and(|name| merged.get(&name).is_some());
            if present {
                shadowed += 1;
            } else {
                merged.push(hostname.clone(), settings.clone());
            }
        }
    }
    if shadowed > 0 {
        warn!("Hosts file overrides {shadowed} host(s) also set in config");
    }

    root.prepend(Node::string(HOSTS_KEY), Node::Mapping(merged));
    true
}
