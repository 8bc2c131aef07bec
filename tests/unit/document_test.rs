use instill_config::document::{Document, LegacyHostsMap, Node};
use instill_config::ConfigError;
use pretty_assertions::assert_eq;
use std::path::Path;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PATH: &str = "/cfg/config.yml";

    #[test]
    fn test_blank_document_round_trip() {
        let blank = Document::parse(Path::new(PATH), b"").expect("empty bytes parse");
        assert_eq!(blank, Document::blank());

        let bytes = blank.to_bytes().expect("blank document serializes");
        let reparsed = Document::parse(Path::new(PATH), &bytes).expect("serialized blank parses");
        assert_eq!(reparsed, Document::blank());
    }

    #[test]
    fn test_nested_tree_round_trip() {
        let yaml = "editor: vim\nhosts:\n  instill.tech:\n    user: me\n    git_protocol: ssh\naliases:\n- co\n- pr\n";
        let doc = Document::parse(Path::new(PATH), yaml.as_bytes()).expect("valid YAML");
        let bytes = doc.to_bytes().expect("serializes");

        assert_eq!(Document::parse(Path::new(PATH), &bytes).expect("reparses"), doc);
    }

    #[test]
    fn test_scalar_root_rejected() {
        let err = Document::parse(Path::new(PATH), b"just a string\n").expect_err("scalar root");
        match err {
            ConfigError::SchemaViolation { path } => assert_eq!(path, Path::new(PATH)),
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_tagged_values_are_unwrapped() {
        let doc = Document::parse(Path::new(PATH), b"token: !secret abc\n").expect("valid YAML");
        assert_eq!(doc.root().get("token"), Some(&Node::from("abc")));
    }

    #[test]
    fn test_legacy_hosts_map_keeps_document_order() {
        let yaml = "b.example:\n  - user: b\na.example:\n  - user: a\n";
        let map = LegacyHostsMap::parse(Path::new(PATH), yaml.as_bytes()).expect("decodes");
        let names: Vec<_> = map.hosts.iter().map(|host| host.hostname.as_str()).collect();
        assert_eq!(names, vec!["b.example", "a.example"]);
    }

    #[test]
    fn test_legacy_hosts_map_non_string_values() {
        let yaml = "instill.tech:\n  - port: 443\n    insecure: false\n";
        let map = LegacyHostsMap::parse(Path::new(PATH), yaml.as_bytes()).expect("decodes");
        assert_eq!(
            map.hosts[0].entries,
            vec![
                ("port".to_string(), "443".to_string()),
                ("insecure".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_legacy_hosts_map_rejects_malformed_yaml() {
        let err = LegacyHostsMap::parse(Path::new(PATH), b"instill.tech: [").expect_err("bad YAML");
        assert!(matches!(err, ConfigError::LegacyDecode { .. }));
    }
}
