//! Ordered YAML document tree.
//!
//! Documents are parsed through `serde_yaml` and converted into [`Node`], an
//! explicit tagged tree whose mappings keep their entries in document order.
//! Serializing refuses a mapping that holds the same key twice rather than
//! folding the entries together. Two shapes are derived from the tree: the
//! current nested layout (see [`crate::config::Config`]) and the
//! flat per-host layout of [`LegacyHostsMap`].

use crate::error::{ConfigError, Result};
use serde_yaml::Value;
use std::borrow::Cow;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
}

impl Scalar {
    /// Textual form of the scalar; null renders as the empty string.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed(""),
            Self::Bool(b) => Cow::Owned(b.to_string()),
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::String(s) => Cow::Borrowed(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(Mapping),
}

impl Node {
    pub fn string<S: Into<String>>(value: S) -> Self {
        Self::Scalar(Scalar::String(value.into()))
    }

    /// Text of a scalar node, `None` for collections.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Scalar(scalar) => Some(scalar.text()),
            Self::Sequence(_) | Self::Mapping(_) => None,
        }
    }

    pub fn is_text(&self, expected: &str) -> bool {
        self.text().is_some_and(|text| text == expected)
    }

    pub const fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            Value::String(s) => Self::Scalar(Scalar::String(s)),
            Value::Sequence(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Mapping(map) => Self::Mapping(Mapping {
                entries: map.into_iter().map(|(k, v)| (Self::from(k), Self::from(v))).collect(),
            }),
            Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

impl TryFrom<&Node> for Value {
    type Error = ConfigError;

    fn try_from(node: &Node) -> Result<Self> {
        Ok(match node {
            Node::Scalar(Scalar::Null) => Self::Null,
            Node::Scalar(Scalar::Bool(b)) => Self::Bool(*b),
            Node::Scalar(Scalar::Number(n)) => Self::Number(n.clone()),
            Node::Scalar(Scalar::String(s)) => Self::String(s.clone()),
            Node::Sequence(items) => {
                Self::Sequence(items.iter().map(Self::try_from).collect::<Result<_>>()?)
            },
            Node::Mapping(mapping) => Self::Mapping(mapping.to_yaml()?),
        })
    }
}

/// Mapping node content: alternating key/value pairs kept in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(Node, Node)>,
}

impl Mapping {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Node, &Node)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Keys and values flattened in document order.
    pub fn content(&self) -> impl Iterator<Item = &Node> {
        self.entries.iter().flat_map(|(k, v)| [k, v])
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k.is_text(key)).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.iter_mut().find(|(k, _)| k.is_text(key)).map(|(_, v)| v)
    }

    /// Replace the first value under `key`, or append a new entry.
    pub fn insert(&mut self, key: &str, value: Node) {
        match self.get_mut(key) {
            Some(existing) => *existing = value,
            None => self.entries.push((Node::string(key), value)),
        }
    }

    pub fn push(&mut self, key: Node, value: Node) {
        self.entries.push((key, value));
    }

    /// Remove every entry under `key`, returning the removed values in order.
    pub fn take_all(&mut self, key: &str) -> Vec<Node> {
        let (taken, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.entries).into_iter().partition(|(k, _)| k.is_text(key));
        self.entries = kept;
        taken.into_iter().map(|(_, v)| v).collect()
    }

    /// Put `key: value` in front of all existing entries.
    pub fn prepend(&mut self, key: Node, value: Node) {
        self.entries.insert(0, (key, value));
    }

    /// Entry under `key` as a mapping, created (or replaced) when it is not one.
    pub fn mapping_entry(&mut self, key: &str) -> &mut Self {
        if !self.get(key).is_some_and(|node| node.as_mapping().is_some()) {
            self.insert(key, Node::Mapping(Self::new()));
        }
        match self.get_mut(key) {
            Some(Node::Mapping(mapping)) => mapping,
            _ => unreachable!("entry was just set to a mapping"),
        }
    }

    fn to_yaml(&self) -> Result<serde_yaml::Mapping> {
        let mut out = serde_yaml::Mapping::with_capacity(self.entries.len());
        for (k, v) in &self.entries {
            let key = Value::try_from(k)?;
            if out.contains_key(&key) {
                return Err(ConfigError::DuplicateKey {
                    key: k.text().unwrap_or_default().into_owned(),
                });
            }
            out.insert(key, Value::try_from(v)?);
        }
        Ok(out)
    }
}

/// A parsed document whose root content is a single mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Mapping,
}

impl Document {
    /// A document holding one empty mapping.
    pub const fn blank() -> Self {
        Self { root: Mapping::new() }
    }

    pub const fn from_root(root: Mapping) -> Self {
        Self { root }
    }

    /// Parse raw bytes read from `path`.
    ///
    /// Empty or comment-only input yields a blank document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML and
    /// [`ConfigError::SchemaViolation`] when the root is not a mapping.
    pub fn parse(path: &Path, data: &[u8]) -> Result<Self> {
        match parse_node(path, data)? {
            None => Ok(Self::blank()),
            Some(Node::Mapping(root)) => Ok(Self { root }),
            Some(_) => Err(ConfigError::SchemaViolation { path: path.to_path_buf() }),
        }
    }

    /// Serialize the document back to YAML bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateKey`] if a mapping holds the same key
    /// twice and [`ConfigError::Serialize`] if YAML emission fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_yaml::to_string(&Value::Mapping(self.root.to_yaml()?))
            .map(String::into_bytes)
            .map_err(ConfigError::Serialize)
    }

    pub const fn root(&self) -> &Mapping {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Mapping {
        &mut self.root
    }

    pub fn into_root(self) -> Mapping {
        self.root
    }
}

fn parse_node(path: &Path, data: &[u8]) -> Result<Option<Node>> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value = serde_yaml::from_slice(data)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    match Node::from(value) {
        Node::Scalar(Scalar::Null) => Ok(None),
        node => Ok(Some(node)),
    }
}

/// One hostname and its flat key/value settings from the legacy layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyHost {
    pub hostname: String,
    pub entries: Vec<(String, String)>,
}

/// The pre-migration per-host layout:
///
/// ```yaml
/// instill.tech:
///   - user: someone
///     oauth_token: abc
/// ```
///
/// Only the first list element of each host is read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyHostsMap {
    pub hosts: Vec<LegacyHost>,
}

impl LegacyHostsMap {
    /// Decode raw bytes as the legacy per-host layout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LegacyDecode`] when the bytes are not YAML, the
    /// root is not a mapping, or a host's value is not a list.
    pub fn parse(path: &Path, data: &[u8]) -> Result<Self> {
        let root = match parse_node(path, data) {
            Ok(None) => return Ok(Self::default()),
            Ok(Some(Node::Mapping(root))) => root,
            Ok(Some(_)) => {
                return Err(ConfigError::LegacyDecode {
                    reason: format!("{}: expected a map of hostnames", path.display()),
                })
            },
            Err(e) => return Err(ConfigError::LegacyDecode { reason: e.to_string() }),
        };
        Self::from_mapping(&root)
    }

    /// Read the legacy layout out of an already parsed mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LegacyDecode`] if a hostname is not a scalar or
    /// its value is not a list.
    pub fn from_mapping(root: &Mapping) -> Result<Self> {
        let mut hosts = Vec::with_capacity(root.len());
        for (key, value) in root.iter() {
            let hostname = key
                .text()
                .ok_or_else(|| ConfigError::LegacyDecode {
                    reason: "hostname must be a scalar".to_string(),
                })?
                .into_owned();

            let first = match value {
                Node::Sequence(items) => items.first(),
                Node::Scalar(Scalar::Null) => None,
                _ => {
                    return Err(ConfigError::LegacyDecode {
                        reason: format!("entries for {hostname} must be a list"),
                    })
                },
            };

            let entries = first
                .and_then(Node::as_mapping)
                .map(|fields| {
                    fields
                        .iter()
                        .map(|(k, v)| {
                            (
                                k.text().unwrap_or_default().into_owned(),
                                v.text().unwrap_or_default().into_owned(),
                            )
                        })
                        .collect()
                })
                .unwrap_or_default();

            hosts.push(LegacyHost { hostname, entries });
        }
        Ok(Self { hosts })
    }
}
