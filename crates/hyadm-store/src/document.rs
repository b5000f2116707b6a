//! In-memory tree for the server's YAML document.
//!
//! The tree keeps every mapping in source order and every scalar as text
//! plus a kind tag, so a document can be parsed, edited in one place and
//! written back without disturbing unrelated sections. Formatting and
//! comments are not retained; key order and content are.
//!
//! Integers outside the `i64`/`u64` range (for example
//! `18446744073709551616`) are rejected at parse time, so a document holding
//! one cannot be edited.

use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping as YamlMapping, Number, Value};

use crate::error::StoreError;

/// Implicit type of a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
}

/// A leaf value: its text and how it was typed in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    value: String,
    kind: ScalarKind,
}

impl Scalar {
    /// A string scalar. Emitted quoted when the text would otherwise read
    /// as another type.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: ScalarKind::Str,
        }
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    fn from_number(n: &Number) -> Self {
        let kind = if n.is_f64() {
            ScalarKind::Float
        } else {
            ScalarKind::Int
        };
        Self {
            value: n.to_string(),
            kind,
        }
    }

    fn to_value(&self) -> Value {
        match self.kind {
            ScalarKind::Null => Value::Null,
            ScalarKind::Bool => match self.value.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                other => Value::String(other.to_owned()),
            },
            ScalarKind::Int => {
                if let Ok(u) = self.value.parse::<u64>() {
                    Value::Number(u.into())
                } else if let Ok(i) = self.value.parse::<i64>() {
                    Value::Number(i.into())
                } else {
                    Value::String(self.value.clone())
                }
            }
            ScalarKind::Float => {
                let parsed = match self.value.as_str() {
                    ".nan" => Some(f64::NAN),
                    ".inf" => Some(f64::INFINITY),
                    "-.inf" => Some(f64::NEG_INFINITY),
                    other => other.parse::<f64>().ok(),
                };
                match parsed {
                    Some(f) => Value::Number(f.into()),
                    None => Value::String(self.value.clone()),
                }
            }
            ScalarKind::Str => Value::String(self.value.clone()),
        }
    }
}

/// One node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(Mapping),
    /// A node carrying an explicit custom tag such as `!include`.
    Tagged(String, Box<Node>),
}

impl Node {
    /// A string scalar node.
    #[inline]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::string(value))
    }

    #[inline]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    #[inline]
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    #[inline]
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Text of a scalar node; `None` for collections and tagged nodes.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().map(Scalar::value)
    }

    /// Short name of the node type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::Tagged(..) => "tagged value",
        }
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar {
                value: String::new(),
                kind: ScalarKind::Null,
            }),
            Value::Bool(b) => Self::Scalar(Scalar {
                value: b.to_string(),
                kind: ScalarKind::Bool,
            }),
            Value::Number(n) => Self::Scalar(Scalar::from_number(&n)),
            Value::String(s) => Self::string(s),
            Value::Sequence(seq) => Self::Sequence(seq.into_iter().map(Self::from_value).collect()),
            Value::Mapping(map) => Self::Mapping(Mapping::from_yaml(map)),
            Value::Tagged(tagged) => {
                let TaggedValue { tag, value } = *tagged;
                Self::Tagged(tag.to_string(), Box::new(Self::from_value(value)))
            }
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Scalar(s) => s.to_value(),
            Self::Sequence(seq) => Value::Sequence(seq.iter().map(Self::to_value).collect()),
            Self::Mapping(m) => Value::Mapping(m.to_yaml()),
            Self::Tagged(tag, inner) => Value::Tagged(Box::new(TaggedValue {
                tag: Tag::new(tag.clone()),
                value: inner.to_value(),
            })),
        }
    }
}

/// Ordered key/value pairs.
///
/// Lookups are linear in the mapping's breadth and match keys by their
/// scalar text. Non-scalar keys are kept but never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<(Node, Node)>,
}

impl Mapping {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.as_str() == Some(key))
    }

    /// Value stored under `key`, or `None` when absent.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.position(key).map(|i| &mut self.entries[i].1)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Append a pair. The caller guarantees `key` is not present yet.
    pub fn push(&mut self, key: impl Into<String>, value: Node) {
        self.entries.push((Node::string(key), value));
    }

    /// Value under `key`, appending an empty mapping first when absent.
    ///
    /// An existing value is returned as-is even when it is not a mapping.
    pub fn get_or_insert_mapping(&mut self, key: &str) -> &mut Node {
        let index = match self.position(key) {
            Some(i) => i,
            None => {
                self.push(key, Node::Mapping(Mapping::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    /// Delete the pair stored under `key`, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    /// Scalar keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Node, &Node)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    fn from_yaml(map: YamlMapping) -> Self {
        let entries = map
            .into_iter()
            .map(|(k, v)| (Node::from_value(k), Node::from_value(v)))
            .collect();
        Self { entries }
    }

    fn to_yaml(&self) -> YamlMapping {
        let mut map = YamlMapping::with_capacity(self.entries.len());
        for (k, v) in &self.entries {
            map.insert(k.to_value(), v.to_value());
        }
        map
    }
}

/// A whole document. The root is always a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Mapping,
}

impl Document {
    /// Parse YAML text.
    ///
    /// Fails with [`StoreError::Parse`] on syntax errors, duplicate keys or
    /// multi-document input, and with [`StoreError::MalformedDocument`]
    /// when the top level is not a mapping.
    pub fn parse(text: &str) -> Result<Self, StoreError> {
        let value: Value = serde_yaml::from_str(text).map_err(StoreError::Parse)?;
        match Node::from_value(value) {
            Node::Mapping(root) => Ok(Self { root }),
            other => Err(StoreError::malformed(format!(
                "top level must be a mapping, found {}",
                other.type_name()
            ))),
        }
    }

    pub fn from_root(root: Mapping) -> Self {
        Self { root }
    }

    #[inline]
    pub fn root(&self) -> &Mapping {
        &self.root
    }

    #[inline]
    pub fn root_mut(&mut self) -> &mut Mapping {
        &mut self.root
    }

    /// Serialize back to YAML text.
    pub fn to_yaml_string(&self) -> Result<String, StoreError> {
        serde_yaml::to_string(&Value::Mapping(self.root.to_yaml())).map_err(StoreError::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"listen: :443
acme:
  domains:
    - v1.fr.lerner.dev
  email: ops@example.com
auth:
  type: "userpass"
  userpass:
    valera: "321"
    alice: "111"
masquerade:
  type: proxy
  proxy:
    url: https://news.ycombinator.com/
    rewriteHost: true
bandwidth:
  up: 100 mbps
quic:
  initStreamReceiveWindow: 8388608
  maxIdleTimeout: 30.5
"#;

    #[test]
    fn test_parse_keeps_key_order() {
        let doc = Document::parse(SEED).unwrap();
        let keys: Vec<&str> = doc.root().keys().collect();
        assert_eq!(
            keys,
            ["listen", "acme", "auth", "masquerade", "bandwidth", "quic"]
        );
        let users = doc
            .root()
            .get("auth")
            .and_then(Node::as_mapping)
            .and_then(|a| a.get("userpass"))
            .and_then(Node::as_mapping)
            .unwrap();
        assert_eq!(users.keys().collect::<Vec<_>>(), ["valera", "alice"]);
    }

    #[test]
    fn test_round_trip_is_stable() {
        let doc = Document::parse(SEED).unwrap();
        let first = doc.to_yaml_string().unwrap();
        let reparsed = Document::parse(&first).unwrap();
        assert_eq!(reparsed, doc);
        assert_eq!(reparsed.to_yaml_string().unwrap(), first);
    }

    #[test]
    fn test_scalar_kinds_survive() {
        let doc = Document::parse(SEED).unwrap();
        let quic = doc.root().get("quic").and_then(Node::as_mapping).unwrap();
        let window = quic.get("initStreamReceiveWindow").and_then(Node::as_scalar).unwrap();
        assert_eq!(window.kind(), ScalarKind::Int);
        assert_eq!(window.value(), "8388608");
        let idle = quic.get("maxIdleTimeout").and_then(Node::as_scalar).unwrap();
        assert_eq!(idle.kind(), ScalarKind::Float);

        let text = doc.to_yaml_string().unwrap();
        let value: Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(value["quic"]["initStreamReceiveWindow"].as_u64(), Some(8_388_608));
        assert_eq!(value["masquerade"]["proxy"]["rewriteHost"].as_bool(), Some(true));
        assert_eq!(value["auth"]["userpass"]["valera"].as_str(), Some("321"));
    }

    #[test]
    fn test_custom_tags_survive() {
        let doc = Document::parse("secret: !env HY_SECRET\nport: 1\n").unwrap();
        let text = doc.to_yaml_string().unwrap();
        let again = Document::parse(&text).unwrap();
        assert_eq!(again, doc);
        assert!(matches!(again.root().get("secret"), Some(Node::Tagged(tag, _)) if tag == "!env"));
    }

    #[test]
    fn test_null_scalar_reads_as_empty() {
        let doc = Document::parse("listen:\nname: x\n").unwrap();
        let listen = doc.root().get("listen").and_then(Node::as_scalar).unwrap();
        assert_eq!(listen.kind(), ScalarKind::Null);
        assert_eq!(listen.value(), "");
    }

    #[test]
    fn test_top_level_must_be_mapping() {
        for text in ["- a\n- b\n", "just text\n"] {
            let err = Document::parse(text).unwrap_err();
            assert!(matches!(err, StoreError::MalformedDocument(_)), "{text:?}: {err}");
        }
        assert!(Document::parse("").is_err());
    }

    #[test]
    fn test_integer_beyond_u64_rejected() {
        let err = Document::parse("big: 18446744073709551616\n").unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)), "{err}");
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let err = Document::parse("auth: [unclosed\n").unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let err = Document::parse("a: 1\na: 2\n").unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[test]
    fn test_mapping_edits_preserve_order() {
        let mut map = Mapping::new();
        map.push("a", Node::string("1"));
        map.push("b", Node::string("2"));
        map.push("c", Node::string("3"));

        assert_eq!(map.remove("b"), Some(Node::string("2")));
        assert_eq!(map.remove("b"), None);
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "c"]);

        map.push("d", Node::string("4"));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "c", "d"]);

        *map.get_mut("a").unwrap() = Node::string("9");
        assert_eq!(map.get("a").and_then(Node::as_str), Some("9"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_get_or_insert_mapping() {
        let mut map = Mapping::new();
        map.push("scalar", Node::string("x"));

        map.get_or_insert_mapping("fresh")
            .as_mapping_mut()
            .unwrap()
            .push("k", Node::string("v"));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["scalar", "fresh"]);

        // Existing non-mapping values are handed back untouched.
        assert_eq!(map.get_or_insert_mapping("scalar").as_str(), Some("x"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_numeric_looking_strings_stay_strings() {
        let mut doc = Document::parse("auth:\n  userpass: {}\n").unwrap();
        doc.root_mut()
            .get_mut("auth")
            .and_then(Node::as_mapping_mut)
            .and_then(|a| a.get_mut("userpass"))
            .and_then(Node::as_mapping_mut)
            .unwrap()
            .push("bob", Node::string("456"));
        let text = doc.to_yaml_string().unwrap();
        let value: Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(value["auth"]["userpass"]["bob"].as_str(), Some("456"));
    }
}
