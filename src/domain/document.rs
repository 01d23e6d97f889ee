//! Document tree for component definitions
//!
//! A parsed YAML file is converted into a [`Node`], an order-preserving
//! tagged union of mappings, sequences and scalars. String scalars carry a
//! [`ScalarStyle`]: the style found in the source, or the one a pass asks
//! the emitter for. Mapping entries carry the [`Comments`] written around
//! their key, so they move with the key when a mapping is reordered.

use serde_yaml::Number;
use thiserror::Error;

use super::presentation::recover_presentation;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Presentation hint for string scalars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    /// Plain when possible, quoted when required
    #[default]
    Auto,

    /// Literal block (`|`), newlines kept verbatim
    Literal,

    /// `'single quoted'`
    SingleQuoted,

    /// `"double quoted"`
    DoubleQuoted,
}

/// A leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    /// A number and, when parsed, its source text (`1.10`, `0x1F`)
    Number { value: Number, repr: Option<String> },
    String { value: String, style: ScalarStyle },
}

/// A value carrying an explicit YAML tag (stored without the leading `!`)
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    pub tag: String,
    pub value: Box<Node>,
}

/// A node in a parsed document
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mapping(Mapping),
    Sequence(Vec<Node>),
    Scalar(Scalar),
    Tagged(Tagged),
}

impl Node {
    /// Parses a single YAML document, keeping scalar styles, number text
    /// and comments. An empty document is `Null`.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        let mut node = Node::from(value);
        recover_presentation(text, &mut node);
        Ok(node)
    }

    /// Creates a plain string node
    pub fn string(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String {
            value: value.into(),
            style: ScalarStyle::Auto,
        })
    }

    /// Creates a string node that serializes as a literal block
    pub fn literal(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String {
            value: value.into(),
            style: ScalarStyle::Literal,
        })
    }

    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    /// Returns the string content if this is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String { value, .. }) => Some(value),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    /// Returns the style of a string scalar
    pub fn style(&self) -> Option<ScalarStyle> {
        match self {
            Node::Scalar(Scalar::String { style, .. }) => Some(*style),
            _ => None,
        }
    }

    /// Visits every mapping in the tree depth-first, parents before children.
    ///
    /// The visitor may rewrite entry values; the walk then descends into the
    /// rewritten values.
    pub fn walk_mappings_mut<F>(&mut self, visit: &mut F)
    where
        F: FnMut(&mut Mapping),
    {
        match self {
            Node::Mapping(mapping) => {
                visit(mapping);
                for (_, value) in mapping.iter_mut() {
                    value.walk_mappings_mut(visit);
                }
            }
            Node::Sequence(items) => {
                for item in items {
                    item.walk_mappings_mut(visit);
                }
            }
            Node::Tagged(tagged) => tagged.value.walk_mappings_mut(visit),
            Node::Scalar(_) => {}
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::string(value)
    }
}

impl From<Mapping> for Node {
    fn from(mapping: Mapping) -> Self {
        Node::Mapping(mapping)
    }
}

impl From<serde_yaml::Value> for Node {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(value) => Node::Scalar(Scalar::Number { value, repr: None }),
            Value::String(s) => Node::string(s),
            Value::Sequence(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Mapping(map) => {
                let mut mapping = Mapping::new();
                for (key, value) in map {
                    mapping.push(Node::from(key), Node::from(value));
                }
                Node::Mapping(mapping)
            }
            Value::Tagged(tagged) => {
                let tagged = *tagged;
                let tag = tagged.tag.to_string();
                Node::Tagged(Tagged {
                    tag: tag.strip_prefix('!').unwrap_or(&tag).to_string(),
                    value: Box::new(Node::from(tagged.value)),
                })
            }
        }
    }
}

/// Comments attached to a mapping entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comments {
    /// Full-line comments directly above the key, `#` included
    pub before: Vec<String>,

    /// Comment at the end of the key's line
    pub trailing: Option<String>,
}

/// One key/value pair of a [`Mapping`]
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: Node,
    pub value: Node,
    pub comments: Comments,
}

impl Entry {
    pub fn new(key: Node, value: Node) -> Self {
        Self {
            key,
            value,
            comments: Comments::default(),
        }
    }

    fn is(&self, name: &str) -> bool {
        self.key.as_str() == Some(name)
    }
}

/// Insertion-ordered mapping
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<Entry>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entries.iter().find(|e| e.is(name)).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.entries.iter_mut().find(|e| e.is(name)).map(|e| &mut e.value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets `name` to `value`, keeping the key's position and comments if
    /// it already exists. Returns the previous value.
    pub fn insert(&mut self, name: &str, value: Node) -> Option<Node> {
        match self.get_mut(name) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push(Entry::new(Node::string(name), value));
                None
            }
        }
    }

    /// Appends an entry without checking for an existing key
    pub fn push(&mut self, key: Node, value: Node) {
        self.entries.push(Entry::new(key, value));
    }

    /// Returns the first key if it is a string
    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().and_then(|e| e.key.as_str())
    }

    /// Returns the string keys in order (non-string keys are skipped)
    pub fn key_names(&self) -> Vec<&str> {
        self.entries.iter().filter_map(|e| e.key.as_str()).collect()
    }

    /// Comments of the entry for `name`
    #[cfg(test)]
    pub fn comments(&self, name: &str) -> Option<&Comments> {
        self.entries.iter().find(|e| e.is(name)).map(|e| &e.comments)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.entries.iter_mut()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Node, &mut Node)> {
        self.entries.iter_mut().map(|e| (&e.key, &mut e.value))
    }
}

impl IntoIterator for Mapping {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<Entry> for Mapping {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
