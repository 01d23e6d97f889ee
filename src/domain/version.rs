//! Model version stamping
//!
//! Every component definition must open with a `model_version` key.

use super::document::{Entry, Node};

/// Key that must lead every definition
pub const MODEL_VERSION_KEY: &str = "model_version";

/// Version written when a definition has none
pub const DEFAULT_MODEL_VERSION: &str = "1";

/// Returns true if the document is not a mapping led by `model_version`
pub fn needs_stamp(doc: &Node) -> bool {
    match doc {
        Node::Mapping(mapping) => mapping.first_key() != Some(MODEL_VERSION_KEY),
        _ => true,
    }
}

/// Moves `model_version` to the front, inserting `version` when absent.
///
/// An existing value is kept along with its comments. A document that is
/// not a mapping has no keys to carry over and becomes
/// `{model_version: version}`.
pub fn stamp(doc: Node, version: &str) -> Node {
    if !needs_stamp(&doc) {
        return doc;
    }

    let entries: Vec<Entry> = match doc {
        Node::Mapping(original) => original.into_iter().collect(),
        _ => Vec::new(),
    };
    let (mut existing, rest): (Vec<Entry>, Vec<Entry>) = entries
        .into_iter()
        .partition(|entry| entry.key.as_str() == Some(MODEL_VERSION_KEY));

    let first = existing
        .pop()
        .unwrap_or_else(|| Entry::new(Node::string(MODEL_VERSION_KEY), Node::string(version)));

    Node::Mapping(std::iter::once(first).chain(rest).collect())
}

/// Stamps the document only when it has no `model_version` at all.
///
/// A misplaced `model_version` is left where it is.
pub fn ensure_version(doc: Node, version: &str) -> Node {
    match &doc {
        Node::Mapping(mapping) if mapping.contains_key(MODEL_VERSION_KEY) => doc,
        _ => stamp(doc, version),
    }
}
