//! Canonical key ordering for definitions and field entries

use super::document::{Entry, Mapping, Node};

pub const FIELDS_KEY: &str = "fields";

/// Order of recognized top-level definition keys
pub const ROOT_ORDER: [&str; 8] = [
    "model_version",
    "kind",
    "label",
    "name",
    "icon",
    "status",
    "description",
    "fields",
];

/// Order of recognized field entry keys
pub const FIELD_ORDER: [&str; 9] = [
    "path",
    "name",
    "label",
    "kind",
    "type",
    "default",
    "optional",
    "examples",
    "description",
];

/// Reorders `mapping` so keys in `order` come first (in table order),
/// followed by the remaining keys in their original relative order.
pub fn reorder(mapping: Mapping, order: &[&str]) -> Mapping {
    let mut ranked: Vec<Option<Entry>> = vec![None; order.len()];
    let mut rest = Vec::new();

    for entry in mapping {
        let rank = entry
            .key
            .as_str()
            .and_then(|name| order.iter().position(|known| *known == name));
        match rank {
            Some(i) => ranked[i] = Some(entry),
            None => rest.push(entry),
        }
    }

    ranked.into_iter().flatten().chain(rest).collect()
}

/// Sorts a whole definition: root keys, then its field list
pub fn sort_definition(doc: Node) -> Node {
    match doc {
        Node::Mapping(mapping) => Node::Mapping(sort_fields_within(reorder(mapping, &ROOT_ORDER))),
        other => other,
    }
}

/// Sorts one field entry, recursing into nested `fields`.
///
/// Entries that are not mappings are returned unchanged.
pub fn sort_field(field: Node) -> Node {
    match field {
        Node::Mapping(mapping) => Node::Mapping(sort_fields_within(reorder(mapping, &FIELD_ORDER))),
        other => other,
    }
}

fn sort_fields_within(mut mapping: Mapping) -> Mapping {
    if let Some(Node::Sequence(items)) = mapping.get_mut(FIELDS_KEY) {
        *items = std::mem::take(items).into_iter().map(sort_field).collect();
    }
    mapping
}
