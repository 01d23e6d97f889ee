//! Description normalization
//!
//! Descriptions are often pasted with escaped newlines or a stray block
//! indicator. They are cleaned and marked for literal block output.

use super::document::{Mapping, Node};

pub const DESCRIPTION_KEY: &str = "description";

/// Cleans raw description text.
///
/// Escaped `\n` pairs become real newlines, surrounding whitespace is
/// trimmed, and a leading `|` left over from a mangled block scalar is
/// dropped.
pub fn clean_description(raw: &str) -> String {
    let cleaned = raw.replace("\\n", "\n");
    let cleaned = cleaned.trim();

    match cleaned.strip_prefix('|') {
        Some(rest) => rest.trim().to_string(),
        None => cleaned.to_string(),
    }
}

/// Rewrites every string `description` value in the tree as a cleaned
/// literal block.
pub fn format_descriptions(doc: &mut Node) {
    doc.walk_mappings_mut(&mut format_entry);
}

fn format_entry(mapping: &mut Mapping) {
    if let Some(value) = mapping.get_mut(DESCRIPTION_KEY) {
        if let Some(text) = value.as_str() {
            *value = Node::literal(clean_description(text));
        }
    }
}
