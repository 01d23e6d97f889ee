//! The normalization passes as a single dispatchable type

use serde::Serialize;

use super::description::format_descriptions;
use super::document::Node;
use super::fields::sort_definition;
use super::version::{ensure_version, needs_stamp, stamp};

/// One normalization pass over a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// Put `model_version` first
    StampVersion,

    /// Clean descriptions into literal blocks
    FormatDescriptions,

    /// Canonical key order for the root and every field entry
    SortFields,
}

impl Pass {
    /// All passes, in pipeline order
    pub fn all() -> &'static [Pass] {
        &[Pass::StampVersion, Pass::FormatDescriptions, Pass::SortFields]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pass::StampVersion => "stamp_version",
            Pass::FormatDescriptions => "format_descriptions",
            Pass::SortFields => "sort_fields",
        }
    }

    /// Verb used in progress lines
    pub fn verb(&self) -> &'static str {
        match self {
            Pass::StampVersion | Pass::FormatDescriptions => "Updated",
            Pass::SortFields => "Processed",
        }
    }

    /// Applies the pass.
    ///
    /// Returns `None` when the pass leaves the file alone. Only version
    /// stamping skips files; the other passes always rewrite.
    pub fn apply(&self, doc: Node, model_version: &str) -> Option<Node> {
        match self {
            Pass::StampVersion => needs_stamp(&doc).then(|| stamp(doc, model_version)),
            Pass::FormatDescriptions => {
                let mut doc = ensure_version(doc, model_version);
                format_descriptions(&mut doc);
                Some(doc)
            }
            Pass::SortFields => Some(sort_definition(doc)),
        }
    }
}

impl std::fmt::Display for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
