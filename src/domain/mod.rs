//! Domain models for catalog-tidy
//!
//! The document tree and the three pure transformations applied to it.
//! Nothing in here touches the filesystem.

mod document;
mod version;
mod description;
mod fields;
mod pass;
mod presentation;

pub use document::{Comments, DocumentError, Entry, Mapping, Node, Scalar, ScalarStyle, Tagged};
pub use version::{ensure_version, needs_stamp, stamp, DEFAULT_MODEL_VERSION, MODEL_VERSION_KEY};
pub use description::{clean_description, format_descriptions, DESCRIPTION_KEY};
pub use fields::{reorder, sort_definition, sort_field, FIELDS_KEY, FIELD_ORDER, ROOT_ORDER};
pub use pass::Pass;
