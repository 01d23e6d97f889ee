//! catalog-tidy - Normalizes connector catalog component definitions
//!
//! A catalog keeps one YAML definition per source, sink or scanner under
//! `.connect/`. Three passes keep those files consistent: version stamping,
//! description formatting and canonical key ordering.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Mapping, Node, Pass};
pub use storage::{Catalog, EmitStyle};
