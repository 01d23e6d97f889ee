//! # Storage Layer
//!
//! Reading and writing component definitions on disk.
//!
//! ## Catalog Structure
//!
//! ```text
//! <root>/
//! └── .connect/
//!     ├── tidy.toml          # Optional catalog configuration
//!     ├── sources/
//!     │   └── kafka.yml      # One definition per file
//!     ├── sinks/
//!     └── scanners/
//! ```
//!
//! ## Key Types
//!
//! - [`Catalog`] - Entry point for a catalog root
//! - [`DocumentStore`] - Read/write definitions in one component directory
//! - [`EmitStyle`] - Indentation used when writing YAML
//! - [`Config`] - Catalog and global configuration
//!
//! All writes are atomic (temp file + rename).

mod catalog;
mod config;
mod documents;
mod emitter;

pub use catalog::{Catalog, CatalogError, CONNECT_DIR};
pub use config::{CatalogConfig, Config, ConfigError, GlobalConfig, OutputFormat, CATALOG_CONFIG_FILE};
pub use documents::{is_yaml, render, DocumentStore};
pub use emitter::{EmitError, EmitStyle};
