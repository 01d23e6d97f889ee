//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Pass | Writes |
//! |---------|------|--------|
//! | `stamp-version` | `model_version` first | in place, only files that need it |
//! | `format-descriptions` | literal block descriptions | in place, every file |
//! | `sort-fields` | canonical key order | in place, or under `--target` |
//! | `all` | the three above, in order | in place |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Progress lines
//! - `json` - One JSON object per event
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod passes;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
pub use passes::{emit_style, run_pipeline, FileAction, PassRun, RunSummary};
