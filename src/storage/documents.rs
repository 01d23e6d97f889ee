//! YAML definition files in a component directory
//!
//! Each directory holds one definition per `.yml`/`.yaml` file. Files are
//! listed in name order so runs are reproducible.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::emitter::{self, EmitStyle};
use crate::domain::Node;

/// Returns true for `.yml` and `.yaml` files
pub fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yml" || ext == "yaml")
}

/// Store for definition files in one directory
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory this store reads from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    /// Returns the path a file name resolves to in this store
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Lists YAML files sorted by file name
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read directory: {}", self.dir.display()))?
        {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && is_yaml(&path) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Reads and parses one definition
    pub fn read(&self, path: &Path) -> Result<Node> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read definition: {}", path.display()))?;

        Node::parse(&content).with_context(|| format!("Failed to parse definition: {}", path.display()))
    }

    /// Reads a file's raw text, or `None` if it does not exist
    pub fn read_text(&self, path: &Path) -> Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(path)
            .map(Some)
            .with_context(|| format!("Failed to read definition: {}", path.display()))
    }

    /// Creates the directory and any missing parents
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))
    }

    /// Writes a definition atomically (temp file + rename)
    pub fn write(&self, path: &Path, node: &Node, style: EmitStyle) -> Result<()> {
        let content = render(node, style)
            .with_context(|| format!("Failed to serialize definition: {}", path.display()))?;

        let temp_path = temp_path_for(path);

        // Write to temp file first
        fs::write(&temp_path, &content)
            .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

        // Atomic rename
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e).with_context(|| {
                format!(
                    "Failed to rename {} to {}",
                    temp_path.display(),
                    path.display()
                )
            });
        }

        Ok(())
    }
}

/// Renders a definition as YAML text
pub fn render(node: &Node, style: EmitStyle) -> Result<String> {
    Ok(emitter::to_string(node, style)?)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
