//! Catalog discovery
//!
//! A catalog is a directory containing `.connect/`, which in turn holds one
//! directory per component type.

use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use super::{Config, DocumentStore};

/// Directory holding the component directories
pub const CONNECT_DIR: &str = ".connect";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("No .connect directory found in {} or any parent. Pass --root to choose a catalog.", .0.display())]
    NotFound(PathBuf),
}

/// A connector catalog
pub struct Catalog {
    root: PathBuf,
    config: Config,
}

impl Catalog {
    /// Opens the catalog at `root`.
    ///
    /// `root/.connect` need not exist; every component directory is then
    /// reported as missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = Config::for_root(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the catalog containing the current directory
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let root = Self::find_root(&cwd).ok_or(CatalogError::NotFound(cwd))?;

        Self::open(root)
    }

    /// Finds the nearest ancestor of `start` (inclusive) containing `.connect/`
    pub fn find_root(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(CONNECT_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Returns the catalog root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.connect` directory
    pub fn connect_dir(&self) -> PathBuf {
        self.root.join(CONNECT_DIR)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Version stamped into definitions that have none
    pub fn model_version(&self) -> &str {
        &self.config.catalog.model_version
    }

    /// Component directory names, in processing order
    pub fn components(&self) -> &[String] {
        &self.config.catalog.components
    }

    /// Returns the store for one component type
    pub fn store(&self, component: &str) -> DocumentStore {
        DocumentStore::new(self.connect_dir().join(component))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_root_walks_up() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".connect/sinks")).unwrap();
        let deep = dir.path().join("tools/scripts");
        fs::create_dir_all(&deep).unwrap();

        assert_eq!(Catalog::find_root(&deep), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn find_root_none_outside_catalog() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Catalog::find_root(dir.path()), None);
    }

    #[test]
    fn open_uses_default_components() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::open(dir.path()).unwrap();

        assert_eq!(catalog.model_version(), "1");
        assert_eq!(catalog.components(), ["sources", "sinks", "scanners"]);
        assert_eq!(
            catalog.store("sinks").dir(),
            dir.path().join(".connect").join("sinks")
        );
    }
}
