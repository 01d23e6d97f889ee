//! Runs normalization passes over catalog directories

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::output::Output;
use crate::domain::Pass;
use crate::storage::{render, Catalog, DocumentStore, EmitStyle};

/// Indentation each pass writes with
pub fn emit_style(pass: Pass) -> EmitStyle {
    match pass {
        Pass::StampVersion => EmitStyle::COMPACT,
        Pass::FormatDescriptions | Pass::SortFields => EmitStyle::INDENTED,
    }
}

/// What happened to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
    /// Written to its destination
    Written,

    /// Left alone because the pass had nothing to do
    Unchanged,

    /// Dry run: the destination would change
    WouldChange,
}

/// Counters for a run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Component directories visited
    pub directories: usize,

    /// Component directories that did not exist
    pub skipped: usize,

    /// Definition files read
    pub files: usize,

    /// Files written (or that would be written in a dry run)
    pub changed: usize,
}

impl RunSummary {
    fn absorb(&mut self, other: &RunSummary) {
        self.directories += other.directories;
        self.skipped += other.skipped;
        self.files += other.files;
        self.changed += other.changed;
    }
}

/// Settings shared by every directory in a run
pub struct PassRun<'a> {
    pub pass: Pass,
    pub model_version: &'a str,
    pub dry_run: bool,
}

impl PassRun<'_> {
    /// Runs the pass over every component directory of the catalog.
    ///
    /// With `target_root`, output for component `c` goes to
    /// `target_root/c`; otherwise files are rewritten in place.
    pub fn run_catalog(
        &self,
        catalog: &Catalog,
        target_root: Option<&Path>,
        output: &Output,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for component in catalog.components() {
            output.blank();
            output.line(&format!("Processing {} directory...", component));

            let source = catalog.store(component);
            let target = match target_root {
                Some(root) => DocumentStore::new(root.join(component)),
                None => catalog.store(component),
            };

            self.run_directory(component, &source, &target, output, &mut summary)?;
        }

        Ok(summary)
    }

    /// Runs the pass over one directory.
    ///
    /// A missing source directory is reported and skipped.
    pub fn run_directory(
        &self,
        component: &str,
        source: &DocumentStore,
        target: &DocumentStore,
        output: &Output,
        summary: &mut RunSummary,
    ) -> Result<()> {
        summary.directories += 1;

        if !source.exists() {
            summary.skipped += 1;
            output.line(&format!(
                "Directory {} does not exist, skipping...",
                source.dir().display()
            ));
            output.event(&serde_json::json!({
                "event": "skipped",
                "pass": self.pass,
                "component": component,
                "directory": source.dir().display().to_string(),
            }));
            return Ok(());
        }

        if !self.dry_run && source.dir() != target.dir() {
            target.ensure_dir()?;
        }

        for path in source.list()? {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .with_context(|| format!("Invalid file name: {}", path.display()))?;

            let doc = source.read(&path)?;
            summary.files += 1;

            let destination = target.path_for(&file_name);
            let action = match self.pass.apply(doc, self.model_version) {
                None => FileAction::Unchanged,
                Some(doc) if self.dry_run => {
                    let rendered = render(&doc, emit_style(self.pass))?;
                    if target.read_text(&destination)?.as_deref() == Some(rendered.as_str()) {
                        FileAction::Unchanged
                    } else {
                        FileAction::WouldChange
                    }
                }
                Some(doc) => {
                    target.write(&destination, &doc, emit_style(self.pass))?;
                    FileAction::Written
                }
            };

            if action != FileAction::Unchanged {
                summary.changed += 1;
            }
            self.report(component, &file_name, action, output);
        }

        Ok(())
    }

    fn report(&self, component: &str, file_name: &str, action: FileAction, output: &Output) {
        if output.is_json() {
            output.event(&serde_json::json!({
                "event": "file",
                "pass": self.pass,
                "component": component,
                "file": file_name,
                "action": action,
            }));
            return;
        }

        match action {
            FileAction::Written => output.line(&format!("{} {}", self.pass.verb(), file_name)),
            FileAction::WouldChange => output.line(&format!("Would update {}", file_name)),
            FileAction::Unchanged => {
                output.verbose_ctx(self.pass.as_str(), &format!("{} unchanged", file_name))
            }
        }
    }
}

/// Runs several passes in order, each over the whole catalog
pub fn run_pipeline(
    catalog: &Catalog,
    passes: &[Pass],
    dry_run: bool,
    output: &Output,
) -> Result<RunSummary> {
    let mut total = RunSummary::default();

    for &pass in passes {
        output.verbose_ctx(pass.as_str(), "Starting pass");
        let run = PassRun {
            pass,
            model_version: catalog.model_version(),
            dry_run,
        };
        let summary = run.run_catalog(catalog, None, output)?;
        total.absorb(&summary);
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::OutputFormat;
    use std::fs;
    use tempfile::TempDir;

    fn quiet() -> Output {
        Output::new(OutputFormat::Json, false)
    }

    fn catalog_with(files: &[(&str, &str, &str)]) -> (TempDir, Catalog) {
        let dir = TempDir::new().unwrap();
        for (component, name, content) in files {
            let component_dir = dir.path().join(".connect").join(component);
            fs::create_dir_all(&component_dir).unwrap();
            fs::write(component_dir.join(name), content).unwrap();
        }
        let catalog = Catalog::open(dir.path()).unwrap();
        (dir, catalog)
    }

    fn read(dir: &TempDir, component: &str, name: &str) -> String {
        fs::read_to_string(dir.path().join(".connect").join(component).join(name)).unwrap()
    }

    #[test]
    fn stamp_rewrites_only_unstamped_files() {
        let (dir, catalog) = catalog_with(&[
            ("sinks", "a.yml", "kind: sink\nname: x\n"),
            ("sinks", "b.yml", "model_version: \"1\"\nkind:   sink\n"),
        ]);
        let run = PassRun {
            pass: Pass::StampVersion,
            model_version: "1",
            dry_run: false,
        };

        let summary = run.run_catalog(&catalog, None, &quiet()).unwrap();

        assert_eq!(read(&dir, "sinks", "a.yml"), "model_version: '1'\nkind: sink\nname: x\n");
        // Untouched, original spacing kept
        assert_eq!(read(&dir, "sinks", "b.yml"), "model_version: \"1\"\nkind:   sink\n");
        assert_eq!(
            summary,
            RunSummary {
                directories: 3,
                skipped: 2,
                files: 2,
                changed: 1,
            }
        );
    }

    #[test]
    fn missing_directories_are_skipped() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::open(dir.path()).unwrap();
        let run = PassRun {
            pass: Pass::SortFields,
            model_version: "1",
            dry_run: false,
        };

        let summary = run.run_catalog(&catalog, None, &quiet()).unwrap();

        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.files, 0);
        assert!(!dir.path().join(".connect").exists());
    }

    #[test]
    fn sort_writes_to_target_and_keeps_source() {
        let source = "name: x\nkind: sink\nfields:\n- description: d\n  path: p\n";
        let (dir, catalog) = catalog_with(&[("sinks", "x.yaml", source)]);
        let out = dir.path().join("out");
        let run = PassRun {
            pass: Pass::SortFields,
            model_version: "1",
            dry_run: false,
        };

        run.run_catalog(&catalog, Some(&out), &quiet()).unwrap();

        assert_eq!(read(&dir, "sinks", "x.yaml"), source);
        assert_eq!(
            fs::read_to_string(out.join("sinks").join("x.yaml")).unwrap(),
            "kind: sink\nname: x\nfields:\n  - path: p\n    description: d\n"
        );
    }

    #[test]
    fn dry_run_writes_nothing() {
        let source = "kind: sink\ndescription: \"a\\\\nb\"\n";
        let (dir, catalog) = catalog_with(&[("sinks", "x.yml", source)]);
        let run = PassRun {
            pass: Pass::FormatDescriptions,
            model_version: "1",
            dry_run: true,
        };

        let summary = run.run_catalog(&catalog, None, &quiet()).unwrap();

        assert_eq!(summary.changed, 1);
        assert_eq!(read(&dir, "sinks", "x.yml"), source);
    }

    #[test]
    fn dry_run_reports_formatted_files_as_unchanged() {
        let formatted = "model_version: '1'\nkind: sink\ndescription: |-\n  a\n  b\n";
        let (_dir, catalog) = catalog_with(&[("sinks", "x.yml", formatted)]);
        let run = PassRun {
            pass: Pass::FormatDescriptions,
            model_version: "1",
            dry_run: true,
        };

        let summary = run.run_catalog(&catalog, None, &quiet()).unwrap();

        assert_eq!(summary.files, 1);
        assert_eq!(summary.changed, 0);
    }

    #[test]
    fn pipeline_runs_passes_in_order() {
        let source = "fields:\n- description: \"  first\\\\nsecond \"\n  path: p\nname: x\nkind: source\n";
        let (dir, catalog) = catalog_with(&[("sources", "x.yml", source)]);

        run_pipeline(&catalog, Pass::all(), false, &quiet()).unwrap();

        assert_eq!(
            read(&dir, "sources", "x.yml"),
            "model_version: '1'\nkind: source\nname: x\nfields:\n  - path: p\n    description: |-\n      first\n      second\n"
        );
    }

    #[test]
    fn malformed_yaml_stops_the_run() {
        let (_dir, catalog) = catalog_with(&[("sinks", "bad.yml", "kind: [sink\n")]);
        let run = PassRun {
            pass: Pass::FormatDescriptions,
            model_version: "1",
            dry_run: false,
        };

        let err = run.run_catalog(&catalog, None, &quiet()).unwrap_err();
        assert!(format!("{:#}", err).contains("bad.yml"));
    }
}
