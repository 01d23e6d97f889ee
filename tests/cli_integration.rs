//! CLI integration tests for catalog-tidy
//!
//! These tests run the binary against temporary catalogs and check both the
//! progress output and the files left on disk.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the catalog-tidy binary
fn tidy_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("catalog-tidy"));
    cmd.env_remove("CATALOG_TIDY_ROOT");
    cmd
}

/// Create a catalog with the given `(component, file, content)` definitions
fn setup_catalog(files: &[(&str, &str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join(".connect")).unwrap();
    for (component, name, content) in files {
        let component_dir = dir.path().join(".connect").join(component);
        fs::create_dir_all(&component_dir).unwrap();
        fs::write(component_dir.join(name), content).unwrap();
    }
    dir
}

fn read(root: &Path, component: &str, name: &str) -> String {
    fs::read_to_string(root.join(".connect").join(component).join(name)).unwrap()
}

// =============================================================================
// Version Stamping
// =============================================================================

#[test]
fn test_stamp_version_inserts_default() {
    let dir = setup_catalog(&[("sinks", "x.yml", "kind: sink\nname: x\n")]);

    tidy_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("stamp-version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing sinks directory..."))
        .stdout(predicate::str::contains("Updated x.yml"));

    assert_eq!(
        read(dir.path(), "sinks", "x.yml"),
        "model_version: '1'\nkind: sink\nname: x\n"
    );
}

#[test]
fn test_stamp_version_is_idempotent() {
    let dir = setup_catalog(&[("sources", "x.yaml", "name: y\nmodel_version: '2'\n")]);

    tidy_cmd().arg("--root").arg(dir.path()).arg("stamp-version").assert().success();
    let first = read(dir.path(), "sources", "x.yaml");
    assert_eq!(first, "model_version: '2'\nname: 'y'\n");

    tidy_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("stamp-version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated").not());
    assert_eq!(read(dir.path(), "sources", "x.yaml"), first);
}

#[test]
fn test_stamp_version_uses_catalog_config() {
    let dir = setup_catalog(&[("sinks", "x.yml", "kind: sink\n")]);
    fs::write(
        dir.path().join(".connect/tidy.toml"),
        "model_version = \"3\"\ncomponents = [\"sinks\"]\n",
    )
    .unwrap();

    tidy_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("stamp-version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing sources").not());

    assert_eq!(read(dir.path(), "sinks", "x.yml"), "model_version: '3'\nkind: sink\n");
}

// =============================================================================
// Description Formatting
// =============================================================================

#[test]
fn test_format_descriptions_writes_literal_blocks() {
    let dir = setup_catalog(&[(
        "sources",
        "kafka.yml",
        "kind: source\ndescription: \"  \\\\nHello\\\\nWorld  \"\n",
    )]);

    tidy_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("format-descriptions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated kafka.yml"));

    assert_eq!(
        read(dir.path(), "sources", "kafka.yml"),
        "model_version: '1'\nkind: source\ndescription: |-\n  Hello\n  World\n"
    );
}

#[test]
fn test_yaml11_boolean_words_are_quoted() {
    let dir = setup_catalog(&[("sinks", "x.yml", "kind: sink\nname: y\nenabled: on\nflag: Yes\n")]);

    tidy_cmd().arg("--root").arg(dir.path()).arg("format-descriptions").assert().success();

    assert_eq!(
        read(dir.path(), "sinks", "x.yml"),
        "model_version: '1'\nkind: sink\nname: 'y'\nenabled: 'on'\nflag: 'Yes'\n"
    );
}

#[test]
fn test_comments_survive_every_pass() {
    let source = "# HTTP sink\nname: http # shown in the UI\nkind: sink\nfields:\n  # request target\n  - description: \"The URL\"\n    path: url\n";
    let dir = setup_catalog(&[("sinks", "http.yml", source)]);

    tidy_cmd().arg("--root").arg(dir.path()).arg("all").assert().success();

    assert_eq!(
        read(dir.path(), "sinks", "http.yml"),
        "model_version: '1'\nkind: sink\n# HTTP sink\nname: http # shown in the UI\nfields:\n  - path: url\n    # request target\n    description: |-\n      The URL\n"
    );
}

// =============================================================================
// Field Sorting
// =============================================================================

#[test]
fn test_sort_fields_in_place() {
    let dir = setup_catalog(&[(
        "sinks",
        "x.yml",
        "name: y\nmodel_version: \"2\"\nkind: source\n",
    )]);

    tidy_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("sort-fields")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed x.yml"));

    assert_eq!(
        read(dir.path(), "sinks", "x.yml"),
        "model_version: \"2\"\nkind: source\nname: 'y'\n"
    );
}

#[test]
fn test_sort_fields_to_target_creates_directories() {
    let source = "fields:\n- description: d\n  path: p\n";
    let dir = setup_catalog(&[("scanners", "s.yml", source)]);
    let target = dir.path().join("build/sorted");

    tidy_cmd()
        .arg("--root")
        .arg(dir.path())
        .args(["sort-fields", "--target"])
        .arg(&target)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(target.join("scanners/s.yml")).unwrap(),
        "fields:\n  - path: p\n    description: d\n"
    );
    assert_eq!(read(dir.path(), "scanners", "s.yml"), source);
}

// =============================================================================
// Whole Pipeline
// =============================================================================

#[test]
fn test_all_runs_every_pass() {
    let dir = setup_catalog(&[(
        "sinks",
        "http.yml",
        "fields:\n- description: \"first\\\\nsecond\"\n  path: url\nname: http\nkind: sink\n",
    )]);

    tidy_cmd().arg("--root").arg(dir.path()).arg("all").assert().success();

    assert_eq!(
        read(dir.path(), "sinks", "http.yml"),
        "model_version: '1'\nkind: sink\nname: http\nfields:\n  - path: url\n    description: |-\n      first\n      second\n"
    );
}

#[test]
fn test_dry_run_leaves_files_alone() {
    let source = "kind: sink\nname: x\n";
    let dir = setup_catalog(&[("sinks", "x.yml", source)]);

    tidy_cmd()
        .arg("--root")
        .arg(dir.path())
        .args(["--dry-run", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would update x.yml"));

    assert_eq!(read(dir.path(), "sinks", "x.yml"), source);
}

// =============================================================================
// Missing Directories and Errors
// =============================================================================

#[test]
fn test_missing_directories_are_skipped() {
    let dir = TempDir::new().unwrap();

    tidy_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("sort-fields")
        .assert()
        .success()
        .stdout(predicate::str::contains("does not exist, skipping..."))
        .stdout(predicate::str::contains("3 directories skipped"));

    assert!(!dir.path().join(".connect").exists());
}

#[test]
fn test_malformed_yaml_fails() {
    let dir = setup_catalog(&[("sinks", "bad.yml", "kind: [sink\n")]);

    tidy_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("format-descriptions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.yml"));
}

#[test]
fn test_discovers_root_from_subdirectory() {
    let dir = setup_catalog(&[("sinks", "x.yml", "kind: sink\n")]);
    let nested = dir.path().join("tools/scripts");
    fs::create_dir_all(&nested).unwrap();

    tidy_cmd()
        .current_dir(&nested)
        .arg("stamp-version")
        .assert()
        .success();

    assert_eq!(read(dir.path(), "sinks", "x.yml"), "model_version: '1'\nkind: sink\n");
}

#[test]
fn test_outside_catalog_fails() {
    let dir = TempDir::new().unwrap();

    tidy_cmd()
        .current_dir(dir.path())
        .arg("all")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No .connect directory found"));
}

#[test]
fn test_root_from_environment() {
    let dir = setup_catalog(&[("sinks", "x.yml", "kind: sink\n")]);

    tidy_cmd()
        .env("CATALOG_TIDY_ROOT", dir.path())
        .arg("stamp-version")
        .assert()
        .success();

    assert_eq!(read(dir.path(), "sinks", "x.yml"), "model_version: '1'\nkind: sink\n");
}

// =============================================================================
// JSON Output
// =============================================================================

#[test]
fn test_json_output_events() {
    let dir = setup_catalog(&[("sinks", "x.yml", "kind: sink\n")]);

    let output = tidy_cmd()
        .arg("--root")
        .arg(dir.path())
        .args(["--format", "json", "stamp-version"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    let file = events.iter().find(|e| e["event"] == "file").unwrap();
    assert_eq!(file["pass"], "stamp_version");
    assert_eq!(file["component"], "sinks");
    assert_eq!(file["file"], "x.yml");
    assert_eq!(file["action"], "written");

    let skipped = events.iter().filter(|e| e["event"] == "skipped").count();
    assert_eq!(skipped, 2);

    let summary = events.last().unwrap();
    assert_eq!(summary["event"], "summary");
    assert_eq!(summary["summary"]["changed"], 1);
}
