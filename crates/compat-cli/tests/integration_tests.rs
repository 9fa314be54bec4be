//! Integration tests for the file-level glue: enumeration, write-back and
//! re-runs over a copy of the fixture checkout.

use compat_cli::{collect_json_files, process_file, run, FileOutcome, RunOptions};
use compat_core::{DocumentProcessor, InferenceConfig};
use std::path::{Path, PathBuf};

fn fixture_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    workspace_root.join("testing/fixtures/bcd")
}

/// Copy the fixture checkout into a fresh temporary directory
fn checkout() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for folder in ["api", "browsers"] {
        let target = dir.path().join(folder);
        std::fs::create_dir_all(&target).unwrap();
        for entry in std::fs::read_dir(fixture_root().join(folder)).unwrap() {
            let entry = entry.unwrap();
            std::fs::copy(entry.path(), target.join(entry.file_name())).unwrap();
        }
    }
    std::fs::create_dir_all(dir.path().join(".git")).unwrap();
    std::fs::write(dir.path().join(".git/config.json"), "{}").unwrap();
    dir
}

fn options(dir: &Path) -> RunOptions {
    RunOptions {
        data_dir: dir.to_path_buf(),
        ..RunOptions::default()
    }
}

#[test]
fn test_collects_json_files_outside_git_dir() {
    let dir = checkout();
    let files = collect_json_files(dir.path()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(
        names,
        vec!["api/Broken.json", "api/PaymentRequest.json", "browsers/samsunginternet_android.json"]
    );
}

#[test]
fn test_run_updates_only_dirty_files() {
    let dir = checkout();
    let registry = dir.path().join("browsers/samsunginternet_android.json");
    let registry_before = std::fs::read_to_string(&registry).unwrap();

    let summary = run(&options(dir.path())).unwrap();
    assert_eq!(summary.files, 3);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.malformed, 1);
    assert_eq!(summary.records, 6);
    assert_eq!(summary.skipped_records, 2);

    assert_eq!(std::fs::read_to_string(&registry).unwrap(), registry_before);

    let written = std::fs::read_to_string(dir.path().join("api/PaymentRequest.json")).unwrap();
    assert!(written.ends_with("}\n"));
    assert!(written.contains("\"version_added\": \"8.0\""));
    assert!(written.contains("Before Samsung Internet 7.0"));
}

#[test]
fn test_second_run_writes_nothing() {
    let dir = checkout();
    run(&options(dir.path())).unwrap();
    let path = dir.path().join("api/PaymentRequest.json");
    let first = std::fs::read_to_string(&path).unwrap();

    let summary = run(&options(dir.path())).unwrap();
    assert_eq!(summary.updated, 0);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn test_dry_run_leaves_files_alone() {
    let dir = checkout();
    let path = dir.path().join("api/PaymentRequest.json");
    let before = std::fs::read_to_string(&path).unwrap();

    let processor = DocumentProcessor::new(InferenceConfig::default()).unwrap();
    let outcome = process_file(&processor, &path, true).unwrap();

    assert!(matches!(outcome, FileOutcome::Updated(ref report) if report.updated == 4));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_explicit_paths_and_config_file() {
    let dir = checkout();
    let config = dir.path().join("mapping.yaml");
    std::fs::write(
        &config,
        "mappings:\n  - { derived: \"6\", max_reference: 56 }\n  - { derived: \"7\", max_reference: 59 }\n  - { derived: \"8\", max_reference: 63 }\n",
    )
    .unwrap();
    let path = dir.path().join("api/PaymentRequest.json");

    let summary = run(&RunOptions {
        data_dir: dir.path().join("missing-checkout"),
        paths: vec![path.clone()],
        config: Some(config),
        ..RunOptions::default()
    })
    .unwrap();

    assert_eq!(summary.files, 1);
    assert_eq!(summary.updated, 1);
    assert!(!dir.path().join("missing-checkout").exists());
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"version_added\": \"8\""));
}

#[test]
fn test_malformed_file_is_reported_not_fatal() {
    let dir = checkout();
    let processor = DocumentProcessor::new(InferenceConfig::default()).unwrap();
    let outcome = process_file(&processor, &dir.path().join("api/Broken.json"), false).unwrap();
    assert_eq!(outcome, FileOutcome::Malformed);
}
