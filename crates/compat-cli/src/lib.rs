//! Compat CLI: runs the inference over a browser-compat-data checkout.
pub mod error;
pub mod git;

use anyhow::Context;
use compat_core::{parse_document, to_canonical_string, DocumentProcessor, InferenceConfig, ProcessReport};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

pub const DEFAULT_REMOTE: &str = "https://github.com/SamsungInternet/browser-compat-data";
pub const DEFAULT_DATA_DIR: &str = "browser-compat-data";

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Local checkout of the corpus, cloned when missing
    pub data_dir: PathBuf,
    pub remote: String,
    /// Files to process; every JSON file in the checkout when empty
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    /// Report changes without writing them
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            remote: DEFAULT_REMOTE.to_string(),
            paths: Vec::new(),
            config: None,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Updated(ProcessReport),
    Unchanged(ProcessReport),
    /// Not valid JSON, or not an object at the top level
    Malformed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub updated: usize,
    pub malformed: usize,
    pub records: usize,
    pub skipped_records: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        self.files += 1;
        let report = match outcome {
            FileOutcome::Updated(report) => {
                self.updated += 1;
                report
            }
            FileOutcome::Unchanged(report) => report,
            FileOutcome::Malformed => {
                self.malformed += 1;
                return;
            }
        };
        self.records += report.records;
        self.skipped_records += report.skipped.len();
    }
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && matches!(entry.file_name().to_str(), Some(".git") | Some("node_modules"))
}

/// Every `*.json` file below `root`, in a stable order.
pub fn collect_json_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root).sort_by_file_name().into_iter();
    for entry in walker.filter_entry(|e| !is_ignored_dir(e)) {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        let is_json = entry.path().extension().map_or(false, |ext| ext == "json");
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Process one file and write it back only when its content changed.
pub fn process_file(
    processor: &DocumentProcessor,
    path: &Path,
    dry_run: bool,
) -> anyhow::Result<FileOutcome> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let document = match parse_document(&text) {
        Ok(document) => document,
        Err(e) => {
            warn!(path = %path.display(), "invalid JSON: {}", e);
            return Ok(FileOutcome::Malformed);
        }
    };
    let (document, report) = match processor.process(document) {
        Ok(processed) => processed,
        Err(e) => {
            warn!(path = %path.display(), "{}", e);
            return Ok(FileOutcome::Malformed);
        }
    };

    if !report.dirty() {
        return Ok(FileOutcome::Unchanged(report));
    }

    info!(path = %path.display(), records = report.records, updated = report.updated, "writing");
    if !dry_run {
        std::fs::write(path, to_canonical_string(&document))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(FileOutcome::Updated(report))
}

pub fn run(options: &RunOptions) -> anyhow::Result<RunSummary> {
    let config = match &options.config {
        Some(path) => InferenceConfig::load(path)?,
        None => InferenceConfig::default(),
    };
    let processor = DocumentProcessor::new(config)?;

    let files = if options.paths.is_empty() {
        git::ensure_checkout(&options.data_dir, &options.remote)?;
        collect_json_files(&options.data_dir)?
    } else {
        options.paths.clone()
    };

    let mut summary = RunSummary::default();
    for path in &files {
        let outcome = process_file(&processor, path, options.dry_run)?;
        summary.record(&outcome);
    }

    info!(
        files = summary.files,
        updated = summary.updated,
        malformed = summary.malformed,
        records = summary.records,
        skipped_records = summary.skipped_records,
        "done"
    );
    Ok(summary)
}
