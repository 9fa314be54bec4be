//! Git plumbing: cloning the corpus and splitting a branch per folder.
use crate::error::GitError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::info;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").unwrap());

/// Thin wrapper running `git` inside one working directory.
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn output(&self, args: &[&str]) -> Result<Output, GitError> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| GitError::Spawn {
                command: args.join(" "),
                source,
            })
    }

    /// Run git and return stdout, failing on a non-zero exit.
    pub fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(GitError::Failed {
                command: args.join(" "),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run git as a predicate on its exit status.
    pub fn succeeds(&self, args: &[&str]) -> Result<bool, GitError> {
        Ok(self.output(args)?.status.success())
    }

    pub fn current_branch(&self) -> Result<String, GitError> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    pub fn checkout(&self, branch: &str) -> Result<(), GitError> {
        self.run(&["checkout", branch]).map(|_| ())
    }
}

/// Clone `remote` into `dir` unless `dir` already exists.
pub fn ensure_checkout(dir: &Path, remote: &str) -> anyhow::Result<bool> {
    if dir.exists() {
        return Ok(false);
    }

    info!(remote, dir = %dir.display(), "cloning browser-compat-data");
    if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let target = dir.to_string_lossy();
    Git::new(".").run(&["clone", "--quiet", remote, target.as_ref()])?;
    Ok(true)
}

/// Branch name for a folder split off `source`, e.g. `master_api` for `api/`.
pub fn folder_branch_name(source: &str, folder: &str) -> String {
    format!("{}_{}", source, NON_ALPHANUMERIC.replace_all(folder, ""))
}

fn top_level_folders(repo: &Path) -> std::io::Result<Vec<String>> {
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(repo)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.starts_with('.') {
            folders.push(format!("{}/", name));
        }
    }
    folders.sort();
    Ok(folders)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    /// Branches created with a commit
    pub committed: Vec<String>,
    /// Folders with no difference against the target branch
    pub unchanged: Vec<String>,
}

/// For every tracked top-level folder, branch off `target` and commit that
/// folder's state from `source`. Folders without changes get no branch.
pub fn split_branches(
    repo: &Path,
    target: &str,
    source: Option<&str>,
) -> anyhow::Result<SplitSummary> {
    let git = Git::new(repo);
    let source = match source {
        Some(source) => source.to_string(),
        None => git.current_branch()?,
    };
    git.checkout(&source)?;

    let mut summary = SplitSummary::default();
    for folder in top_level_folders(repo)? {
        if !git.succeeds(&["ls-files", "--error-unmatch", &folder])? {
            continue;
        }

        git.checkout(target)?;
        let branch = folder_branch_name(&source, &folder);
        git.run(&["checkout", "-b", &branch])?;
        git.run(&["checkout", &source, "--", &folder])?;

        if git.succeeds(&["diff", "--cached", "--quiet", "--exit-code"])? {
            info!(folder = %folder, "no changes, skipping");
            git.checkout(target)?;
            git.run(&["branch", "-D", &branch])?;
            summary.unchanged.push(folder);
            continue;
        }

        git.run(&["commit", "--quiet", "-m", &format!("Updating folder {}", folder)])?;
        info!(folder = %folder, branch = %branch, "committed folder");
        summary.committed.push(branch);
    }

    git.checkout(&source)?;
    Ok(summary)
}
