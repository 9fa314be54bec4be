//! Errors from the git plumbing
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("GIT/SPAWN: could not run git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("GIT/FAILED: git {command} exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}
