use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single entry of the commit list, as handed out by a [`CommitSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub summary: String,
    pub tags: Vec<String>,
}

impl Commit {
    pub fn new(hash: impl Into<String>, summary: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            hash: hash.into(),
            summary: summary.into(),
            tags,
        }
    }
}

/// All possible errors that can occur while loading the commit list.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The `git` executable could not be started (usually not installed / not on PATH).
    #[error("Failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    /// `git log` ran but exited unsuccessfully.
    #[error("git log failed ({}): {stderr}", describe_exit(.code))]
    GitFailed { code: Option<i32>, stderr: String },

    /// `git log` printed something that is not UTF-8.
    #[error("git log produced invalid UTF-8: {0}")]
    InvalidOutput(#[from] std::string::FromUtf8Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "terminated by signal".to_string(),
    }
}

/// Asynchronous provider of the ordered commit list.
///
/// The picker calls [`CommitSource::load_commits`] exactly once per session and
/// replaces its list wholesale with the result.
pub trait CommitSource: Send + Sync {
    fn load_commits(&self) -> impl Future<Output = Result<Vec<Commit>, LoadError>> + Send;
}
