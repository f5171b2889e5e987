use std::path::PathBuf;

use tokio::process::Command;
use tracing::{debug, instrument};

use super::{Commit, CommitSource, LoadError};

/// Separates the fields of one commit record (`%x1f`).
const FIELD_SEP: char = '\x1f';

/// Terminates one commit record (`%x1e`).
const RECORD_SEP: char = '\x1e';

/// Decoration entries carrying this prefix are tags.
const TAG_PREFIX: &str = "tag: ";

/// Commit source backed by `git log` in a local repository.
#[derive(Debug, Clone)]
pub struct GitLog {
    pub repo: PathBuf,
    pub max_count: Option<usize>,
    pub full_hash: bool,
}

impl GitLog {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            max_count: None,
            full_hash: false,
        }
    }

    pub fn with_max_count(mut self, max_count: Option<usize>) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn with_full_hash(mut self, full_hash: bool) -> Self {
        self.full_hash = full_hash;
        self
    }

    fn args(&self) -> Vec<String> {
        let hash = if self.full_hash { "%H" } else { "%h" };
        let mut args = vec![
            "-C".to_string(),
            self.repo.display().to_string(),
            "log".to_string(),
            "--no-color".to_string(),
            format!("--format={hash}%x1f%s%x1f%D%x1e"),
        ];
        if let Some(n) = self.max_count {
            args.push(format!("--max-count={n}"));
        }
        args
    }

    #[instrument(level = "debug", skip(self), fields(repo = %self.repo.display()))]
    async fn run(&self) -> Result<Vec<Commit>, LoadError> {
        let output = Command::new("git")
            .args(self.args())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            // A freshly initialised repository has no HEAD to walk yet.
            if stderr.contains("does not have any commits yet") {
                debug!("Repository has no commits");
                return Ok(Vec::new());
            }
            return Err(LoadError::GitFailed {
                code: output.status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8(output.stdout)?;
        let commits = parse_log(&stdout);
        debug!(count = commits.len(), "Loaded commits");
        Ok(commits)
    }
}

impl CommitSource for GitLog {
    fn load_commits(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Commit>, LoadError>> + Send {
        self.run()
    }
}

/// Parse the output of `git log --format=%h%x1f%s%x1f%D%x1e` into commits, keeping order.
pub fn parse_log(output: &str) -> Vec<Commit> {
    output
        .split(RECORD_SEP)
        .map(|record| record.trim_start_matches(['\n', '\r']))
        .filter(|record| !record.trim().is_empty())
        .filter_map(parse_record)
        .collect()
}

fn parse_record(record: &str) -> Option<Commit> {
    let mut fields = record.splitn(3, FIELD_SEP);
    let hash = fields.next()?.trim();
    if hash.is_empty() {
        return None;
    }
    let summary = fields.next().unwrap_or("");
    let tags = fields.next().map(parse_tags).unwrap_or_default();
    Some(Commit::new(hash, summary, tags))
}

/// Extract tag names from a `%D` decoration such as `HEAD -> main, tag: v1.0, origin/main`.
fn parse_tags(decoration: &str) -> Vec<String> {
    decoration
        .trim()
        .split(", ")
        .filter_map(|entry| entry.strip_prefix(TAG_PREFIX))
        .map(str::to_string)
        .collect()
}
