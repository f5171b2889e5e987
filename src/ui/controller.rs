//! Cursor and list state of the commit picker.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use super::row::RowDisplay;
use super::viewport::{compute_viewport, ViewportWindow};
use super::PickerMessage;
use crate::git::{Commit, LoadError};

/// Owns the commit list and the cursor; reports confirmed selections through `tx`.
///
/// `selected`, `width` and `height` belong to the caller and are only passed in
/// when a view is derived.
pub struct ViewportController {
    commits: Vec<Commit>,
    cursor: usize,
    tx: UnboundedSender<PickerMessage>,
}

impl ViewportController {
    pub fn new(tx: UnboundedSender<PickerMessage>) -> Self {
        Self {
            commits: Vec::new(),
            cursor: 0,
            tx,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Install the outcome of the one-shot load from a [`crate::git::CommitSource`].
    ///
    /// The list is replaced wholesale and the cursor is left where it is. On failure
    /// the list stays as it was (empty on first load).
    pub fn apply_load(&mut self, result: Result<Vec<Commit>, LoadError>) -> Result<(), LoadError> {
        match result {
            Ok(commits) => {
                debug!(count = commits.len(), "Commit list replaced");
                self.commits = commits;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Loading commits failed");
                Err(e)
            }
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.commits.len() {
            self.cursor += 1;
        }
    }

    /// Report the hash under the cursor. Returns `false` when there was nothing to report.
    pub fn confirm(&self) -> bool {
        let Some(commit) = self.commits.get(self.cursor) else {
            return false;
        };
        debug!(hash = %commit.hash, "Commit confirmed");
        // The receiver going away only means nobody is listening any more.
        let _ = self.tx.send(PickerMessage::Selected {
            hash: commit.hash.clone(),
        });
        true
    }

    /// Window of the list to render in a frame of `height` rows.
    pub fn viewport(&self, height: usize) -> ViewportWindow<'_> {
        compute_viewport(&self.commits, self.cursor, height)
    }

    /// Display attributes of each visible row, in order.
    pub fn row_displays<'a>(
        &'a self,
        window: &ViewportWindow<'a>,
        selected: &str,
        width: usize,
    ) -> Vec<RowDisplay<'a>> {
        window
            .rows
            .iter()
            .map(|row| RowDisplay::new(row, self.cursor, selected, width))
            .collect()
    }
}
