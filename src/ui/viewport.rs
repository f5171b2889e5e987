//! Viewport windowing around the cursor.
//!
//! The frame height is fixed and the list may be far longer, so only a window of
//! `2 * buffer + 1` rows centred on the cursor is ever rendered. Near either end of
//! the list, blank rows stand in for the missing neighbours so the frame does not
//! shrink while the cursor approaches the boundary.

use crate::git::Commit;

/// Rows of the frame taken by decoration (rounded border and padding) rather than list rows.
pub const FRAME_DECORATION_ROWS: usize = 5;

/// A commit inside the visible window, annotated with its absolute list index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow<'a> {
    pub index: usize,
    pub commit: &'a Commit,
}

/// The slice of the list to render plus the blank padding around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportWindow<'a> {
    pub rows: Vec<VisibleRow<'a>>,
    pub start_blank_lines: usize,
    pub end_blank_lines: usize,
}

impl ViewportWindow<'_> {
    /// Number of rows the window occupies, padding included.
    pub fn total_rows(&self) -> usize {
        self.start_blank_lines + self.rows.len() + self.end_blank_lines
    }
}

/// Rows of context shown above (and, where available, below) the cursor.
///
/// Heights too small to hold any context yield zero.
pub fn buffer_size(height: usize) -> usize {
    height.saturating_sub(FRAME_DECORATION_ROWS) / 2
}

/// Compute the window of `commits` to show for `cursor` in a frame of `height` rows.
pub fn compute_viewport(commits: &[Commit], cursor: usize, height: usize) -> ViewportWindow<'_> {
    let buffer = buffer_size(height);
    let len = commits.len();

    let visible_start = cursor.saturating_sub(buffer);
    let visible_end = (cursor + 1 + buffer).min(len);

    let rows = commits
        .iter()
        .enumerate()
        .take(visible_end)
        .skip(visible_start)
        .map(|(index, commit)| VisibleRow { index, commit })
        .collect();

    // The two paddings differ by one on purpose: the end side counts the cursor row itself.
    let start_blank_lines = buffer.saturating_sub(visible_start + cursor);
    let end_blank_lines = (1 + buffer).saturating_sub(len.saturating_sub(cursor));

    ViewportWindow {
        rows,
        start_blank_lines,
        end_blank_lines,
    }
}
