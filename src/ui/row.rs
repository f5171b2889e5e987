//! Per-row display attributes for the commit list.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use super::theme;
use super::viewport::VisibleRow;

/// Columns reserved on every row for the frame, icon and hash before tags and summary.
pub const ROW_CHROME_COLUMNS: i64 = 20;

/// Marker shown in front of a row, one per (selected, active) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIcon {
    SelectedActive,
    Selected,
    Active,
    Plain,
}

impl RowIcon {
    pub fn new(is_selected: bool, is_active: bool) -> Self {
        match (is_selected, is_active) {
            (true, true) => RowIcon::SelectedActive,
            (true, false) => RowIcon::Selected,
            (false, true) => RowIcon::Active,
            (false, false) => RowIcon::Plain,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            RowIcon::SelectedActive => ">>★ ",
            RowIcon::Selected => "  ★ ",
            RowIcon::Active => ">>  ",
            RowIcon::Plain => "    ",
        }
    }
}

/// Everything the renderer needs to draw one commit row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDisplay<'a> {
    pub icon: RowIcon,
    pub emphasize: bool,
    pub hash: &'a str,
    pub tags: &'a [String],
    pub summary: &'a str,
}

impl<'a> RowDisplay<'a> {
    pub fn new(row: &VisibleRow<'a>, cursor: usize, selected: &str, width: usize) -> Self {
        let is_selected = row.commit.hash == selected;
        let is_active = row.index == cursor;
        let commit = row.commit;
        Self {
            icon: RowIcon::new(is_selected, is_active),
            emphasize: is_selected || is_active,
            hash: &commit.hash,
            tags: &commit.tags,
            summary: truncate(&commit.summary, summary_width(width, &commit.tags)),
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        let (hash_style, summary_style) = if self.emphasize {
            (
                Style::default().fg(theme::Palette::HASH_EMPHASIS),
                Style::default().fg(theme::Palette::SUMMARY_EMPHASIS),
            )
        } else {
            (Style::default(), Style::default())
        };

        Line::from(vec![
            Span::styled(
                format!("{} ", self.icon.glyph()),
                Style::default().fg(theme::Palette::ICON),
            ),
            Span::styled(format!("{} ", self.hash), hash_style),
            Span::styled(tag_labels(self.tags), Style::default().fg(theme::Palette::TAGS)),
            Span::styled(self.summary, summary_style),
        ])
    }
}

/// Tags as rendered: each label followed by one separating space.
fn tag_labels(tags: &[String]) -> String {
    tags.iter().map(|t| format!("{t} ")).collect()
}

/// Columns left for the summary once chrome and tag labels are accounted for.
///
/// May be zero or negative on narrow frames.
pub fn summary_width(width: usize, tags: &[String]) -> i64 {
    let tags_len: usize = tags.iter().map(|t| t.chars().count() + 1).sum();
    width as i64 - ROW_CHROME_COLUMNS - tags_len as i64
}

/// The first `max_chars` characters of `summary`; empty when `max_chars <= 0`.
pub fn truncate(summary: &str, max_chars: i64) -> &str {
    if max_chars <= 0 {
        return "";
    }
    match summary.char_indices().nth(max_chars as usize) {
        Some((byte_idx, _)) => &summary[..byte_idx],
        None => summary,
    }
}
