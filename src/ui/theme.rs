use ratatui::style::Color;

/// Global colour palette used across the picker.
pub struct Palette;

impl Palette {
    /// Row marker (cursor arrows and selection star).
    pub const ICON: Color = Color::Blue;

    /// Hash of the active or selected row.
    pub const HASH_EMPHASIS: Color = Color::Green;

    /// Summary of the active or selected row.
    pub const SUMMARY_EMPHASIS: Color = Color::Cyan;

    /// Tag labels.
    pub const TAGS: Color = Color::Gray;

    /// Rounded frame around the list.
    pub const BORDER: Color = Color::Indexed(244);

    /// Footer hint bar foreground.
    pub const FOOTER: Color = Color::Indexed(244);

    /// Load error banner.
    pub const ERROR_FG: Color = Color::Red;
    pub const ERROR_BG: Color = Color::Black;
}
