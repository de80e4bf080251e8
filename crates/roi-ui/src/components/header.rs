use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Emoji placed before the dashboard title.
pub const TITLE_EMOJI: &str = "💪";

pub const TITLE: &str = "INFLUENCER CAMPAIGN PERFORMANCE DASHBOARD";

/// Dashboard header rendering three lines:
///
/// 1. Title (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Status information in `[ rows | generated ]` format.
pub struct Header<'a> {
    /// Left-hand status, e.g. `"5 of 12 rows"` or `"awaiting uploads"`.
    pub status: &'a str,
    /// Right-hand status, e.g. the snapshot time.
    pub detail: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(status: &'a str, detail: &'a str, theme: &'a Theme) -> Self {
        Self {
            status,
            detail,
            theme,
        }
    }

    /// Render the header as exactly three lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled(TITLE_EMOJI, self.theme.header_accent),
                Span::styled(format!(" {TITLE}"), self.theme.header),
            ]),
            Line::from(Span::styled("=".repeat(60), self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.status, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.detail, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
