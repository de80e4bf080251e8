use crate::themes::Theme;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use roi_core::metrics::RoiSegment;
use unicode_width::UnicodeWidthStr;

/// Display columns the emoji + label part of a metric line is padded to.
const LABEL_COLUMNS: usize = 24;

// ── MetricIndicator ──────────────────────────────────────────────────────────

/// One headline number: `"💰 Total Revenue:        ₹4,600"`.
pub struct MetricIndicator<'a> {
    pub emoji: &'a str,
    pub label: &'a str,
    pub value: String,
    pub value_style: Style,
    pub theme: &'a Theme,
}

impl<'a> MetricIndicator<'a> {
    pub fn new(emoji: &'a str, label: &'a str, value: String, theme: &'a Theme) -> Self {
        Self {
            emoji,
            label,
            value,
            value_style: theme.value,
            theme,
        }
    }

    /// Override the value colour (e.g. by ROI segment).
    pub fn with_style(mut self, style: Style) -> Self {
        self.value_style = style;
        self
    }

    pub fn to_line(&self) -> Line<'a> {
        Line::from(vec![
            Span::styled(pad_label(self.emoji, self.label), self.theme.label),
            Span::styled(self.value.clone(), self.value_style),
        ])
    }
}

// ── SegmentIndicator ─────────────────────────────────────────────────────────

/// Row count for one ROI segment: `"🟢 High     3 rows"`.
pub struct SegmentIndicator<'a> {
    pub segment: RoiSegment,
    pub rows: usize,
    pub theme: &'a Theme,
}

impl<'a> SegmentIndicator<'a> {
    pub fn new(segment: RoiSegment, rows: usize, theme: &'a Theme) -> Self {
        Self {
            segment,
            rows,
            theme,
        }
    }

    pub fn emoji(&self) -> &'static str {
        segment_emoji(self.segment)
    }

    pub fn to_line(&self) -> Line<'a> {
        let noun = if self.rows == 1 { "row" } else { "rows" };
        Line::from(vec![
            Span::raw(self.emoji()),
            Span::raw(" "),
            Span::styled(
                format!("{:<8}", self.segment.as_str()),
                self.theme.segment_style(self.segment),
            ),
            Span::styled(format!("{:>5} {noun}", self.rows), self.theme.value),
        ])
    }
}

/// Traffic-light emoji for a segment.
pub fn segment_emoji(segment: RoiSegment) -> &'static str {
    match segment {
        RoiSegment::High => "🟢",
        RoiSegment::Medium => "🟡",
        RoiSegment::Low => "🔴",
    }
}

/// Pad an emoji + label to [`LABEL_COLUMNS`] display columns.
fn pad_label(emoji: &str, label: &str) -> String {
    let content = format!("{emoji} {label}");
    let width = UnicodeWidthStr::width(content.as_str());
    let padding = LABEL_COLUMNS.saturating_sub(width).max(1);
    format!("{content}{}", " ".repeat(padding))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
