//! Metrics tab: the five headline numbers and the ROI segment mix of the
//! filtered rows.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use roi_core::formatting::{format_currency, format_number, format_percent, format_ratio};
use roi_core::metrics::RoiSegment;
use roi_core::models::{MergedRecord, SummaryMetrics};

use crate::components::indicators::{MetricIndicator, SegmentIndicator};
use crate::themes::Theme;

pub const TITLE: &str = "📈 Key Campaign Metrics";

/// Render the metrics tab into `area`.
pub fn render_metrics_view(
    frame: &mut Frame,
    area: Rect,
    summary: &SummaryMetrics,
    rows: &[MergedRecord],
    theme: &Theme,
) {
    let lines = build_metrics_lines(summary, rows, theme);
    let paragraph = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border)
            .title(format!(" {TITLE} ")),
    );
    frame.render_widget(paragraph, area);
}

/// Build the metric lines (extracted for testability).
pub fn build_metrics_lines<'a>(
    summary: &SummaryMetrics,
    rows: &[MergedRecord],
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let mut lines: Vec<Line<'a>> = Vec::with_capacity(16);

    lines.push(Line::from(""));
    lines.push(
        MetricIndicator::new(
            "💰",
            "Total Revenue:",
            format_currency(summary.total_revenue),
            theme,
        )
        .to_line(),
    );
    lines.push(
        MetricIndicator::new(
            "📤",
            "Total Payout:",
            format_currency(summary.total_payout),
            theme,
        )
        .to_line(),
    );
    lines.push(
        MetricIndicator::new(
            "📊",
            "Avg ROAS:",
            format_ratio(Some(summary.avg_roas)),
            theme,
        )
        .with_style(theme.roas_style(Some(summary.avg_roas)))
        .to_line(),
    );
    lines.push(
        MetricIndicator::new(
            "📈",
            "Incremental ROAS:",
            format_ratio(Some(summary.incremental_roas)),
            theme,
        )
        .to_line(),
    );
    lines.push(
        MetricIndicator::new(
            "❤️",
            "Engagement Rate:",
            format_percent(summary.avg_engagement),
            theme,
        )
        .to_line(),
    );

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("─".repeat(60), theme.separator)));
    lines.push(Line::from(Span::styled("ROI segments", theme.bold)));

    for segment in [RoiSegment::High, RoiSegment::Medium, RoiSegment::Low] {
        let count = rows.iter().filter(|r| r.roi_segment == segment).count();
        lines.push(SegmentIndicator::new(segment, count, theme).to_line());
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{} filtered rows", format_number(summary.rows as f64, 0)),
        theme.dim,
    )));

    lines
}

// ── Tests ─────────────────────────────────────────────────────────────────────
