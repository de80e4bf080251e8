//! Table views for the Insights and Raw Data tabs, plus the placeholder shown
//! before the pipeline can run.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use roi_core::formatting::{self, format_currency, format_optional_currency, format_ratio};
use roi_core::models::MergedRecord;
use roi_data::aggregator::InsightRow;

use crate::themes::Theme;

pub const INSIGHTS_TITLE: &str = "🧠 Top Influencers by Incremental ROAS";
pub const RAW_TITLE: &str = "🗃 Raw Merged Data (Filtered)";

pub const RAW_COLUMNS: [&str; 13] = [
    "influencer_id",
    "name",
    "platform",
    "gender",
    "product",
    "revenue",
    "total_payout",
    "baseline",
    "engagement_rate",
    "ROAS",
    "Incremental Revenue",
    "Incremental ROAS",
    "ROI Segment",
];

fn optional_number(value: Option<f64>, decimals: u32) -> String {
    match value {
        Some(v) if v.is_finite() => formatting::format_number(v, decimals),
        _ => "n/a".to_string(),
    }
}

fn zebra(theme: &Theme, i: usize) -> ratatui::style::Style {
    if i % 2 == 0 {
        theme.table_row
    } else {
        theme.table_row_alt
    }
}

// ── Insights ──────────────────────────────────────────────────────────────────

/// Render the ranked influencer table into `area`.
pub fn render_insights_table(frame: &mut Frame, area: Rect, rows: &[InsightRow], theme: &Theme) {
    let header = Row::new(
        [
            "Name",
            "Platform",
            "Gender",
            "Followers",
            "ROAS",
            "Incr. ROAS",
            "Engagement",
        ]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Row::new(vec![
                Cell::from(row.name.clone()),
                Cell::from(row.platform.clone()),
                Cell::from(row.gender.clone()),
                Cell::from(formatting::format_number(row.follower_count, 0)),
                Cell::from(format_ratio(row.roas)).style(theme.roas_style(row.roas)),
                Cell::from(format_ratio(row.incremental_roas)),
                Cell::from(format_ratio(row.engagement_rate)),
            ])
            .style(zebra(theme, i))
        })
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Length(11),
    ];

    let table = Table::new(data_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(format!(" {INSIGHTS_TITLE} ")),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Raw data ──────────────────────────────────────────────────────────────────

/// Cell text for one merged row, in [`RAW_COLUMNS`] order.
pub fn raw_cells(row: &MergedRecord) -> [String; 13] {
    [
        row.influencer_id.clone(),
        row.name.clone(),
        row.platform.clone(),
        row.gender.clone(),
        row.product.clone(),
        format_optional_currency(row.revenue),
        format_optional_currency(row.total_payout),
        format_currency(row.baseline),
        optional_number(row.engagement_rate, 4),
        format_ratio(row.roas),
        format_optional_currency(row.incremental_revenue),
        format_ratio(row.incremental_roas),
        row.roi_segment.to_string(),
    ]
}

/// Render the filtered merged table, skipping the first `offset` rows.
pub fn render_raw_table(
    frame: &mut Frame,
    area: Rect,
    rows: &[MergedRecord],
    offset: usize,
    theme: &Theme,
) {
    let header = Row::new(
        RAW_COLUMNS
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let start = offset.min(rows.len());
    let data_rows: Vec<Row> = rows[start..]
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cells = raw_cells(row);
            let segment_style = theme.segment_style(row.roi_segment);
            let mut out: Vec<Cell> = cells.into_iter().map(Cell::from).collect();
            if let Some(last) = out.pop() {
                out.push(last.style(segment_style));
            }
            Row::new(out).style(zebra(theme, start + i))
        })
        .collect();

    let widths = [
        Constraint::Length(13),
        Constraint::Min(12),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(15),
        Constraint::Length(6),
        Constraint::Length(19),
        Constraint::Length(16),
        Constraint::Length(11),
    ];

    let title = format!(
        " {RAW_TITLE} · rows {}-{} of {} ",
        if rows.is_empty() { 0 } else { start + 1 },
        rows.len(),
        rows.len()
    );

    let table = Table::new(data_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(title),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Placeholder ───────────────────────────────────────────────────────────────

/// Render the guidance shown while the dashboard has nothing to display.
pub fn render_no_data(frame: &mut Frame, area: Rect, guidance: &str, is_error: bool, theme: &Theme) {
    let (icon, style) = if is_error {
        ("⚠️ ", theme.error)
    } else {
        ("📥 ", theme.info)
    };
    let text = vec![
        Line::from(""),
        Line::from(vec![Span::raw(icon), Span::styled(guidance.to_string(), style)]),
        Line::from(""),
        Line::from(Span::styled(
            "Pass --influencers, --posts, --tracking and --payouts (or --data-dir), then press 'r' to reload.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border)
                    .title(" Influencer ROI Dashboard "),
            ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
