//! Plain-text rendering of a dashboard state, for non-interactive output.

use std::fmt::Write;

use roi_core::formatting::{format_currency, format_number, format_percent, format_ratio};
use roi_core::models::MergedRecord;
use roi_data::charts::{BAR_CHART_TITLE, SCATTER_TITLE};
use roi_runtime::snapshot::{DashboardSnapshot, DashboardState};
use unicode_width::UnicodeWidthStr;

use crate::components::header::{TITLE, TITLE_EMOJI};
use crate::metrics_view;
use crate::table_view::{raw_cells, INSIGHTS_TITLE, RAW_COLUMNS, RAW_TITLE};

/// Widest text bar in the ROAS chart, in columns.
const BAR_COLUMNS: f64 = 40.0;

/// Raw merged rows printed before the section is cut off.
const RAW_ROWS_LIMIT: usize = 50;

/// Right-aligned columns of the raw table (revenue through Incremental ROAS).
const RAW_NUMERIC_COLUMNS: [usize; 7] = [5, 6, 7, 8, 9, 10, 11];

/// Left-align `text` in `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(text);
    format!("{text}{}", " ".repeat(width.saturating_sub(w)))
}

/// Right-align `text` in `width` display columns.
fn pad_left(text: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(text);
    format!("{}{text}", " ".repeat(width.saturating_sub(w)))
}

/// Lay out `rows` under `headers` with columns sized to their widest cell.
/// Columns listed in `numeric` are right-aligned.
fn text_table(headers: &[&str], rows: &[Vec<String>], numeric: &[usize]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(UnicodeWidthStr::width(cell.as_str()));
            }
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if numeric.contains(&i) {
                    pad_left(c, widths[i])
                } else {
                    pad(c, widths[i])
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&format_row(headers.to_vec()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// Render `state` as a report. Non-ready states produce the guidance text.
pub fn render_report(state: &DashboardState) -> String {
    match state {
        DashboardState::Ready { snapshot } => render_snapshot(snapshot),
        other => {
            let guidance = other.guidance().unwrap_or_default();
            format!("📥 {guidance}\n")
        }
    }
}

fn render_snapshot(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let summary = &snapshot.summary;

    // Writes into a String cannot fail.
    let _ = writeln!(out, "{TITLE_EMOJI} {TITLE}");
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(
        out,
        "[ {} of {} rows | {} ]",
        snapshot.rows.len(),
        snapshot.merged_rows,
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out.push('\n');

    let _ = writeln!(out, "{}", metrics_view::TITLE);
    for (label, value) in [
        ("💰 Total Revenue", format_currency(summary.total_revenue)),
        ("📤 Total Payout", format_currency(summary.total_payout)),
        ("📊 Avg ROAS", format_ratio(Some(summary.avg_roas))),
        ("📈 Incremental ROAS", format_ratio(Some(summary.incremental_roas))),
        ("❤️ Engagement Rate", format_percent(summary.avg_engagement)),
    ] {
        let _ = writeln!(out, "  {} {value}", pad(label, 22));
    }
    out.push('\n');

    let _ = writeln!(out, "{INSIGHTS_TITLE}");
    let rows: Vec<Vec<String>> = snapshot
        .insights
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                r.platform.clone(),
                r.gender.clone(),
                format_number(r.follower_count, 0),
                format_ratio(r.roas),
                format_ratio(r.incremental_roas),
                format_ratio(r.engagement_rate),
            ]
        })
        .collect();
    out.push_str(&text_table(
        &[
            "name",
            "platform",
            "gender",
            "follower_count",
            "ROAS",
            "Incremental ROAS",
            "engagement_rate",
        ],
        &rows,
        &[3, 4, 5, 6],
    ));
    out.push('\n');

    let _ = writeln!(out, "📊 {BAR_CHART_TITLE}");
    let max = snapshot.bar_chart.max_value();
    let name_width = snapshot
        .bar_chart
        .bars
        .iter()
        .map(|b| UnicodeWidthStr::width(b.name.as_str()))
        .max()
        .unwrap_or(0);
    for bar in &snapshot.bar_chart.bars {
        let length = match bar.roas {
            Some(v) if v.is_finite() && v > 0.0 && max > 0.0 => {
                ((v / max) * BAR_COLUMNS).round() as usize
            }
            _ => 0,
        };
        let _ = writeln!(
            out,
            "  {} {} {} ({})",
            pad(&bar.name, name_width),
            "█".repeat(length),
            format_ratio(bar.roas),
            bar.platform
        );
    }
    out.push('\n');

    let _ = writeln!(out, "📊 {SCATTER_TITLE}");
    let points: Vec<Vec<String>> = snapshot
        .scatter
        .points
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.platform.clone(),
                format_currency(p.total_payout),
                format_currency(p.revenue),
            ]
        })
        .collect();
    out.push_str(&text_table(
        &["name", "platform", "total_payout", "revenue"],
        &points,
        &[2, 3],
    ));
    out.push('\n');

    out.push_str(&render_raw_section(&snapshot.rows));
    out
}

/// The filtered merged table, cut off after [`RAW_ROWS_LIMIT`] rows.
fn render_raw_section(rows: &[MergedRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RAW_TITLE}");

    let cells: Vec<Vec<String>> = rows
        .iter()
        .take(RAW_ROWS_LIMIT)
        .map(|row| raw_cells(row).to_vec())
        .collect();
    out.push_str(&text_table(&RAW_COLUMNS, &cells, &RAW_NUMERIC_COLUMNS));

    if rows.len() > RAW_ROWS_LIMIT {
        let _ = writeln!(
            out,
            "... {} more rows (use --view json for the full table)",
            rows.len() - RAW_ROWS_LIMIT
        );
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
