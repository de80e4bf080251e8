//! Charts tab: top-5 ROAS bar chart above the revenue-vs-payout scatter.
//!
//! Both charts colour by platform using the scatter legend order, so a
//! platform keeps the same colour in either chart.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols,
    text::Line,
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use roi_core::formatting::{format_currency, format_ratio};
use roi_data::charts::{BarChartSpec, ScatterSpec, BAR_CHART_TITLE, SCATTER_TITLE};

use crate::themes::Theme;

/// Bar heights are integers; ROAS is scaled by this factor before plotting.
const BAR_SCALE: f64 = 100.0;

/// Render both charts stacked vertically into `area`.
pub fn render_chart_view(
    frame: &mut Frame,
    area: Rect,
    bars: &BarChartSpec,
    scatter: &ScatterSpec,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_bar_chart(frame, chunks[0], bars, scatter, theme);
    render_scatter(frame, chunks[1], scatter, theme);
}

/// Index of `platform` in the scatter legend; unknown platforms get the
/// next free colour.
fn platform_index(scatter: &ScatterSpec, platform: &str) -> usize {
    scatter
        .platforms
        .iter()
        .position(|p| p == platform)
        .unwrap_or(scatter.platforms.len())
}

fn chart_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(format!(" {title} "))
}

fn render_empty(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::styled("No influencers match the current filters", theme.dim))
            .block(chart_block(title, theme)),
        area,
    );
}

/// Convert the bar spec into ratatui bars; undefined ROAS plots as zero
/// height with an `n/a` label.
pub fn build_bars<'a>(spec: &BarChartSpec, scatter: &ScatterSpec, theme: &Theme) -> Vec<Bar<'a>> {
    spec.bars
        .iter()
        .map(|bar| {
            let height = bar
                .roas
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(|v| (v * BAR_SCALE).round() as u64)
                .unwrap_or(0);
            let color = theme.platform_color(platform_index(scatter, &bar.platform));
            Bar::default()
                .value(height)
                .label(Line::from(bar.name.clone()))
                .text_value(format_ratio(bar.roas))
                .style(Style::default().fg(color))
        })
        .collect()
}

fn render_bar_chart(
    frame: &mut Frame,
    area: Rect,
    spec: &BarChartSpec,
    scatter: &ScatterSpec,
    theme: &Theme,
) {
    if spec.is_empty() {
        render_empty(frame, area, BAR_CHART_TITLE, theme);
        return;
    }

    let bars = build_bars(spec, scatter, theme);
    let inner_width = area.width.saturating_sub(2);
    let count = bars.len().max(1) as u16;
    let bar_width = (inner_width / count).saturating_sub(2).clamp(3, 20);

    let chart = BarChart::default()
        .block(chart_block(BAR_CHART_TITLE, theme))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(2)
        .max((spec.max_value() * BAR_SCALE).ceil().max(1.0) as u64)
        .value_style(theme.value)
        .label_style(theme.label);

    frame.render_widget(chart, area);
}

/// Evenly spaced axis labels at min, middle and max.
fn axis_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| format_currency(*v))
        .collect()
}

fn render_scatter(frame: &mut Frame, area: Rect, spec: &ScatterSpec, theme: &Theme) {
    if spec.is_empty() {
        render_empty(frame, area, SCATTER_TITLE, theme);
        return;
    }

    let series: Vec<(String, Vec<(f64, f64)>)> = spec
        .platforms
        .iter()
        .map(|platform| (platform.clone(), spec.series(platform)))
        .collect();

    let datasets: Vec<Dataset> = series
        .iter()
        .enumerate()
        .map(|(i, (platform, points))| {
            Dataset::default()
                .name(platform.clone())
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(theme.platform_color(i)))
                .data(points)
        })
        .collect();

    let x_bounds = spec.x_bounds.as_array();
    let y_bounds = spec.y_bounds.as_array();

    let chart = Chart::new(datasets)
        .block(chart_block(SCATTER_TITLE, theme))
        .x_axis(
            Axis::default()
                .title("Payout (₹)")
                .style(theme.axis)
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title("Revenue (₹)")
                .style(theme.axis)
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        );

    frame.render_widget(chart, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
