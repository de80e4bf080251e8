//! Render-ready results of one pipeline run.
//!
//! This is the data contract between the session and every presentation
//! surface (TUI, text report, JSON export).

use chrono::{DateTime, Utc};
use roi_core::error::Result;
use roi_core::models::{Influencer, InfluencerSummary, MergedRecord, SummaryMetrics};
use roi_data::aggregator::{InsightAggregator, InsightRow};
use roi_data::charts::{BarChartSpec, ScatterSpec};
use roi_data::filter::{apply_filters, FilterOptions, FilterSelection};
use roi_data::reader::AWAITING_UPLOADS_MESSAGE;
use serde::{Deserialize, Serialize};

// ── DashboardSnapshot ─────────────────────────────────────────────────────────

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    /// Rows in the merged table before filtering.
    pub merged_rows: usize,
    pub summary: SummaryMetrics,
    /// Per-influencer aggregates, ranked by incremental ROAS.
    pub influencers: Vec<InfluencerSummary>,
    /// `influencers` as displayed, rounded to two decimals.
    pub insights: Vec<InsightRow>,
    pub bar_chart: BarChartSpec,
    pub scatter: ScatterSpec,
    pub options: FilterOptions,
    pub selection: FilterSelection,
    /// The filtered merged table.
    pub rows: Vec<MergedRecord>,
}

impl DashboardSnapshot {
    /// Run filter, aggregation, summary and chart stages over `merged`.
    pub fn build(
        merged: &[MergedRecord],
        influencers: &[Influencer],
        options: &FilterOptions,
        selection: &FilterSelection,
    ) -> Self {
        let rows = apply_filters(merged, selection);
        let summaries = InsightAggregator::aggregate(&rows, influencers);

        tracing::debug!(
            merged = merged.len(),
            filtered = rows.len(),
            influencers = summaries.len(),
            "snapshot computed"
        );

        DashboardSnapshot {
            generated_at: Utc::now(),
            merged_rows: merged.len(),
            summary: InsightAggregator::summarize(&rows),
            insights: InsightAggregator::insight_rows(&summaries),
            bar_chart: BarChartSpec::top_by_roas(&summaries),
            scatter: ScatterSpec::from_summaries(&summaries),
            influencers: summaries,
            options: options.clone(),
            selection: selection.clone(),
            rows,
        }
    }
}

// ── DashboardState ────────────────────────────────────────────────────────────

/// What the presentation layer should show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DashboardState {
    /// Fewer than four files supplied; the pipeline has not run.
    AwaitingUploads { missing: Vec<String> },
    /// The last load failed; `message` names the file and problem.
    Failed { message: String },
    Ready { snapshot: Box<DashboardSnapshot> },
}

impl DashboardState {
    /// Guidance line for the non-ready states.
    pub fn guidance(&self) -> Option<String> {
        match self {
            DashboardState::AwaitingUploads { missing } => Some(format!(
                "{AWAITING_UPLOADS_MESSAGE} Missing: {}",
                missing.join(", ")
            )),
            DashboardState::Failed { message } => Some(message.clone()),
            DashboardState::Ready { .. } => None,
        }
    }

    /// Pretty-printed JSON document for `--view json`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        match self {
            DashboardState::Ready { snapshot } => Some(snapshot.as_ref()),
            _ => None,
        }
    }
}
