//! Per-influencer aggregation and headline metrics over a filtered view.

use std::collections::HashMap;

use roi_core::formatting::round_to;
use roi_core::metrics::{
    cmp_desc_undefined_last, guarded_ratio, mean_defined, sum_defined, ReturnOnSpend,
};
use roi_core::models::{Influencer, InfluencerSummary, MergedRecord, SummaryMetrics, TableRecord};
use serde::{Deserialize, Serialize};

// ── InfluencerAccumulator ─────────────────────────────────────────────────────

/// Running sums for one influencer group. Undefined row values are skipped.
#[derive(Debug, Clone, Default)]
struct InfluencerAccumulator {
    revenue: f64,
    baseline_sum: f64,
    incremental_revenue: f64,
    total_payout: f64,
    engagement_rates: Vec<Option<f64>>,
    rows: usize,
}

impl InfluencerAccumulator {
    fn add_row(&mut self, row: &MergedRecord) {
        self.revenue += row.revenue.unwrap_or_default();
        self.baseline_sum += row.baseline;
        self.incremental_revenue += row.incremental_revenue.unwrap_or_default();
        self.total_payout += row.total_payout.unwrap_or_default();
        self.engagement_rates.push(row.engagement_rate);
        self.rows += 1;
    }

    fn mean_baseline(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.baseline_sum / self.rows as f64
        }
    }
}

// ── InsightRow ────────────────────────────────────────────────────────────────

/// One row of the ranked influencer table as displayed, numbers rounded to
/// two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRow {
    pub name: String,
    pub platform: String,
    pub gender: String,
    pub follower_count: f64,
    #[serde(rename = "ROAS")]
    pub roas: Option<f64>,
    #[serde(rename = "Incremental ROAS")]
    pub incremental_roas: Option<f64>,
    pub engagement_rate: Option<f64>,
}

impl From<&InfluencerSummary> for InsightRow {
    fn from(s: &InfluencerSummary) -> Self {
        InsightRow {
            name: s.name.clone(),
            platform: s.platform.clone(),
            gender: s.gender.clone(),
            follower_count: s.follower_count,
            roas: s.roas.map(|v| round_to(v, 2)),
            incremental_roas: s.incremental_roas.map(|v| round_to(v, 2)),
            engagement_rate: s.engagement_rate.map(|v| round_to(v, 2)),
        }
    }
}

// ── InsightAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that groups filtered rows by influencer.
pub struct InsightAggregator;

impl InsightAggregator {
    /// Group `rows` by influencer, recompute the ratios from the group sums,
    /// attach profile fields from `influencers` and rank by incremental ROAS.
    ///
    /// Groups appear in first-appearance order before the stable sort, so
    /// ties keep that order. Undefined incremental ROAS ranks last.
    pub fn aggregate(rows: &[MergedRecord], influencers: &[Influencer]) -> Vec<InfluencerSummary> {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, InfluencerAccumulator> = HashMap::new();

        for row in rows {
            let key = row.influencer_id.as_str();
            groups
                .entry(key)
                .or_insert_with(|| {
                    order.push(key);
                    InfluencerAccumulator::default()
                })
                .add_row(row);
        }

        let mut profiles: HashMap<&str, Vec<&Influencer>> = HashMap::new();
        for influencer in influencers {
            profiles
                .entry(influencer.influencer_key())
                .or_default()
                .push(influencer);
        }

        let mut summaries: Vec<InfluencerSummary> = Vec::new();
        for key in order {
            let Some(acc) = groups.get(key) else {
                continue;
            };
            let Some(matching) = profiles.get(key) else {
                continue;
            };
            for profile in matching {
                let mut summary = InfluencerSummary {
                    influencer_id: key.to_string(),
                    name: profile.name.clone(),
                    platform: profile.platform.clone(),
                    gender: profile.gender.clone(),
                    follower_count: profile.follower_count,
                    revenue: acc.revenue,
                    baseline: acc.mean_baseline(),
                    incremental_revenue: acc.incremental_revenue,
                    total_payout: acc.total_payout,
                    engagement_rate: mean_defined(acc.engagement_rates.iter().copied()),
                    roas: None,
                    incremental_roas: None,
                };
                summary.roas = summary.compute_roas();
                summary.incremental_roas = summary.compute_incremental_roas();
                summaries.push(summary);
            }
        }

        summaries.sort_by(|a, b| cmp_desc_undefined_last(a.incremental_roas, b.incremental_roas));
        summaries
    }

    /// Headline numbers over the filtered rows.
    ///
    /// Ratios are guarded: `0.0` when the filtered total payout is zero.
    pub fn summarize(rows: &[MergedRecord]) -> SummaryMetrics {
        let total_revenue = sum_defined(rows.iter().map(|r| r.revenue));
        let total_payout = sum_defined(rows.iter().map(|r| r.total_payout));
        let incremental_revenue = sum_defined(rows.iter().map(|r| r.incremental_revenue));

        SummaryMetrics {
            total_revenue,
            total_payout,
            avg_roas: guarded_ratio(total_revenue, total_payout),
            incremental_roas: guarded_ratio(incremental_revenue, total_payout),
            avg_engagement: mean_defined(rows.iter().map(|r| r.engagement_rate)),
            rows: rows.len(),
        }
    }

    /// The ranked table as displayed.
    pub fn insight_rows(summaries: &[InfluencerSummary]) -> Vec<InsightRow> {
        summaries.iter().map(InsightRow::from).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
