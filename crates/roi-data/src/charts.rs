//! Renderer-independent descriptions of the two dashboard charts.

use roi_core::metrics::cmp_desc_undefined_last;
use roi_core::models::InfluencerSummary;
use serde::{Deserialize, Serialize};

/// Number of bars in the ROAS chart.
pub const TOP_N: usize = 5;

pub const BAR_CHART_TITLE: &str = "Top 5 Influencers by ROAS";
pub const SCATTER_TITLE: &str = "Revenue vs Payout by Influencer";

// ── Bar chart ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub name: String,
    #[serde(rename = "ROAS")]
    pub roas: Option<f64>,
    pub platform: String,
}

/// Top influencers by ROAS, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarChartSpec {
    pub bars: Vec<Bar>,
}

impl BarChartSpec {
    /// Stable-sort `summaries` by ROAS descending (undefined last) and keep
    /// the first [`TOP_N`].
    pub fn top_by_roas(summaries: &[InfluencerSummary]) -> Self {
        let mut ranked: Vec<&InfluencerSummary> = summaries.iter().collect();
        ranked.sort_by(|a, b| cmp_desc_undefined_last(a.roas, b.roas));

        let bars = ranked
            .into_iter()
            .take(TOP_N)
            .map(|s| Bar {
                name: s.name.clone(),
                roas: s.roas,
                platform: s.platform.clone(),
            })
            .collect();
        BarChartSpec { bars }
    }

    /// Largest defined ROAS, floored at zero. Used as the value-axis maximum.
    pub fn max_value(&self) -> f64 {
        self.bars
            .iter()
            .filter_map(|b| b.roas)
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

// ── Scatter ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub name: String,
    pub platform: String,
    pub total_payout: f64,
    pub revenue: f64,
}

/// Inclusive `[min, max]` range of one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

impl AxisBounds {
    /// Range covering zero and every value, widened when degenerate so the
    /// renderer never gets a zero-width axis.
    fn covering(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values
            .filter(|v| v.is_finite())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if max - min <= f64::EPSILON {
            AxisBounds { min, max: min + 1.0 }
        } else {
            AxisBounds { min, max }
        }
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.min, self.max]
    }
}

/// Payout (x) against revenue (y), one point per influencer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterSpec {
    pub points: Vec<ScatterPoint>,
    /// Distinct platforms in first-appearance order; also the colour order.
    pub platforms: Vec<String>,
    pub x_bounds: AxisBounds,
    pub y_bounds: AxisBounds,
}

impl ScatterSpec {
    pub fn from_summaries(summaries: &[InfluencerSummary]) -> Self {
        let points: Vec<ScatterPoint> = summaries
            .iter()
            .map(|s| ScatterPoint {
                name: s.name.clone(),
                platform: s.platform.clone(),
                total_payout: s.total_payout,
                revenue: s.revenue,
            })
            .collect();

        let mut platforms: Vec<String> = Vec::new();
        for point in &points {
            if !platforms.contains(&point.platform) {
                platforms.push(point.platform.clone());
            }
        }

        ScatterSpec {
            x_bounds: AxisBounds::covering(points.iter().map(|p| p.total_payout)),
            y_bounds: AxisBounds::covering(points.iter().map(|p| p.revenue)),
            points,
            platforms,
        }
    }

    /// `(payout, revenue)` pairs for one platform, in point order.
    pub fn series(&self, platform: &str) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter(|p| p.platform == platform)
            .map(|p| (p.total_payout, p.revenue))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
