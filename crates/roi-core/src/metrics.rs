use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{InfluencerSummary, MergedRecord};

/// Flat pre-campaign revenue estimate applied to every influencer.
///
/// The tracked revenue is grouped per influencer but never used as the
/// baseline; incremental revenue is always `revenue - 1000`.
pub const BASELINE_REVENUE: f64 = 1000.0;

/// ROAS at or above which a row is classified [`RoiSegment::High`].
pub const HIGH_ROAS_THRESHOLD: f64 = 3.0;

/// ROAS at or above which a row is classified [`RoiSegment::Medium`].
pub const MEDIUM_ROAS_THRESHOLD: f64 = 1.5;

// ── RoiSegment ────────────────────────────────────────────────────────────────

/// Three-tier bucket derived from ROAS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoiSegment {
    High,
    Medium,
    Low,
}

impl RoiSegment {
    /// Bucket a ROAS value.
    ///
    /// * `≥ 3.0`        → `High`
    /// * `1.5 ≤ x < 3`  → `Medium`
    /// * `< 1.5`        → `Low`
    ///
    /// Undefined (`None`) and non-finite NaN values classify as `Low`.
    pub fn classify(roas: Option<f64>) -> Self {
        match roas {
            Some(r) if r >= HIGH_ROAS_THRESHOLD => RoiSegment::High,
            Some(r) if r >= MEDIUM_ROAS_THRESHOLD => RoiSegment::Medium,
            _ => RoiSegment::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoiSegment::High => "High",
            RoiSegment::Medium => "Medium",
            RoiSegment::Low => "Low",
        }
    }
}

impl fmt::Display for RoiSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Ratio helpers ─────────────────────────────────────────────────────────────

/// `numerator / denominator`, or `None` when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// [`ratio`] over possibly undefined operands; `None` when either is absent.
pub fn ratio_defined(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    ratio(numerator?, denominator?)
}

/// Sum of the defined values. Undefined values are skipped, so an all-undefined
/// input sums to `0.0`.
pub fn sum_defined<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().sum()
}

/// `numerator / denominator`, or `0.0` when the denominator is zero.
pub fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    ratio(numerator, denominator).unwrap_or(0.0)
}

/// `(likes + comments) / reach`.
///
/// `None` when any input is absent or reach is zero.
pub fn engagement_rate(likes: Option<f64>, comments: Option<f64>, reach: Option<f64>) -> Option<f64> {
    let (likes, comments, reach) = (likes?, comments?, reach?);
    ratio(likes + comments, reach)
}

/// Arithmetic mean of the defined values; `None` when there are none.
pub fn mean_defined<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

// ── ReturnOnSpend ─────────────────────────────────────────────────────────────

/// Anything carrying revenue, spend and incremental revenue, from which the
/// two return-on-spend ratios are derived.
pub trait ReturnOnSpend {
    fn revenue(&self) -> Option<f64>;
    fn spend(&self) -> Option<f64>;
    fn incremental_revenue(&self) -> Option<f64>;

    /// `revenue / spend`, undefined when either is absent or spend is zero.
    fn compute_roas(&self) -> Option<f64> {
        ratio_defined(self.revenue(), self.spend())
    }

    /// `incremental revenue / spend`, undefined when either is absent or
    /// spend is zero.
    fn compute_incremental_roas(&self) -> Option<f64> {
        ratio_defined(self.incremental_revenue(), self.spend())
    }
}

impl ReturnOnSpend for MergedRecord {
    fn revenue(&self) -> Option<f64> {
        self.revenue
    }

    fn spend(&self) -> Option<f64> {
        self.total_payout
    }

    fn incremental_revenue(&self) -> Option<f64> {
        self.incremental_revenue
    }
}

impl ReturnOnSpend for InfluencerSummary {
    fn revenue(&self) -> Option<f64> {
        Some(self.revenue)
    }

    fn spend(&self) -> Option<f64> {
        Some(self.total_payout)
    }

    fn incremental_revenue(&self) -> Option<f64> {
        Some(self.incremental_revenue)
    }
}

/// Descending order for optional ratios with undefined values last.
pub fn cmp_desc_undefined_last(a: Option<f64>, b: Option<f64>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
