use serde::{Deserialize, Serialize};

use crate::metrics::RoiSegment;

/// Schema information shared by the four input tables.
///
/// Ingestion uses [`TableRecord::REQUIRED_COLUMNS`] to report a missing column
/// by name; the pipeline uses [`TableRecord::influencer_key`] to join.
pub trait TableRecord {
    /// Human-readable table name used in logs and guidance messages.
    const TABLE: &'static str;
    /// Header names that must be present for the table to be usable.
    const REQUIRED_COLUMNS: &'static [&'static str];
    /// The influencer identity this row belongs to.
    fn influencer_key(&self) -> &str;
}

/// One influencer profile (reference data for the session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Influencer {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub platform: String,
    pub gender: String,
    /// Read as a number so exports like `1200.0` load; shown without decimals.
    pub follower_count: f64,
    #[serde(default)]
    pub category: Option<String>,
}

impl TableRecord for Influencer {
    const TABLE: &'static str = "influencers";
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["ID", "name", "platform", "gender", "follower_count"];

    fn influencer_key(&self) -> &str {
        &self.id
    }
}

/// One social post. Empty numeric cells deserialize to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub influencer_id: String,
    pub reach: Option<f64>,
    pub likes: Option<f64>,
    pub comments: Option<f64>,
}

impl TableRecord for Post {
    const TABLE: &'static str = "posts";
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["influencer_id", "reach", "likes", "comments"];

    fn influencer_key(&self) -> &str {
        &self.influencer_id
    }
}

/// One conversion tracking record. An empty `revenue` cell is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub influencer_id: String,
    pub product: String,
    pub revenue: Option<f64>,
    #[serde(default)]
    pub campaign: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub orders: Option<f64>,
}

impl TableRecord for TrackingRecord {
    const TABLE: &'static str = "tracking";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["influencer_id", "product", "revenue"];

    fn influencer_key(&self) -> &str {
        &self.influencer_id
    }
}

/// One payout record. An empty `total_payout` cell is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutRecord {
    pub influencer_id: String,
    pub total_payout: Option<f64>,
}

impl TableRecord for PayoutRecord {
    const TABLE: &'static str = "payouts";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["influencer_id", "total_payout"];

    fn influencer_key(&self) -> &str {
        &self.influencer_id
    }
}

/// The four input tables of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub influencers: Vec<Influencer>,
    pub posts: Vec<Post>,
    pub tracking: Vec<TrackingRecord>,
    pub payouts: Vec<PayoutRecord>,
}

/// A tracking row joined with payout, baseline, profile and (optionally) post
/// data, plus the derived metrics.
///
/// Serialised field names follow the column names shown in the raw data view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub influencer_id: String,
    pub product: String,
    pub revenue: Option<f64>,
    pub campaign: Option<String>,
    pub date: Option<String>,
    pub orders: Option<f64>,
    pub total_payout: Option<f64>,
    pub baseline: f64,
    pub name: String,
    pub platform: String,
    pub gender: String,
    pub follower_count: f64,
    pub category: Option<String>,
    pub reach: Option<f64>,
    pub likes: Option<f64>,
    pub comments: Option<f64>,
    pub engagement_rate: Option<f64>,
    #[serde(rename = "ROAS")]
    pub roas: Option<f64>,
    #[serde(rename = "Incremental Revenue")]
    pub incremental_revenue: Option<f64>,
    #[serde(rename = "Incremental ROAS")]
    pub incremental_roas: Option<f64>,
    #[serde(rename = "ROI Segment")]
    pub roi_segment: RoiSegment,
}

/// Per-influencer aggregate of the filtered merged table. Sums skip
/// undefined row values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencerSummary {
    pub influencer_id: String,
    pub name: String,
    pub platform: String,
    pub gender: String,
    pub follower_count: f64,
    pub revenue: f64,
    pub baseline: f64,
    #[serde(rename = "Incremental Revenue")]
    pub incremental_revenue: f64,
    pub total_payout: f64,
    pub engagement_rate: Option<f64>,
    #[serde(rename = "ROAS")]
    pub roas: Option<f64>,
    #[serde(rename = "Incremental ROAS")]
    pub incremental_roas: Option<f64>,
}

/// Headline numbers for the metrics tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_revenue: f64,
    pub total_payout: f64,
    /// Total revenue / total payout, `0.0` when nothing was paid out.
    pub avg_roas: f64,
    /// Summed incremental revenue / total payout, `0.0` when nothing was paid out.
    pub incremental_roas: f64,
    /// Mean of the defined row-level engagement rates.
    pub avg_engagement: Option<f64>,
    /// Number of filtered rows the numbers were computed from.
    pub rows: usize,
}
