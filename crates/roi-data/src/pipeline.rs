//! Metric pipeline: joins the four input tables on influencer identity and
//! derives the per-row campaign metrics.
//!
//! Join order (each step keyed on `influencer_id`):
//!
//! 1. per-influencer baseline table (fixed [`BASELINE_REVENUE`])
//! 2. tracking ⋈ payouts (inner)
//! 3. ⋈ baseline (inner)
//! 4. ⋈ influencers on `ID` (inner)
//! 5. ⟕ posts (left; one output row per matching post)
//!
//! Rows come out in tracking order, then payout, influencer and post order.

use std::collections::HashMap;

use roi_core::metrics::{engagement_rate, ratio_defined, RoiSegment, BASELINE_REVENUE};
use roi_core::models::{
    Dataset, Influencer, MergedRecord, PayoutRecord, Post, TableRecord, TrackingRecord,
};
use tracing::debug;

// ── Public types ──────────────────────────────────────────────────────────────

/// Baseline revenue assigned to one influencer.
#[derive(Debug, Clone, PartialEq)]
pub struct InfluencerBaseline {
    pub influencer_id: String,
    /// Sum of the influencer's defined tracked revenue. Informational only.
    pub tracked_revenue: f64,
    /// Always [`BASELINE_REVENUE`].
    pub baseline: f64,
}

/// Row accounting for one merge run. Logged, never shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub tracking_rows: usize,
    pub dropped_without_payout: usize,
    pub dropped_without_influencer: usize,
    pub rows_without_posts: usize,
    pub merged_rows: usize,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full merge and metric derivation.
pub fn merge(dataset: &Dataset) -> Vec<MergedRecord> {
    let (rows, report) = merge_with_report(dataset);
    debug!(
        tracking_rows = report.tracking_rows,
        dropped_without_payout = report.dropped_without_payout,
        dropped_without_influencer = report.dropped_without_influencer,
        rows_without_posts = report.rows_without_posts,
        merged_rows = report.merged_rows,
        "merge complete"
    );
    rows
}

/// Same as [`merge`] but also returns the row accounting.
pub fn merge_with_report(dataset: &Dataset) -> (Vec<MergedRecord>, MergeReport) {
    let baselines = baseline_by_influencer(&dataset.tracking);
    let baseline_index: HashMap<&str, &InfluencerBaseline> = baselines
        .iter()
        .map(|b| (b.influencer_id.as_str(), b))
        .collect();

    let payout_index = index_by_key(&dataset.payouts);
    let influencer_index = index_by_key(&dataset.influencers);
    let post_index = index_by_key(&dataset.posts);

    let mut report = MergeReport {
        tracking_rows: dataset.tracking.len(),
        ..Default::default()
    };
    let mut rows: Vec<MergedRecord> = Vec::new();

    for tracking in &dataset.tracking {
        let key = tracking.influencer_key();

        let Some(payouts) = payout_index.get(key) else {
            report.dropped_without_payout += 1;
            continue;
        };
        let Some(baseline) = baseline_index.get(key) else {
            continue;
        };
        let Some(influencers) = influencer_index.get(key) else {
            report.dropped_without_influencer += 1;
            continue;
        };

        for payout in payouts {
            for influencer in influencers {
                match post_index.get(key) {
                    Some(posts) => {
                        for post in posts {
                            rows.push(build_record(
                                tracking,
                                payout,
                                baseline.baseline,
                                influencer,
                                Some(post),
                            ));
                        }
                    }
                    None => {
                        report.rows_without_posts += 1;
                        rows.push(build_record(
                            tracking,
                            payout,
                            baseline.baseline,
                            influencer,
                            None,
                        ));
                    }
                }
            }
        }
    }

    report.merged_rows = rows.len();
    (rows, report)
}

/// Group tracked revenue per influencer, then assign the fixed baseline.
///
/// Output is in first-appearance order of `influencer_id`.
pub fn baseline_by_influencer(tracking: &[TrackingRecord]) -> Vec<InfluencerBaseline> {
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, f64> = HashMap::new();

    for row in tracking {
        let key = row.influencer_key();
        let sum = sums.entry(key).or_insert_with(|| {
            order.push(key);
            0.0
        });
        *sum += row.revenue.unwrap_or_default();
    }

    order
        .into_iter()
        .map(|key| InfluencerBaseline {
            influencer_id: key.to_string(),
            tracked_revenue: sums.get(key).copied().unwrap_or_default(),
            baseline: BASELINE_REVENUE,
        })
        .collect()
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// Index rows by influencer key, preserving input order within each key.
fn index_by_key<T: TableRecord>(rows: &[T]) -> HashMap<&str, Vec<&T>> {
    let mut index: HashMap<&str, Vec<&T>> = HashMap::new();
    for row in rows {
        index.entry(row.influencer_key()).or_default().push(row);
    }
    index
}

/// Assemble one merged row and derive its metrics.
fn build_record(
    tracking: &TrackingRecord,
    payout: &PayoutRecord,
    baseline: f64,
    influencer: &Influencer,
    post: Option<&Post>,
) -> MergedRecord {
    let reach = post.and_then(|p| p.reach);
    let likes = post.and_then(|p| p.likes);
    let comments = post.and_then(|p| p.comments);

    let incremental_revenue = tracking.revenue.map(|revenue| revenue - baseline);
    let roas = ratio_defined(tracking.revenue, payout.total_payout);

    MergedRecord {
        influencer_id: tracking.influencer_id.clone(),
        product: tracking.product.clone(),
        revenue: tracking.revenue,
        campaign: tracking.campaign.clone(),
        date: tracking.date.clone(),
        orders: tracking.orders,
        total_payout: payout.total_payout,
        baseline,
        name: influencer.name.clone(),
        platform: influencer.platform.clone(),
        gender: influencer.gender.clone(),
        follower_count: influencer.follower_count,
        category: influencer.category.clone(),
        reach,
        likes,
        comments,
        engagement_rate: engagement_rate(likes, comments, reach),
        roas,
        incremental_revenue,
        incremental_roas: ratio_defined(incremental_revenue, payout.total_payout),
        roi_segment: RoiSegment::classify(roas),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use roi_core::metrics::ReturnOnSpend;

    pub(crate) fn influencer(id: &str, name: &str, platform: &str, gender: &str) -> Influencer {
        Influencer {
            id: id.to_string(),
            name: name.to_string(),
            platform: platform.to_string(),
            gender: gender.to_string(),
            follower_count: 1000.0,
            category: None,
        }
    }

    pub(crate) fn post(id: &str, reach: f64, likes: f64, comments: f64) -> Post {
        Post {
            influencer_id: id.to_string(),
            reach: Some(reach),
            likes: Some(likes),
            comments: Some(comments),
        }
    }

    pub(crate) fn tracking(id: &str, product: &str, revenue: f64) -> TrackingRecord {
        TrackingRecord {
            influencer_id: id.to_string(),
            product: product.to_string(),
            revenue: Some(revenue),
            campaign: None,
            date: None,
            orders: None,
        }
    }

    pub(crate) fn payout(id: &str, total: f64) -> PayoutRecord {
        PayoutRecord {
            influencer_id: id.to_string(),
            total_payout: Some(total),
        }
    }

    /// Three influencers across two platforms; influencer 3 has no posts,
    /// influencer 4 has tracking but no payout, influencer 5 has no profile.
    pub(crate) fn sample_dataset() -> Dataset {
        Dataset {
            influencers: vec![
                influencer("1", "Asha", "Instagram", "F"),
                influencer("2", "Bilal", "YouTube", "M"),
                influencer("3", "Chen", "Instagram", "M"),
            ],
            posts: vec![
                post("1", 100.0, 10.0, 5.0),
                post("2", 1000.0, 40.0, 10.0),
                post("2", 500.0, 20.0, 5.0),
            ],
            tracking: vec![
                tracking("1", "Whey", 3000.0),
                tracking("2", "Multivitamin", 1200.0),
                tracking("3", "Whey", 500.0),
                tracking("4", "Whey", 9000.0),
                tracking("5", "Creatine", 700.0),
                tracking("1", "Creatine", 1500.0),
            ],
            payouts: vec![
                payout("1", 1000.0),
                payout("2", 800.0),
                payout("3", 0.0),
                payout("5", 100.0),
            ],
        }
    }

    #[test]
    fn test_end_to_end_single_row() {
        let dataset = Dataset {
            influencers: vec![influencer("1", "A", "IG", "F")],
            posts: vec![post("1", 100.0, 10.0, 5.0)],
            tracking: vec![tracking("1", "P1", 3000.0)],
            payouts: vec![payout("1", 1000.0)],
        };
        let rows = merge(&dataset);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert!((row.engagement_rate.unwrap() - 0.15).abs() < 1e-12);
        assert_eq!(row.roas, Some(3.0));
        assert_eq!(row.incremental_revenue, Some(2000.0));
        assert_eq!(row.incremental_roas, Some(2.0));
        assert_eq!(row.roi_segment, RoiSegment::High);
        assert_eq!(row.name, "A");
        assert_eq!(row.follower_count, 1000.0);
    }

    #[test]
    fn test_every_row_has_influencer_and_payout() {
        let dataset = sample_dataset();
        let rows = merge(&dataset);

        assert!(!rows.is_empty());
        for row in &rows {
            assert!(dataset.influencers.iter().any(|i| i.id == row.influencer_id));
            assert!(dataset
                .payouts
                .iter()
                .any(|p| p.influencer_id == row.influencer_id));
        }
    }

    #[test]
    fn test_incremental_revenue_uses_fixed_baseline() {
        let rows = merge(&sample_dataset());
        for row in &rows {
            assert_eq!(row.baseline, 1000.0);
            assert_eq!(row.incremental_revenue, row.revenue.map(|r| r - 1000.0));
        }
    }

    #[test]
    fn test_posts_left_join_fans_out_and_keeps_unmatched() {
        let (rows, report) = merge_with_report(&sample_dataset());

        // 1: two tracking rows × one post; 2: one tracking row × two posts;
        // 3: one tracking row, no posts. 4 and 5 dropped.
        assert_eq!(rows.len(), 5);
        assert_eq!(rows.iter().filter(|r| r.influencer_id == "2").count(), 2);

        let chen = rows.iter().find(|r| r.influencer_id == "3").unwrap();
        assert_eq!(chen.reach, None);
        assert_eq!(chen.engagement_rate, None);

        assert_eq!(report.tracking_rows, 6);
        assert_eq!(report.dropped_without_payout, 1);
        assert_eq!(report.dropped_without_influencer, 1);
        assert_eq!(report.rows_without_posts, 1);
        assert_eq!(report.merged_rows, 5);
    }

    #[test]
    fn test_row_order_follows_tracking_then_posts() {
        let rows = merge(&sample_dataset());
        let order: Vec<(&str, &str, Option<f64>)> = rows
            .iter()
            .map(|r| (r.influencer_id.as_str(), r.product.as_str(), r.reach))
            .collect();
        assert_eq!(
            order,
            vec![
                ("1", "Whey", Some(100.0)),
                ("2", "Multivitamin", Some(1000.0)),
                ("2", "Multivitamin", Some(500.0)),
                ("3", "Whey", None),
                ("1", "Creatine", Some(100.0)),
            ]
        );
    }

    #[test]
    fn test_zero_payout_leaves_roas_undefined_and_low() {
        let rows = merge(&sample_dataset());
        let chen = rows.iter().find(|r| r.influencer_id == "3").unwrap();
        assert_eq!(chen.roas, None);
        assert_eq!(chen.incremental_roas, None);
        assert_eq!(chen.roi_segment, RoiSegment::Low);
    }

    #[test]
    fn test_segments_follow_row_roas() {
        let rows = merge(&sample_dataset());
        // 1200 / 800 = 1.5 → Medium; 1500 / 1000 = 1.5 → Medium; 3000 / 1000 → High
        let segments: Vec<RoiSegment> = rows.iter().map(|r| r.roi_segment).collect();
        assert_eq!(
            segments,
            vec![
                RoiSegment::High,
                RoiSegment::Medium,
                RoiSegment::Medium,
                RoiSegment::Low,
                RoiSegment::Medium,
            ]
        );
    }

    #[test]
    fn test_row_metrics_agree_with_return_on_spend() {
        for row in merge(&sample_dataset()) {
            assert_eq!(row.roas, row.compute_roas());
            assert_eq!(row.incremental_roas, row.compute_incremental_roas());
        }
    }

    #[test]
    fn test_merge_is_deterministic() {
        let dataset = sample_dataset();
        assert_eq!(merge(&dataset), merge(&dataset));
    }

    #[test]
    fn test_duplicate_payouts_fan_out() {
        let dataset = Dataset {
            influencers: vec![influencer("1", "A", "IG", "F")],
            posts: vec![],
            tracking: vec![tracking("1", "P1", 2000.0)],
            payouts: vec![payout("1", 500.0), payout("1", 1000.0)],
        };
        let rows = merge(&dataset);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].roas, Some(4.0));
        assert_eq!(rows[1].roas, Some(2.0));
    }

    #[test]
    fn test_baseline_by_influencer_discards_tracked_sum() {
        let baselines = baseline_by_influencer(&sample_dataset().tracking);
        let ids: Vec<&str> = baselines.iter().map(|b| b.influencer_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);

        let asha = &baselines[0];
        assert_eq!(asha.tracked_revenue, 4500.0);
        assert_eq!(asha.baseline, BASELINE_REVENUE);
        assert!(baselines.iter().all(|b| b.baseline == 1000.0));
    }

    #[test]
    fn test_undefined_revenue_or_payout_keeps_row_with_undefined_ratios() {
        let mut no_revenue = tracking("1", "P1", 0.0);
        no_revenue.revenue = None;
        let mut no_payout = payout("2", 0.0);
        no_payout.total_payout = None;

        let dataset = Dataset {
            influencers: vec![
                influencer("1", "A", "IG", "F"),
                influencer("2", "B", "IG", "M"),
            ],
            posts: vec![],
            tracking: vec![no_revenue, tracking("2", "P1", 4000.0)],
            payouts: vec![payout("1", 500.0), no_payout],
        };
        let rows = merge(&dataset);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].revenue, None);
        assert_eq!(rows[0].incremental_revenue, None);
        assert_eq!(rows[0].roas, None);
        assert_eq!(rows[0].roi_segment, RoiSegment::Low);

        assert_eq!(rows[1].total_payout, None);
        assert_eq!(rows[1].incremental_revenue, Some(3000.0));
        assert_eq!(rows[1].roas, None);
        assert_eq!(rows[1].incremental_roas, None);
        assert_eq!(rows[1].roi_segment, RoiSegment::Low);

        let baselines = baseline_by_influencer(&dataset.tracking);
        assert_eq!(baselines[0].tracked_revenue, 0.0);
    }

    #[test]
    fn test_empty_dataset_merges_to_nothing() {
        let (rows, report) = merge_with_report(&Dataset::default());
        assert!(rows.is_empty());
        assert_eq!(report, MergeReport::default());
    }
}
