//! CSV discovery and loading for the four dashboard inputs.
//!
//! Each file is read with a header row, cells trimmed, and rows deserialized
//! into the typed records of [`roi_core::models`]. Columns are matched by
//! exact header name; extra columns are ignored.

use std::io::BufReader;
use std::path::{Path, PathBuf};

use roi_core::error::{DashboardError, Result};
use roi_core::models::{Dataset, Influencer, PayoutRecord, Post, TableRecord, TrackingRecord};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Guidance shown while fewer than four files are available.
pub const AWAITING_UPLOADS_MESSAGE: &str = "Please upload all four CSV files to begin analysis.";

// ── InputFiles ────────────────────────────────────────────────────────────────

/// The four upload slots of a session. A slot is `None` until a file is given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFiles {
    pub influencers: Option<PathBuf>,
    pub posts: Option<PathBuf>,
    pub tracking: Option<PathBuf>,
    pub payouts: Option<PathBuf>,
}

impl InputFiles {
    /// Names of the slots that have no file yet, in upload-widget order.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.influencers.is_none() {
            missing.push(Influencer::TABLE);
        }
        if self.posts.is_none() {
            missing.push(Post::TABLE);
        }
        if self.tracking.is_none() {
            missing.push(TrackingRecord::TABLE);
        }
        if self.payouts.is_none() {
            missing.push(PayoutRecord::TABLE);
        }
        missing
    }

    /// `true` once all four slots hold a path.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Fill any empty slot from `other`; slots already set are kept.
    pub fn fill_missing_from(&mut self, other: InputFiles) {
        self.influencers = self.influencers.take().or(other.influencers);
        self.posts = self.posts.take().or(other.posts);
        self.tracking = self.tracking.take().or(other.tracking);
        self.payouts = self.payouts.take().or(other.payouts);
    }
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Find all `.csv` files directly inside `dir`, sorted by path.
pub fn find_csv_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Data directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Assign the CSV files in `dir` to upload slots by file stem.
///
/// Recognised stems (case-insensitive): `influencers`, `posts`,
/// `tracking` / `tracking_data`, `payouts`. The first match per slot wins.
pub fn discover_input_files(dir: &Path) -> InputFiles {
    let mut found = InputFiles::default();

    for path in find_csv_files(dir) {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let slot = match stem.as_str() {
            "influencers" => &mut found.influencers,
            "posts" => &mut found.posts,
            "tracking" | "tracking_data" => &mut found.tracking,
            "payouts" => &mut found.payouts,
            _ => continue,
        };
        if slot.is_none() {
            debug!("Discovered {} as {}", path.display(), stem);
            *slot = Some(path);
        }
    }

    found
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load all four tables. Fails when a slot is empty or any file is unusable.
pub fn load_dataset(files: &InputFiles) -> Result<Dataset> {
    let (Some(influencers), Some(posts), Some(tracking), Some(payouts)) = (
        files.influencers.as_deref(),
        files.posts.as_deref(),
        files.tracking.as_deref(),
        files.payouts.as_deref(),
    ) else {
        return Err(DashboardError::Config(format!(
            "missing input files: {}",
            files.missing().join(", ")
        )));
    };

    Ok(Dataset {
        influencers: load_table(influencers)?,
        posts: load_table(posts)?,
        tracking: load_table(tracking)?,
        payouts: load_table(payouts)?,
    })
}

/// Read one CSV file into typed records.
///
/// Fails with [`DashboardError::MissingColumn`] when a required header is
/// absent and [`DashboardError::InvalidValue`] when a cell cannot be coerced.
pub fn load_table<T>(path: &Path) -> Result<Vec<T>>
where
    T: TableRecord + DeserializeOwned,
{
    let file = std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();

    if let Some(column) = T::REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(DashboardError::MissingColumn {
            path: path.to_path_buf(),
            column: (*column).to_string(),
        });
    }

    let mut rows: Vec<T> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| csv_error(path, source))?;
        let row = record
            .deserialize(Some(&headers))
            .map_err(|source| deserialize_error(path, &headers, &record, source))?;
        rows.push(row);
    }

    debug!("Loaded {} {} rows from {}", rows.len(), T::TABLE, path.display());
    Ok(rows)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn csv_error(path: &Path, source: csv::Error) -> DashboardError {
    DashboardError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Turn a per-field deserialize failure into [`DashboardError::InvalidValue`]
/// naming the column and the offending cell; other failures stay CSV errors.
fn deserialize_error(
    path: &Path,
    headers: &csv::StringRecord,
    record: &csv::StringRecord,
    source: csv::Error,
) -> DashboardError {
    if let csv::ErrorKind::Deserialize { pos, err } = source.kind() {
        if let Some(idx) = err.field() {
            let idx = idx as usize;
            return DashboardError::InvalidValue {
                path: path.to_path_buf(),
                line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
                column: headers.get(idx).unwrap_or("?").to_string(),
                value: record.get(idx).unwrap_or_default().to_string(),
            };
        }
    }
    csv_error(path, source)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn write_all_four(dir: &Path) -> InputFiles {
        InputFiles {
            influencers: Some(write_csv(
                dir,
                "influencers.csv",
                "ID,name,platform,gender,follower_count\n1,A,IG,F,1000\n2,B,YouTube,M,5000\n",
            )),
            posts: Some(write_csv(
                dir,
                "posts.csv",
                "influencer_id,platform,reach,likes,comments\n1,IG,100,10,5\n",
            )),
            tracking: Some(write_csv(
                dir,
                "tracking_data.csv",
                "influencer_id,campaign,product,revenue,orders\n1,Summer,P1,3000,4\n2,Summer,P2,800,1\n",
            )),
            payouts: Some(write_csv(
                dir,
                "payouts.csv",
                "influencer_id,basis,total_payout\n1,post,1000\n2,order,400\n",
            )),
        }
    }

    // ── InputFiles ────────────────────────────────────────────────────────────

    #[test]
    fn test_input_files_missing_lists_empty_slots() {
        let files = InputFiles {
            influencers: Some(PathBuf::from("i.csv")),
            tracking: Some(PathBuf::from("t.csv")),
            ..Default::default()
        };
        assert_eq!(files.missing(), vec!["posts", "payouts"]);
        assert!(!files.is_complete());
    }

    #[test]
    fn test_input_files_fill_missing_keeps_explicit_paths() {
        let mut files = InputFiles {
            posts: Some(PathBuf::from("explicit_posts.csv")),
            ..Default::default()
        };
        files.fill_missing_from(InputFiles {
            posts: Some(PathBuf::from("found_posts.csv")),
            payouts: Some(PathBuf::from("found_payouts.csv")),
            ..Default::default()
        });
        assert_eq!(files.posts, Some(PathBuf::from("explicit_posts.csv")));
        assert_eq!(files.payouts, Some(PathBuf::from("found_payouts.csv")));
        assert!(files.influencers.is_none());
    }

    // ── discovery ─────────────────────────────────────────────────────────────

    #[test]
    fn test_find_csv_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "posts.csv", "x\n");
        write_csv(dir.path(), "notes.txt", "x\n");
        write_csv(dir.path(), "influencers.CSV", "x\n");

        let files = find_csv_files(dir.path());
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["influencers.CSV", "posts.csv"]);
    }

    #[test]
    fn test_find_csv_files_nonexistent_dir() {
        let files = find_csv_files(Path::new("/tmp/does-not-exist-roi-dashboard-xyz"));
        assert!(files.is_empty());
    }

    #[test]
    fn test_discover_input_files_by_stem() {
        let dir = TempDir::new().unwrap();
        let expected = write_all_four(dir.path());
        write_csv(dir.path(), "other.csv", "a\n1\n");

        let found = discover_input_files(dir.path());
        assert_eq!(found, expected);
        assert!(found.is_complete());
    }

    // ── load_table ────────────────────────────────────────────────────────────

    #[test]
    fn test_load_table_ignores_extra_columns() {
        let dir = TempDir::new().unwrap();
        let files = write_all_four(dir.path());

        let posts: Vec<Post> = load_table(files.posts.as_deref().unwrap()).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].influencer_id, "1");
        assert_eq!(posts[0].reach, Some(100.0));
    }

    #[test]
    fn test_load_table_optional_columns_default() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "tracking.csv",
            "influencer_id,product,revenue\n1,P1,250.5\n",
        );
        let rows: Vec<TrackingRecord> = load_table(&path).unwrap();
        assert_eq!(rows[0].revenue, Some(250.5));
        assert!(rows[0].campaign.is_none());
        assert!(rows[0].orders.is_none());
    }

    #[test]
    fn test_load_table_empty_numeric_cells_are_absent() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "posts.csv",
            "influencer_id,reach,likes,comments\n1,,10,5\n",
        );
        let rows: Vec<Post> = load_table(&path).unwrap();
        assert_eq!(rows[0].reach, None);
        assert_eq!(rows[0].likes, Some(10.0));
    }

    #[test]
    fn test_load_table_trims_cells() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "payouts.csv",
            "influencer_id , total_payout\n 3 , 120 \n",
        );
        let rows: Vec<PayoutRecord> = load_table(&path).unwrap();
        assert_eq!(rows[0].influencer_id, "3");
        assert_eq!(rows[0].total_payout, Some(120.0));
    }

    #[test]
    fn test_load_table_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "payouts.csv", "influencer_id,amount\n1,100\n");
        let err = load_table::<PayoutRecord>(&path).unwrap_err();
        match err {
            DashboardError::MissingColumn { column, .. } => assert_eq!(column, "total_payout"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_table_invalid_value_names_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "tracking.csv",
            "influencer_id,product,revenue\n1,P1,100\n2,P2,lots\n",
        );
        let err = load_table::<TrackingRecord>(&path).unwrap_err();
        match err {
            DashboardError::InvalidValue {
                column, value, line, ..
            } => {
                assert_eq!(column, "revenue");
                assert_eq!(value, "lots");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_table_empty_revenue_and_payout_are_absent() {
        let dir = TempDir::new().unwrap();
        let tracking = write_csv(
            dir.path(),
            "tracking.csv",
            "influencer_id,product,revenue\n1,P1,\n2,P2,800\n",
        );
        let rows: Vec<TrackingRecord> = load_table(&tracking).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].revenue, None);
        assert_eq!(rows[1].revenue, Some(800.0));

        let payouts = write_csv(dir.path(), "payouts.csv", "influencer_id,total_payout\n1,\n");
        let rows: Vec<PayoutRecord> = load_table(&payouts).unwrap();
        assert_eq!(rows[0].total_payout, None);
    }

    #[test]
    fn test_load_table_accepts_fractional_counts() {
        let dir = TempDir::new().unwrap();
        let influencers = write_csv(
            dir.path(),
            "influencers.csv",
            "ID,name,platform,gender,follower_count\n1,A,IG,F,1200.0\n2,B,IG,M,900\n",
        );
        let rows: Vec<Influencer> = load_table(&influencers).unwrap();
        assert_eq!(rows[0].follower_count, 1200.0);
        assert_eq!(rows[1].follower_count, 900.0);

        let tracking = write_csv(
            dir.path(),
            "tracking.csv",
            "influencer_id,product,revenue,orders\n1,P1,100,3.0\n",
        );
        let rows: Vec<TrackingRecord> = load_table(&tracking).unwrap();
        assert_eq!(rows[0].orders, Some(3.0));
    }

    #[test]
    fn test_load_table_nonexistent_file() {
        let err = load_table::<Post>(Path::new("/tmp/roi-missing-posts.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::FileRead { .. }));
    }

    // ── load_dataset ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_dataset_reads_all_four() {
        let dir = TempDir::new().unwrap();
        let files = write_all_four(dir.path());
        let dataset = load_dataset(&files).unwrap();

        assert_eq!(dataset.influencers.len(), 2);
        assert_eq!(dataset.posts.len(), 1);
        assert_eq!(dataset.tracking.len(), 2);
        assert_eq!(dataset.payouts.len(), 2);
        assert_eq!(dataset.tracking[0].campaign.as_deref(), Some("Summer"));
        assert_eq!(dataset.tracking[0].orders, Some(4.0));
    }

    #[test]
    fn test_load_dataset_incomplete_is_config_error() {
        let files = InputFiles::default();
        let err = load_dataset(&files).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }
}
