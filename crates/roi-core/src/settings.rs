use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Influencer campaign ROI dashboard
#[derive(Parser, Debug, Clone)]
#[command(
    name = "roi-dashboard",
    about = "Influencer campaign performance dashboard over four CSV files",
    version
)]
pub struct Settings {
    /// Influencer profiles CSV (ID, name, platform, gender, follower_count)
    #[arg(long)]
    pub influencers: Option<PathBuf>,

    /// Posts CSV (influencer_id, reach, likes, comments)
    #[arg(long)]
    pub posts: Option<PathBuf>,

    /// Tracking CSV (influencer_id, product, revenue)
    #[arg(long)]
    pub tracking: Option<PathBuf>,

    /// Payouts CSV (influencer_id, total_payout)
    #[arg(long)]
    pub payouts: Option<PathBuf>,

    /// Directory searched for any of the four files not given explicitly
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Platforms to include (comma separated, default: all observed)
    #[arg(long, value_delimiter = ',')]
    pub platform: Option<Vec<String>>,

    /// Products to include (comma separated, default: all observed)
    #[arg(long, value_delimiter = ',')]
    pub product: Option<Vec<String>>,

    /// Genders to include (comma separated, default: all observed)
    #[arg(long, value_delimiter = ',')]
    pub gender: Option<Vec<String>>,

    /// Output view
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "report", "json"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Self {
        Self::resolve(Settings::parse_from(args))
    }

    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// `true` when the interactive terminal dashboard was requested.
    pub fn is_interactive(&self) -> bool {
        self.view == "dashboard"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
