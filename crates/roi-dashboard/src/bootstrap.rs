use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use roi_core::settings::Settings;
use roi_data::reader::{discover_input_files, InputFiles};
use roi_runtime::session::RequestedFilters;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI level name to an [`EnvFilter`] directive. Unknown names fall
/// through unchanged and are validated by `EnvFilter::try_new`.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With a `log_file` every event goes to that file without ANSI colours.
/// Without one, interactive mode discards output so log lines never land on
/// top of the alternate screen; the other views log to stderr.
pub fn setup_logging(
    log_level: &str,
    log_file: Option<&Path>,
    interactive: bool,
) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
        }
        None if interactive => {
            registry
                .with(fmt::layer().with_writer(std::io::sink))
                .try_init()?;
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

// ── Input resolution ───────────────────────────────────────────────────────────

/// Explicit `--influencers` / `--posts` / `--tracking` / `--payouts` paths,
/// with any gaps filled from `--data-dir`.
pub fn build_inputs(settings: &Settings) -> InputFiles {
    let mut inputs = InputFiles {
        influencers: settings.influencers.clone(),
        posts: settings.posts.clone(),
        tracking: settings.tracking.clone(),
        payouts: settings.payouts.clone(),
    };
    if let Some(dir) = &settings.data_dir {
        if !inputs.is_complete() {
            inputs.fill_missing_from(discover_input_files(dir));
        }
    }
    inputs
}

/// Initial filter selection requested on the command line.
pub fn requested_filters(settings: &Settings) -> RequestedFilters {
    RequestedFilters {
        platforms: settings.platform.clone(),
        products: settings.product.clone(),
        genders: settings.gender.clone(),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_level_directive_mapping() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("TRACE"), "trace");
    }

    #[test]
    fn test_build_inputs_explicit_only() {
        let settings = Settings::parse_from(["roi-dashboard", "--posts", "/tmp/p.csv"]);
        let inputs = build_inputs(&settings);
        assert_eq!(inputs.posts, Some(PathBuf::from("/tmp/p.csv")));
        assert_eq!(inputs.missing(), vec!["influencers", "tracking", "payouts"]);
    }

    #[test]
    fn test_build_inputs_fills_from_data_dir() {
        let tmp = TempDir::new().expect("tempdir");
        for name in ["influencers.csv", "posts.csv", "tracking.csv", "payouts.csv"] {
            fs::write(tmp.path().join(name), "influencer_id\n").expect("write");
        }
        let settings = Settings::parse_from([
            "roi-dashboard".to_string(),
            "--posts".to_string(),
            "/elsewhere/posts.csv".to_string(),
            "--data-dir".to_string(),
            tmp.path().to_string_lossy().to_string(),
        ]);

        let inputs = build_inputs(&settings);
        assert!(inputs.is_complete());
        // Explicit paths win over discovered ones.
        assert_eq!(inputs.posts, Some(PathBuf::from("/elsewhere/posts.csv")));
        assert_eq!(inputs.payouts, Some(tmp.path().join("payouts.csv")));
    }

    #[test]
    fn test_requested_filters_copied_from_settings() {
        let settings = Settings::parse_from([
            "roi-dashboard",
            "--platform",
            "Instagram,YouTube",
            "--gender",
            "F",
        ]);
        let requested = requested_filters(&settings);
        assert_eq!(
            requested.platforms,
            Some(vec!["Instagram".to_string(), "YouTube".to_string()])
        );
        assert!(requested.products.is_none());
        assert_eq!(requested.genders, Some(vec!["F".to_string()]));
    }
}
