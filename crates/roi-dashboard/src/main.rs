mod bootstrap;

use anyhow::Result;
use roi_core::settings::Settings;
use roi_runtime::session::DashboardSession;
use roi_ui::app::{restore_terminal, App};
use roi_ui::report::render_report;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(
        &settings.log_level,
        settings.log_file.as_deref(),
        settings.is_interactive(),
    )?;

    tracing::info!("ROI dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("View: {}, Theme: {}", settings.view, settings.theme);

    let inputs = bootstrap::build_inputs(&settings);
    let missing = inputs.missing();
    if !missing.is_empty() {
        tracing::info!("Awaiting input files: {}", missing.join(", "));
    }

    let mut session = DashboardSession::new(inputs, bootstrap::requested_filters(&settings));
    let load_result = session.load();
    if let Err(e) = &load_result {
        tracing::error!("Failed to load input files: {e}");
    }

    match settings.view.as_str() {
        "dashboard" => {
            // A failed load is shown inside the TUI and can be retried with `r`.
            let app = App::new(&settings.theme, session);
            let handle = tokio::task::spawn_blocking(move || app.run());

            // Raw mode turns Ctrl+C into a key event, so this branch only
            // fires for signals delivered from outside the terminal.
            tokio::select! {
                result = handle => {
                    result??;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; restoring terminal");
                    restore_terminal()?;
                }
            }
        }

        "json" => {
            let state = session.state();
            println!("{}", state.to_json()?);
            load_result?;
        }

        "report" => {
            let state = session.state();
            print!("{}", render_report(&state));
            load_result?;
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
