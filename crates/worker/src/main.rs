//! `warledger-worker` -- weekly ranked-war ledger run.
//!
//! Fetches every ranked war from Torn, tallies each faction's history,
//! rewrites this week's sheet tab, prunes old tabs and, on the anchor
//! day, posts a notice to Discord. Intended to be run from a scheduler;
//! one invocation is one run.
//!
//! Configuration is read from the environment (and `.env`); see
//! [`WorkerConfig::from_env`](warledger_worker::WorkerConfig::from_env).
//! Exits `1` on any fatal error.

use std::process::ExitCode;

use warledger_worker::{app, telemetry, WorkerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    telemetry::init(telemetry::json_requested());

    let config = match WorkerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        spreadsheet = %config.sheets.spreadsheet_id,
        prefix = %config.prefix,
        anchor = %config.anchor,
        keep_weeks = config.keep_weeks,
        notify = config.notify(),
        "Starting warledger-worker",
    );

    match app::provision(&config).await {
        Ok(summary) => {
            tracing::info!(
                table = %summary.table,
                state = ?summary.state,
                records = summary.records,
                factions = summary.entities,
                pruned = summary.retention.deleted.len(),
                notified = summary.notified,
                "Run finished",
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Run failed");
            ExitCode::FAILURE
        }
    }
}
