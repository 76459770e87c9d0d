//! `warledger-export` -- dump one sheet tab to a JSON file.
//!
//! Needs only the spreadsheet and Google credentials; `EXPORT_SHEET_NAME`
//! and `EXPORT_OUTPUT` select the tab and the destination. See
//! [`ExportConfig::from_env`](warledger_worker::ExportConfig::from_env).

use std::process::ExitCode;

use warledger_worker::{app, telemetry, ExportConfig};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    telemetry::init(telemetry::json_requested());

    let config = match ExportConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match app::export(&config).await {
        Ok(doc) => {
            tracing::info!(
                sheet = %config.sheet,
                output = %config.output.display(),
                status = ?doc.status,
                count = doc.count,
                "Export finished",
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Export failed");
            ExitCode::FAILURE
        }
    }
}
