//! Wiring of the concrete collaborators for the two binaries.

use anyhow::Context;
use chrono::Utc;

use warledger_core::providers::Notifier;
use warledger_notify::WebhookNotifier;
use warledger_pipeline::export::{self, ExportDocument};
use warledger_pipeline::{RunSummary, WeeklyProvisioner};
use warledger_sheets::{ServiceAccountKey, SheetsClient};
use warledger_torn::TornClient;

use crate::config::{ExportConfig, SheetsConfig, WorkerConfig};

/// Load credentials and confirm they are accepted before any other work.
pub async fn connect_sheets(config: &SheetsConfig) -> anyhow::Result<SheetsClient> {
    let key = ServiceAccountKey::resolve(
        config.credentials_path.as_deref(),
        config.credentials_json.as_deref(),
    )
    .context("Failed to load Google service account credentials")?;

    let sheets = SheetsClient::new(key, config.spreadsheet_id.clone(), config.request_timeout)
        .context("Failed to build Sheets client")?;
    sheets
        .authenticate()
        .await
        .context("Failed to authenticate with Google")?;
    Ok(sheets)
}

/// One weekly provisioning run against the live services.
pub async fn provision(config: &WorkerConfig) -> anyhow::Result<RunSummary> {
    let sheets = connect_sheets(&config.sheets).await?;
    let torn = TornClient::new(
        config.torn_base_url.clone(),
        config.torn_api_key.clone(),
        config.sheets.request_timeout,
    )
    .context("Failed to build Torn client")?;

    let webhook = match (&config.webhook_url, config.notify()) {
        (Some(url), true) => Some(
            WebhookNotifier::new(url.clone()).context("Failed to build webhook notifier")?,
        ),
        _ => None,
    };
    let notifier = webhook.as_ref().map(|w| w as &dyn Notifier);

    let provisioner =
        WeeklyProvisioner::new(&torn, &sheets, notifier, config.provisioner_settings());
    let summary = provisioner
        .run(Utc::now())
        .await
        .context("Weekly provisioning failed")?;
    Ok(summary)
}

/// Export the configured table and write it to the configured path.
pub async fn export(config: &ExportConfig) -> anyhow::Result<ExportDocument> {
    let sheets = connect_sheets(&config.sheets).await?;
    let doc = export::export_table(
        &sheets,
        &config.sheet,
        &config.sheets.spreadsheet_id,
        Utc::now(),
    )
    .await
    .with_context(|| format!("Failed to export '{}'", config.sheet))?;

    export::write_export(&config.output, &doc)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    Ok(doc)
}
