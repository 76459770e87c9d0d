//! Best-effort pruning of old weekly tables.

use warledger_core::providers::TabularStore;
use warledger_core::retention::plan_retention;

/// What a pruning pass did. Never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionReport {
    /// Weekly tables within the keep window, newest first.
    pub kept: Vec<String>,
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
}

/// Keep the newest `keep` tables named `prefix...`, delete the rest.
///
/// Listing and deletion failures are logged and swallowed.
pub async fn prune_old_tables(store: &dyn TabularStore, prefix: &str, keep: usize) -> RetentionReport {
    let mut report = RetentionReport::default();

    let tables = match store.list_tables().await {
        Ok(tables) => tables,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list tables for cleanup");
            return report;
        }
    };

    let names: Vec<&str> = tables.iter().map(|t| t.title.as_str()).collect();
    let plan = plan_retention(&names, prefix, keep);
    report.kept = plan.kept;
    let doomed = plan.doomed;
    if doomed.is_empty() {
        tracing::info!(keep, "No weekly table cleanup needed");
        return report;
    }

    for name in doomed {
        let Some(table) = tables.iter().find(|t| t.title == name) else {
            continue;
        };
        tracing::info!(table = %name, "Deleting old weekly table");
        match store.delete_table(table).await {
            Ok(()) => report.deleted.push(name),
            Err(e) => {
                tracing::error!(table = %name, error = %e, "Failed to delete old weekly table");
                report.failed.push(name);
            }
        }
    }

    tracing::info!(
        deleted = report.deleted.len(),
        failed = report.failed.len(),
        "Cleaned up old weekly tables"
    );
    report
}
