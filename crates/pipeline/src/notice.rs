//! Publication notice sent when this week's table is refreshed.

use std::collections::HashSet;

use warledger_core::providers::Notifier;
use warledger_core::types::Timestamp;
use warledger_core::war::WarRecord;

/// Distinct entities appearing on either side of any record.
pub fn distinct_entities(records: &[WarRecord]) -> usize {
    records
        .iter()
        .flat_map(|r| r.participants.iter().map(|p| p.id))
        .collect::<HashSet<_>>()
        .len()
}

/// Fixed notice template.
pub fn format_notice(table: &str, records: &[WarRecord], now: Timestamp) -> String {
    format!(
        "📊 New war ledger published: {table}\nWars: {}\nFactions: {}\nUpdated: {} UTC",
        records.len(),
        distinct_entities(records),
        now.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// Send `message`; a failure is logged and reported as `false`.
pub async fn deliver(notifier: &dyn Notifier, message: &str) -> bool {
    match notifier.send(message).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to deliver notification");
            false
        }
    }
}
