//! The weekly table provisioner.
//!
//! One run moves the current week's table through exactly one of:
//!
//! ```text
//! absent                     -> created + headered   -> rows replaced
//! present, header valid      ->                         rows replaced
//! present, header invalid    -> full reset           -> rows replaced
//!   (or unreadable)
//! ```
//!
//! then prunes old weekly tables and, on the anchor day, sends a notice.
//! Everything is strictly sequential; the store has no transactions and
//! concurrent runs against one spreadsheet are not supported.

use std::time::Duration;

use chrono::Weekday;
use serde_json::Value;

use warledger_core::calendar::{self, DEFAULT_ANCHOR_WEEKDAY};
use warledger_core::layout::{
    self, CellRef, ANCHOR_ROW, COLUMN_COUNT, CREATED_ROW, DATA_START_ROW, DEFAULT_CAPACITY_ROWS,
    HEADER_ROW,
};
use warledger_core::providers::{Notifier, TableInfo, TabularStore, WarDataProvider};
use warledger_core::retention::DEFAULT_KEEP;
use warledger_core::types::Timestamp;
use warledger_core::war::WarRecord;

use crate::error::ProvisionError;
use crate::history::{HistoryTally, DEFAULT_HISTORY_DELAY};
use crate::notice;
use crate::retention::{self, RetentionReport};

/// Table name prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "Torn Wars Data";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ProvisionerSettings {
    /// Weekly tables are named `"{prefix} - {YYYY-MM-DD}"`.
    pub prefix: String,
    pub anchor: Weekday,
    /// Weekly tables kept by retention.
    pub keep: usize,
    /// Row capacity for created and reset tables.
    pub capacity_rows: u32,
    /// Pause before each per-entity history request.
    pub history_delay: Duration,
    pub notify: bool,
}

impl Default for ProvisionerSettings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            anchor: DEFAULT_ANCHOR_WEEKDAY,
            keep: DEFAULT_KEEP,
            capacity_rows: DEFAULT_CAPACITY_ROWS,
            history_delay: DEFAULT_HISTORY_DELAY,
            notify: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// How this week's table was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    Created,
    Valid,
    Reset,
}

/// A resolved weekly table and the path that produced it.
#[derive(Debug, Clone)]
pub struct ResolvedTable {
    pub table: TableInfo,
    pub state: TableState,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub table: String,
    pub state: TableState,
    pub records: usize,
    pub entities: usize,
    pub retention: RetentionReport,
    pub notified: bool,
}

// ---------------------------------------------------------------------------
// WeeklyProvisioner
// ---------------------------------------------------------------------------

/// Dependencies are borrowed for one run and never shared across runs.
pub struct WeeklyProvisioner<'a> {
    wars: &'a dyn WarDataProvider,
    store: &'a dyn TabularStore,
    notifier: Option<&'a dyn Notifier>,
    settings: ProvisionerSettings,
}

impl<'a> WeeklyProvisioner<'a> {
    pub fn new(
        wars: &'a dyn WarDataProvider,
        store: &'a dyn TabularStore,
        notifier: Option<&'a dyn Notifier>,
        settings: ProvisionerSettings,
    ) -> Self {
        Self {
            wars,
            store,
            notifier,
            settings,
        }
    }

    pub fn settings(&self) -> &ProvisionerSettings {
        &self.settings
    }

    /// Name of the table for the week containing `now`.
    pub fn table_name(&self, now: Timestamp) -> String {
        calendar::weekly_table_name(&self.settings.prefix, now, self.settings.anchor)
    }

    /// Full run: collect, resolve, write, prune, notify.
    pub async fn run(&self, now: Timestamp) -> Result<RunSummary, ProvisionError> {
        tracing::info!("Starting weekly war ledger update");

        let (records, entities) = self.collect_records().await?;
        let mut resolved = self.resolve_table(now).await?;
        self.write_records(&mut resolved, &records, now).await?;

        let retention =
            retention::prune_old_tables(self.store, &self.settings.prefix, self.settings.keep)
                .await;
        let notified = self.notify(&resolved.table.title, &records, now).await;

        tracing::info!(
            table = %resolved.table.title,
            records = records.len(),
            "Weekly war ledger update completed"
        );

        Ok(RunSummary {
            table: resolved.table.title,
            state: resolved.state,
            records: records.len(),
            entities,
            retention,
            notified,
        })
    }

    /// Fetch all wars and attach each participant's historical tally.
    ///
    /// Returns the records and the number of distinct entities seen.
    pub async fn collect_records(&self) -> Result<(Vec<WarRecord>, usize), ProvisionError> {
        let wars = self.wars.fetch_wars().await?;
        let mut tally = HistoryTally::new(self.wars, self.settings.history_delay);
        let records = tally.enrich(&wars).await;
        tracing::info!(
            wars = records.len(),
            entities = tally.entities_seen(),
            "Collected war records"
        );
        Ok((records, tally.entities_seen()))
    }

    /// Locate or create this week's table and make sure its header is canonical.
    pub async fn resolve_table(&self, now: Timestamp) -> Result<ResolvedTable, ProvisionError> {
        let name = self.table_name(now);

        let Some(table) = self.store.find_table(&name).await? else {
            let table = self
                .store
                .create_table(&name, self.settings.capacity_rows, COLUMN_COUNT)
                .await?;
            self.write_preamble(&table, now).await?;
            tracing::info!(table = %name, "Created weekly table");
            return Ok(ResolvedTable {
                table,
                state: TableState::Created,
            });
        };

        match self.store.read_row(&table, HEADER_ROW).await {
            Ok(header) if layout::header_matches(&header) => {
                tracing::info!(table = %name, "Weekly table structure is up to date");
                return Ok(ResolvedTable {
                    table,
                    state: TableState::Valid,
                });
            }
            Ok(header) => tracing::warn!(
                table = %name,
                found_columns = header.len(),
                "Header drift detected, resetting weekly table"
            ),
            Err(e) => tracing::warn!(
                table = %name,
                error = %e,
                "Failed to read header, resetting weekly table"
            ),
        }

        let table = self.reset_table(table, now).await?;
        Ok(ResolvedTable {
            table,
            state: TableState::Reset,
        })
    }

    /// Destructive repair: wipe contents, rewrite preamble, restore capacity.
    pub async fn reset_table(&self, mut table: TableInfo, now: Timestamp) -> Result<TableInfo, ProvisionError> {
        self.store.clear(&table).await?;
        self.write_preamble(&table, now).await?;
        self.store
            .resize(&table, self.settings.capacity_rows, COLUMN_COUNT)
            .await?;
        table.row_count = self.settings.capacity_rows;
        table.col_count = COLUMN_COUNT;
        Ok(table)
    }

    /// Replace every data row with `records`, newest start first.
    ///
    /// Row capacity only ever grows: the table ends at least as large as
    /// it started and at least large enough for the preamble plus rows.
    /// Created and reset tables hold no data rows, so nothing is deleted.
    pub async fn write_records(
        &self,
        resolved: &mut ResolvedTable,
        records: &[WarRecord],
        now: Timestamp,
    ) -> Result<(), ProvisionError> {
        let table = &mut resolved.table;
        let required = layout::required_rows(records.len());
        let target_rows = table.row_count.max(required);

        if resolved.state == TableState::Valid && table.row_count >= DATA_START_ROW {
            self.store
                .delete_rows(table, DATA_START_ROW, table.row_count)
                .await?;
            table.row_count = HEADER_ROW;
        }

        if table.row_count != target_rows || table.col_count != COLUMN_COUNT {
            self.store.resize(table, target_rows, COLUMN_COUNT).await?;
            table.row_count = target_rows;
            table.col_count = COLUMN_COUNT;
        }

        if records.is_empty() {
            tracing::info!(table = %table.title, "No wars to write");
            return Ok(());
        }

        let rows = layout::synthesize_rows(records, now);
        let start = CellRef::new(DATA_START_ROW, 1);
        let end = CellRef::new(HEADER_ROW + rows.len() as u32, COLUMN_COUNT);
        self.store.write_range(table, start, end, rows).await?;

        tracing::info!(
            table = %table.title,
            rows = records.len(),
            capacity = table.row_count,
            "Wrote war rows"
        );
        Ok(())
    }

    /// Send the publication notice when enabled and today is the anchor day.
    pub async fn notify(&self, table: &str, records: &[WarRecord], now: Timestamp) -> bool {
        if !self.settings.notify {
            return false;
        }
        let Some(notifier) = self.notifier else {
            return false;
        };
        if !calendar::is_anchor_day(now, self.settings.anchor) {
            tracing::debug!("Not the anchor day, skipping notification");
            return false;
        }
        let message = notice::format_notice(table, records, now);
        notice::deliver(notifier, &message).await
    }

    // ---- private helpers ----

    /// Metadata rows 1-2 and the header at row 4; row 3 stays blank.
    async fn write_preamble(&self, table: &TableInfo, now: Timestamp) -> Result<(), ProvisionError> {
        let anchor = calendar::anchor_date(now, self.settings.anchor);
        let notes = vec![
            vec![Value::from(layout::created_note(now))],
            vec![Value::from(layout::anchor_note(anchor))],
        ];
        self.store
            .write_range(
                table,
                CellRef::new(CREATED_ROW, 1),
                CellRef::new(ANCHOR_ROW, 1),
                notes,
            )
            .await?;
        self.store
            .write_range(
                table,
                CellRef::new(HEADER_ROW, 1),
                CellRef::new(HEADER_ROW, COLUMN_COUNT),
                vec![layout::header_row()],
            )
            .await?;
        Ok(())
    }
}
