//! Collaborator seams: war-data provider, tabular store and notifier.
//!
//! Concrete HTTP implementations live in their own crates; the
//! provisioner only ever sees these traits.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{NotifyError, ProviderError, StoreError};
use crate::layout::CellRef;
use crate::types::EntityId;
use crate::war::WarSnapshot;

/// Source of war data.
#[async_trait]
pub trait WarDataProvider: Send + Sync {
    /// All wars currently listed by the provider.
    async fn fetch_wars(&self) -> Result<Vec<WarSnapshot>, ProviderError>;

    /// Wars in which `entity` took part, used only for win/loss tallies.
    async fn fetch_entity_history(&self, entity: EntityId)
        -> Result<Vec<WarSnapshot>, ProviderError>;
}

/// Identity and grid size of one table in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    /// Store-assigned identifier.
    pub id: i64,
    pub title: String,
    pub row_count: u32,
    pub col_count: u32,
}

/// A spreadsheet-like store of named tables.
///
/// Rows and columns are 1-based. Row ranges are inclusive.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// `Ok(None)` when no table has that exact name.
    async fn find_table(&self, name: &str) -> Result<Option<TableInfo>, StoreError>;

    async fn create_table(&self, name: &str, rows: u32, cols: u32)
        -> Result<TableInfo, StoreError>;

    /// Formatted cell texts of one row, trailing blanks trimmed.
    async fn read_row(&self, table: &TableInfo, row: u32) -> Result<Vec<String>, StoreError>;

    /// Every non-empty row, formatted, from row 1 down.
    async fn read_all(&self, table: &TableInfo) -> Result<Vec<Vec<String>>, StoreError>;

    async fn write_range(
        &self,
        table: &TableInfo,
        start: CellRef,
        end: CellRef,
        rows: Vec<Vec<Value>>,
    ) -> Result<(), StoreError>;

    /// Remove rows `start..=end`; rows below shift up and capacity shrinks.
    async fn delete_rows(&self, table: &TableInfo, start: u32, end: u32) -> Result<(), StoreError>;

    async fn resize(&self, table: &TableInfo, rows: u32, cols: u32) -> Result<(), StoreError>;

    /// Erase all cell contents, keeping the grid size.
    async fn clear(&self, table: &TableInfo) -> Result<(), StoreError>;

    async fn list_tables(&self) -> Result<Vec<TableInfo>, StoreError>;

    async fn delete_table(&self, table: &TableInfo) -> Result<(), StoreError>;
}

/// Best-effort text message sink.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<(), NotifyError>;
}
