//! In-memory collaborators shared by the pipeline integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use warledger_core::error::{NotifyError, ProviderError, StoreError};
use warledger_core::layout::CellRef;
use warledger_core::providers::{Notifier, TableInfo, TabularStore, WarDataProvider};
use warledger_core::types::{EntityId, Timestamp};
use warledger_core::war::{ParticipantSnapshot, WarSnapshot};

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn ts(secs: i64) -> Timestamp {
    Utc.timestamp_opt(secs, 0).single().unwrap()
}

/// 2024-01-02 12:00 UTC, a Tuesday.
pub fn tuesday_noon() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).single().unwrap()
}

/// 2024-01-03 12:00 UTC, the day after.
pub fn wednesday_noon() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).single().unwrap()
}

pub const THIS_WEEK: &str = "Torn Wars Data - 2024-01-02";

pub fn war(id: u64, start: i64, end: Option<i64>, a: EntityId, b: EntityId, winner: Option<EntityId>) -> WarSnapshot {
    let side = |fid: EntityId, score: i64| ParticipantSnapshot {
        id: fid,
        name: format!("Faction {fid}"),
        score,
        streak: 3,
    };
    WarSnapshot::new(
        id,
        ts(start),
        end.map(ts),
        5000,
        winner,
        vec![side(a, 100), side(b, 50)],
    )
    .unwrap()
}

pub fn text_row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

// ---------------------------------------------------------------------------
// FakeWars
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeWars {
    pub wars: Vec<WarSnapshot>,
    pub fail_main: bool,
    pub history: HashMap<EntityId, Vec<WarSnapshot>>,
    pub rate_limited: HashSet<EntityId>,
    pub broken: HashSet<EntityId>,
    pub history_calls: Mutex<Vec<EntityId>>,
}

impl FakeWars {
    pub fn with_wars(wars: Vec<WarSnapshot>) -> Self {
        Self {
            wars,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<EntityId> {
        self.history_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WarDataProvider for FakeWars {
    async fn fetch_wars(&self) -> Result<Vec<WarSnapshot>, ProviderError> {
        if self.fail_main {
            return Err(ProviderError::Transport("connection refused".into()));
        }
        Ok(self.wars.clone())
    }

    async fn fetch_entity_history(&self, entity: EntityId) -> Result<Vec<WarSnapshot>, ProviderError> {
        self.history_calls.lock().unwrap().push(entity);
        if self.rate_limited.contains(&entity) {
            return Err(ProviderError::RateLimited);
        }
        if self.broken.contains(&entity) {
            return Err(ProviderError::Malformed("truncated body".into()));
        }
        Ok(self.history.get(&entity).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

struct MemTable {
    info: TableInfo,
    cells: Vec<Vec<Value>>,
}

impl MemTable {
    fn new(info: TableInfo) -> Self {
        let cells = blank_grid(info.row_count, info.col_count);
        Self { info, cells }
    }

    fn resize(&mut self, rows: u32, cols: u32) {
        self.cells.resize_with(rows as usize, Vec::new);
        for row in &mut self.cells {
            row.resize(cols as usize, Value::Null);
        }
        self.info.row_count = rows;
        self.info.col_count = cols;
    }
}

fn blank_grid(rows: u32, cols: u32) -> Vec<Vec<Value>> {
    vec![vec![Value::Null; cols as usize]; rows as usize]
}

fn text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn trimmed(row: &[Value]) -> Vec<String> {
    let mut out: Vec<String> = row.iter().map(text).collect();
    while out.last().is_some_and(|c| c.is_empty()) {
        out.pop();
    }
    out
}

/// Grid-accurate fake: writes outside the current grid fail, deleting rows
/// shrinks the grid, every mutating call is logged.
#[derive(Default)]
pub struct MemoryStore {
    pub tables: Mutex<Vec<MemTable>>,
    pub next_id: Mutex<i64>,
    pub ops: Mutex<Vec<String>>,
    pub fail_writes: bool,
    pub fail_list: bool,
    pub fail_reads: bool,
    pub undeletable: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table with `rows` (1-based from row 1) inside a `capacity x cols` grid.
    pub fn seed(&self, title: &str, capacity: u32, cols: u32, rows: Vec<Vec<String>>) {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        let mut table = MemTable::new(TableInfo {
            id: *id,
            title: title.to_string(),
            row_count: capacity,
            col_count: cols,
        });
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                table.cells[r][c] = Value::String(cell);
            }
        }
        self.tables.lock().unwrap().push(table);
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.tables
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.info.title.clone())
            .collect()
    }

    pub fn info(&self, title: &str) -> Option<TableInfo> {
        self.tables
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.info.title == title)
            .map(|t| t.info.clone())
    }

    /// Formatted text of one row, trailing blanks trimmed.
    pub fn row(&self, title: &str, row: u32) -> Vec<String> {
        let tables = self.tables.lock().unwrap();
        let table = tables.iter().find(|t| t.info.title == title).unwrap();
        table
            .cells
            .get(row as usize - 1)
            .map(|r| trimmed(r))
            .unwrap_or_default()
    }

    /// Data rows (row 5 onwards) up to the last non-blank one.
    pub fn data_rows(&self, title: &str) -> Vec<Vec<String>> {
        let tables = self.tables.lock().unwrap();
        let table = tables.iter().find(|t| t.info.title == title).unwrap();
        let mut rows: Vec<Vec<String>> = table.cells.iter().skip(4).map(|r| trimmed(r)).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        rows
    }

    fn log(&self, op: String) {
        self.ops.lock().unwrap().push(op);
    }

    fn with_table<T>(
        &self,
        table: &TableInfo,
        f: impl FnOnce(&mut MemTable) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let found = tables
            .iter_mut()
            .find(|t| t.info.id == table.id)
            .ok_or_else(|| StoreError::TableNotFound(table.title.clone()))?;
        f(found)
    }
}

#[async_trait]
impl TabularStore for MemoryStore {
    async fn find_table(&self, name: &str) -> Result<Option<TableInfo>, StoreError> {
        Ok(self.info(name))
    }

    async fn create_table(&self, name: &str, rows: u32, cols: u32) -> Result<TableInfo, StoreError> {
        self.log(format!("create {name} {rows}x{cols}"));
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        let info = TableInfo {
            id: *id,
            title: name.to_string(),
            row_count: rows,
            col_count: cols,
        };
        self.tables.lock().unwrap().push(MemTable::new(info.clone()));
        Ok(info)
    }

    async fn read_row(&self, table: &TableInfo, row: u32) -> Result<Vec<String>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Transport("read timed out".into()));
        }
        self.with_table(table, |t| {
            Ok(t.cells
                .get(row as usize - 1)
                .map(|r| trimmed(r))
                .unwrap_or_default())
        })
    }

    async fn read_all(&self, table: &TableInfo) -> Result<Vec<Vec<String>>, StoreError> {
        self.with_table(table, |t| {
            let mut rows: Vec<Vec<String>> = t.cells.iter().map(|r| trimmed(r)).collect();
            while rows.last().is_some_and(|r| r.is_empty()) {
                rows.pop();
            }
            Ok(rows)
        })
    }

    async fn write_range(
        &self,
        table: &TableInfo,
        start: CellRef,
        end: CellRef,
        rows: Vec<Vec<Value>>,
    ) -> Result<(), StoreError> {
        self.log(format!("write {start}:{end}"));
        if self.fail_writes {
            return Err(StoreError::HttpStatus {
                status: 500,
                body: "backend error".into(),
            });
        }
        self.with_table(table, |t| {
            if end.row > t.info.row_count || end.col > t.info.col_count {
                return Err(StoreError::HttpStatus {
                    status: 400,
                    body: format!("range {start}:{end} exceeds grid"),
                });
            }
            for (r, row) in rows.into_iter().enumerate() {
                for (c, cell) in row.into_iter().enumerate() {
                    let (ri, ci) = (start.row as usize - 1 + r, start.col as usize - 1 + c);
                    t.cells[ri][ci] = cell;
                }
            }
            Ok(())
        })
    }

    async fn delete_rows(&self, table: &TableInfo, start: u32, end: u32) -> Result<(), StoreError> {
        self.log(format!("delete_rows {start}..={end}"));
        self.with_table(table, |t| {
            if end > t.info.row_count || start == 0 || start > end {
                return Err(StoreError::HttpStatus {
                    status: 400,
                    body: "invalid row range".into(),
                });
            }
            t.cells.drain(start as usize - 1..end as usize);
            t.info.row_count -= end - start + 1;
            Ok(())
        })
    }

    async fn resize(&self, table: &TableInfo, rows: u32, cols: u32) -> Result<(), StoreError> {
        self.log(format!("resize {rows}x{cols}"));
        self.with_table(table, |t| {
            t.resize(rows, cols);
            Ok(())
        })
    }

    async fn clear(&self, table: &TableInfo) -> Result<(), StoreError> {
        self.log("clear".to_string());
        self.with_table(table, |t| {
            t.cells = blank_grid(t.info.row_count, t.info.col_count);
            Ok(())
        })
    }

    async fn list_tables(&self) -> Result<Vec<TableInfo>, StoreError> {
        if self.fail_list {
            return Err(StoreError::Transport("timed out".into()));
        }
        Ok(self
            .tables
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.info.clone())
            .collect())
    }

    async fn delete_table(&self, table: &TableInfo) -> Result<(), StoreError> {
        self.log(format!("delete_table {}", table.title));
        if self.undeletable.contains(&table.title) {
            return Err(StoreError::HttpStatus {
                status: 403,
                body: "protected".into(),
            });
        }
        self.tables.lock().unwrap().retain(|t| t.info.id != table.id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.to_string());
        if self.fail {
            return Err(NotifyError::HttpStatus(500));
        }
        Ok(())
    }
}
