//! Weekly table layout: fixed rows, canonical header and row synthesis.
//!
//! ```text
//! row 1   metadata (creation time)
//! row 2   metadata (anchor date)
//! row 3   blank
//! row 4   header (CANONICAL_HEADER)
//! row 5+  one row per war, newest start first
//! ```
//!
//! The header and [`synthesize_row`] must change together; the header
//! check in the provisioner treats any drift as corruption.

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::calendar::DATE_FORMAT;
use crate::types::Timestamp;
use crate::war::WarRecord;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// First metadata row.
pub const CREATED_ROW: u32 = 1;

/// Second metadata row.
pub const ANCHOR_ROW: u32 = 2;

/// Row holding the canonical header.
pub const HEADER_ROW: u32 = 4;

/// First data row.
pub const DATA_START_ROW: u32 = HEADER_ROW + 1;

/// Row capacity a freshly created (or reset) table gets.
pub const DEFAULT_CAPACITY_ROWS: u32 = 1000;

/// Exact column order of the weekly table.
pub const CANONICAL_HEADER: [&str; 22] = [
    "War ID",
    "Status",
    "Start Date",
    "End Date",
    "Duration",
    "Target Score",
    "Entity1 ID",
    "Entity1 Name",
    "Entity1 Score",
    "Entity1 Streak",
    "Entity1 Wins",
    "Entity1 Losses",
    "Entity1 WinRate",
    "Entity2 ID",
    "Entity2 Name",
    "Entity2 Score",
    "Entity2 Streak",
    "Entity2 Wins",
    "Entity2 Losses",
    "Entity2 WinRate",
    "Total Score",
    "Winner ID",
];

/// Number of columns every row carries.
pub const COLUMN_COUNT: u32 = CANONICAL_HEADER.len() as u32;

/// Rows occupied by metadata, blank separator and header.
pub const PREAMBLE_ROWS: u32 = HEADER_ROW;

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Exact comparison: same length, same order, same text.
pub fn header_matches(found: &[String]) -> bool {
    found.len() == CANONICAL_HEADER.len()
        && found
            .iter()
            .zip(CANONICAL_HEADER.iter())
            .all(|(a, b)| a == b)
}

/// The header as a single writable row.
pub fn header_row() -> Vec<Value> {
    CANONICAL_HEADER.iter().map(|h| json!(h)).collect()
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Text of metadata row 1.
pub fn created_note(now: Timestamp) -> String {
    format!("Sheet created on {} UTC", now.format("%Y-%m-%d %H:%M:%S"))
}

/// Text of metadata row 2.
pub fn anchor_note(anchor: NaiveDate) -> String {
    format!("Data represents wars as of {}", anchor.format(DATE_FORMAT))
}

/// Total rows a table needs to hold `records` data rows.
pub fn required_rows(records: usize) -> u32 {
    u32::try_from(records)
        .unwrap_or(u32::MAX)
        .saturating_add(PREAMBLE_ROWS)
}

// ---------------------------------------------------------------------------
// Row synthesis
// ---------------------------------------------------------------------------

/// Flatten one record into exactly [`COLUMN_COUNT`] cells, header order.
pub fn synthesize_row(record: &WarRecord, now: Timestamp) -> Vec<Value> {
    let [a, b] = &record.participants;
    vec![
        json!(record.id),
        json!(record.status(now).label()),
        json!(record.start.to_rfc3339()),
        json!(record.end.map(|e| e.to_rfc3339()).unwrap_or_default()),
        json!(record.duration(now)),
        json!(record.target),
        json!(a.id),
        json!(a.name),
        json!(a.score),
        json!(a.streak),
        json!(a.record.wins),
        json!(a.record.losses),
        json!(a.record.win_rate()),
        json!(b.id),
        json!(b.name),
        json!(b.score),
        json!(b.streak),
        json!(b.record.wins),
        json!(b.record.losses),
        json!(b.record.win_rate()),
        json!(record.total_score),
        record.winner.map_or_else(|| json!(""), |w| json!(w)),
    ]
}

/// Sort `records` newest-start first (stable) and flatten each one.
pub fn synthesize_rows(records: &[WarRecord], now: Timestamp) -> Vec<Vec<Value>> {
    let mut ordered: Vec<&WarRecord> = records.iter().collect();
    ordered.sort_by(|x, y| y.start.cmp(&x.start));
    ordered.iter().map(|r| synthesize_row(r, now)).collect()
}

// ---------------------------------------------------------------------------
// A1 addressing
// ---------------------------------------------------------------------------

/// A 1-based cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Render as `A1` notation; columns past `Z` continue `AA`, `AB`, ...
    pub fn to_a1(self) -> String {
        format!("{}{}", column_letters(self.col), self.row)
    }
}

impl std::fmt::Display for CellRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// Bijective base-26 column name for a 1-based column index.
pub fn column_letters(mut col: u32) -> String {
    let mut out = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        out.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
