//! Sheets v4 request bodies and response shapes.
//!
//! Builders return plain [`serde_json::Value`]s so they can be asserted
//! on directly; responses deserialize into the small structs below.

use serde::Deserialize;
use serde_json::{json, Value};

use warledger_core::providers::TableInfo;

/// Field mask limiting spreadsheet metadata to sheet properties.
pub const SHEET_PROPERTIES_FIELDS: &str =
    "sheets.properties(sheetId,title,gridProperties(rowCount,columnCount))";

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SpreadsheetMeta {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
pub struct Sheet {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    pub title: String,
    #[serde(default)]
    pub grid_properties: GridProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    #[serde(default)]
    pub row_count: u32,
    #[serde(default)]
    pub column_count: u32,
}

impl From<SheetProperties> for TableInfo {
    fn from(p: SheetProperties) -> Self {
        TableInfo {
            id: p.sheet_id,
            title: p.title,
            row_count: p.grid_properties.row_count,
            col_count: p.grid_properties.column_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchUpdateResponse {
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub add_sheet: Option<AddSheetReply>,
}

#[derive(Debug, Deserialize)]
pub struct AddSheetReply {
    pub properties: SheetProperties,
}

/// Body of `values.get`; `values` is omitted when the range is empty.
#[derive(Debug, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    /// Cells rendered as text, as the Sheets UI shows them.
    pub fn into_text_rows(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect()
    }
}

/// Text form of one formatted cell.
pub fn cell_text(v: Value) -> String {
    match v {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// Quote a sheet title for A1 notation (`'It''s here'`).
pub fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// `'Title'!A1:V4`
pub fn range(title: &str, a1: &str) -> String {
    format!("{}!{}", quote_title(title), a1)
}

// ---------------------------------------------------------------------------
// batchUpdate requests
// ---------------------------------------------------------------------------

pub fn add_sheet(title: &str, rows: u32, cols: u32) -> Value {
    json!({
        "addSheet": {
            "properties": {
                "title": title,
                "gridProperties": { "rowCount": rows, "columnCount": cols }
            }
        }
    })
}

pub fn delete_sheet(sheet_id: i64) -> Value {
    json!({ "deleteSheet": { "sheetId": sheet_id } })
}

/// Delete 1-based inclusive rows `start..=end`.
pub fn delete_rows(sheet_id: i64, start: u32, end: u32) -> Value {
    json!({
        "deleteDimension": {
            "range": {
                "sheetId": sheet_id,
                "dimension": "ROWS",
                "startIndex": start.saturating_sub(1),
                "endIndex": end
            }
        }
    })
}

pub fn resize(sheet_id: i64, rows: u32, cols: u32) -> Value {
    json!({
        "updateSheetProperties": {
            "properties": {
                "sheetId": sheet_id,
                "gridProperties": { "rowCount": rows, "columnCount": cols }
            },
            "fields": "gridProperties(rowCount,columnCount)"
        }
    })
}

/// Body of a `values.update` call.
pub fn value_range(range: &str, rows: Vec<Vec<Value>>) -> Value {
    json!({
        "range": range,
        "majorDimension": "ROWS",
        "values": rows
    })
}
