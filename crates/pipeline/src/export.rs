//! Export one table to a JSON document.
//!
//! Row 1 of the table is the header; every later non-blank row becomes an
//! object keyed by header text. Numeric-looking cells are emitted as JSON
//! numbers, everything else as strings.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use warledger_core::providers::TabularStore;
use warledger_core::types::Timestamp;

use crate::error::ExportError;

/// Table exported when none is configured.
pub const DEFAULT_EXPORT_TABLE: &str = "Random Wars Sample";

/// Output path used when none is configured.
pub const DEFAULT_EXPORT_PATH: &str = "Data/random_wars_sample.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    Success,
    Empty,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    pub total_wars: usize,
    pub export_timestamp: String,
    pub sheet_name: String,
    pub spreadsheet_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    pub data: Vec<Map<String, Value>>,
    pub count: usize,
    pub exported_at: String,
    pub source: String,
    pub status: ExportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExportMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportDocument {
    fn without_data(source: &str, now: Timestamp, status: ExportStatus) -> Self {
        Self {
            data: Vec::new(),
            count: 0,
            exported_at: now.to_rfc3339(),
            source: source.to_string(),
            status,
            metadata: None,
            error: None,
        }
    }
}

/// Read `table_name` and build its export document.
///
/// A missing table is an error; a failed read yields an `error` document.
pub async fn export_table(
    store: &dyn TabularStore,
    table_name: &str,
    spreadsheet_id: &str,
    now: Timestamp,
) -> Result<ExportDocument, ExportError> {
    let table = store
        .find_table(table_name)
        .await?
        .ok_or_else(|| ExportError::TableNotFound(table_name.to_string()))?;
    tracing::info!(table = %table_name, "Found table to export");

    let rows = match store.read_all(&table).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(table = %table_name, error = %e, "Failed to read table for export");
            let mut doc = ExportDocument::without_data(table_name, now, ExportStatus::Error);
            doc.error = Some(e.to_string());
            return Ok(doc);
        }
    };

    let data = rows_to_records(rows);
    if data.is_empty() {
        tracing::warn!(table = %table_name, "No data found in table");
        return Ok(ExportDocument::without_data(table_name, now, ExportStatus::Empty));
    }

    tracing::info!(table = %table_name, count = data.len(), "Exported table rows");
    let stamp = now.to_rfc3339();
    Ok(ExportDocument {
        count: data.len(),
        exported_at: stamp.clone(),
        source: table_name.to_string(),
        status: ExportStatus::Success,
        metadata: Some(ExportMetadata {
            total_wars: data.len(),
            export_timestamp: stamp,
            sheet_name: table_name.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
        }),
        error: None,
        data,
    })
}

/// Header-keyed objects for every row after the first.
pub fn rows_to_records(rows: Vec<Vec<String>>) -> Vec<Map<String, Value>> {
    let mut iter = rows.into_iter();
    let Some(header) = iter.next() else {
        return Vec::new();
    };

    iter.filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .map(|row| {
            header
                .iter()
                .enumerate()
                .map(|(i, key)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    (key.clone(), cell_value(cell))
                })
                .collect()
        })
        .collect()
}

/// Integers and finite floats become numbers; anything else stays text.
pub fn cell_value(cell: &str) -> Value {
    if let Ok(i) = cell.parse::<i64>() {
        return Value::from(i);
    }
    if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
        if cell.chars().any(|c| c.is_ascii_digit()) {
            return Value::Number(n);
        }
    }
    Value::String(cell.to_string())
}

/// Write `doc` as pretty JSON, creating parent directories.
pub fn write_export(path: &Path, doc: &ExportDocument) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "Export saved");
    Ok(())
}
