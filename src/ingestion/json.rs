//! JSON ingestion implementation.
//!
//! Records use the dashboard's camelCase shape (see [`VehicleRecord`]). Supported inputs:
//! - A JSON array of record objects: `[{"id":"EV000000",...}, ...]`
//! - A single record object
//! - Newline-delimited JSON (NDJSON), one record object per line

use std::fs;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{VehicleDataSet, VehicleRecord};

/// Ingest a JSON/NDJSON file of records.
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> IngestionResult<VehicleDataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Ingest JSON from an in-memory string.
pub fn ingest_json_from_str(input: &str) -> IngestionResult<VehicleDataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => ingest_json_values(items),
            serde_json::Value::Object(_) => ingest_json_values(vec![v]),
            _ => Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line)
                .map_err(|source| IngestionError::Json { row: i + 1, source })?;
            values.push(v);
        }
        ingest_json_values(values)
    }
}

fn ingest_json_values(values: Vec<serde_json::Value>) -> IngestionResult<VehicleDataSet> {
    let mut records: Vec<VehicleRecord> = Vec::with_capacity(values.len());

    for (idx0, v) in values.into_iter().enumerate() {
        let row_num = idx0 + 1;
        if !v.is_object() {
            return Err(IngestionError::SchemaMismatch {
                message: format!("row {row_num} is not a json object"),
            });
        }
        let record = serde_json::from_value::<VehicleRecord>(v)
            .map_err(|source| IngestionError::Json { row: row_num, source })?;
        records.push(record);
    }

    Ok(VehicleDataSet::new(records))
}
