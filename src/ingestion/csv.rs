//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{VehicleDataSet, VehicleRecord};

use super::columns::{Cell, Column, build_record};

/// Ingest a registration CSV file (the published DOL export layout).
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain every required [`Column`] (order can differ); optional columns may be
///   absent.
/// - Each value is converted according to its column's kind; empty numeric cells read as `0`.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<VehicleDataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> IngestionResult<VehicleDataSet> {
    let headers = rdr.headers()?.clone();

    // Map columns -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs: Vec<Option<usize>> = Vec::with_capacity(Column::ALL.len());
    for column in Column::ALL {
        let idx = headers.iter().position(|h| h.trim() == column.header());
        if idx.is_none() && column.is_required() {
            return Err(IngestionError::SchemaMismatch {
                message: format!(
                    "missing required column '{}'. headers={:?}",
                    column.header(),
                    headers.iter().collect::<Vec<_>>(),
                ),
            });
        }
        col_idxs.push(idx);
    }

    let mut records: Vec<VehicleRecord> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let cells: Vec<Cell> = col_idxs
            .iter()
            .map(|idx| match idx {
                Some(i) => Cell::from_text(record.get(*i).unwrap_or("")),
                None => Cell::Null,
            })
            .collect();
        records.push(build_record(user_row, row_idx0, &cells)?);
    }

    Ok(VehicleDataSet::new(records))
}
