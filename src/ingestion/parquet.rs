//! Parquet ingestion implementation.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{VehicleDataSet, VehicleRecord};

use super::columns::{Cell, Column, ColumnKind, build_record};

/// Ingest a Parquet file whose leaf columns use the registration headers (see [`Column`]).
///
/// Notes:
/// - Validates that every required column exists as a Parquet leaf column (by column path string)
/// - Integer columns accept any integer physical type; text columns accept UTF-8 strings and
///   integers (rendered as text)
/// - Uses the Parquet record API (`RowIter`)
pub fn ingest_parquet_from_path(path: impl AsRef<Path>) -> IngestionResult<VehicleDataSet> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;

    let available_columns = parquet_leaf_column_paths(&reader);
    for column in Column::ALL {
        if column.is_required() && !available_columns.contains(column.header()) {
            return Err(IngestionError::SchemaMismatch {
                message: format!("missing required column '{}'", column.header()),
            });
        }
    }

    let mut records: Vec<VehicleRecord> = Vec::new();
    for (idx0, row_res) in reader.into_iter().enumerate() {
        let row_num = idx0 + 1;
        let row = row_res?;

        // Build a name->Field map for lookup.
        let mut map: HashMap<&str, &Field> = HashMap::new();
        for (name, field) in row.get_column_iter() {
            map.insert(name.as_str(), field);
        }

        let mut cells: Vec<Cell> = Vec::with_capacity(Column::ALL.len());
        for column in Column::ALL {
            let cell = match map.get(column.header()) {
                Some(field) => convert_parquet_field(row_num, column, field)?,
                None => Cell::Null,
            };
            cells.push(cell);
        }
        records.push(build_record(row_num, idx0, &cells)?);
    }

    Ok(VehicleDataSet::new(records))
}

fn parquet_leaf_column_paths<R: ChunkReader + 'static>(
    reader: &SerializedFileReader<R>,
) -> HashSet<String> {
    reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.path().string())
        .collect()
}

fn convert_parquet_field(row: usize, column: Column, f: &Field) -> IngestionResult<Cell> {
    let unsupported = |expected: &str| IngestionError::ParseError {
        row,
        column: column.header().to_string(),
        raw: f.to_string(),
        message: format!("expected {expected}"),
    };

    match f {
        Field::Null => Ok(Cell::Null),
        Field::Str(s) => Ok(Cell::from_text(s)),
        Field::Byte(v) => Ok(Cell::Int64(i64::from(*v))),
        Field::Short(v) => Ok(Cell::Int64(i64::from(*v))),
        Field::Int(v) => Ok(Cell::Int64(i64::from(*v))),
        Field::Long(v) => Ok(Cell::Int64(*v)),
        Field::UByte(v) => Ok(Cell::Int64(i64::from(*v))),
        Field::UShort(v) => Ok(Cell::Int64(i64::from(*v))),
        Field::UInt(v) => Ok(Cell::Int64(i64::from(*v))),
        Field::ULong(v) => i64::try_from(*v)
            .map(Cell::Int64)
            .map_err(|_| unsupported("integer within i64 range")),
        _ => Err(unsupported(match column.kind() {
            ColumnKind::Integer => "integer",
            ColumnKind::Text => "string",
        })),
    }
}
