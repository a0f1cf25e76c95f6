//! Column layout of the Electric Vehicle Population dataset and cell → record conversion.
//!
//! Tabular formats (CSV, Parquet) read each row into one [`Cell`] per [`Column`], in
//! [`Column::ALL`] order, and hand the cells to [`build_record`].

use crate::error::{IngestionError, IngestionResult};
use crate::types::{CafvEligibility, EvType, VehicleRecord};

/// Logical type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// UTF-8 text; integers are accepted and rendered as text.
    Text,
    /// 64-bit signed integer; text is accepted if it parses.
    Integer,
}

/// A column of the registration dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Vin,
    County,
    City,
    State,
    PostalCode,
    ModelYear,
    Make,
    Model,
    EvType,
    CafvEligibility,
    ElectricRange,
    BaseMsrp,
    LegislativeDistrict,
    DolVehicleId,
    VehicleLocation,
    ElectricUtility,
    CensusTract,
}

impl Column {
    /// Every column, in cell order.
    pub const ALL: [Self; 18] = [
        Self::Id,
        Self::Vin,
        Self::County,
        Self::City,
        Self::State,
        Self::PostalCode,
        Self::ModelYear,
        Self::Make,
        Self::Model,
        Self::EvType,
        Self::CafvEligibility,
        Self::ElectricRange,
        Self::BaseMsrp,
        Self::LegislativeDistrict,
        Self::DolVehicleId,
        Self::VehicleLocation,
        Self::ElectricUtility,
        Self::CensusTract,
    ];

    /// Header / leaf column name as published.
    pub fn header(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Vin => "VIN (1-10)",
            Self::County => "County",
            Self::City => "City",
            Self::State => "State",
            Self::PostalCode => "Postal Code",
            Self::ModelYear => "Model Year",
            Self::Make => "Make",
            Self::Model => "Model",
            Self::EvType => "Electric Vehicle Type",
            Self::CafvEligibility => "Clean Alternative Fuel Vehicle (CAFV) Eligibility",
            Self::ElectricRange => "Electric Range",
            Self::BaseMsrp => "Base MSRP",
            Self::LegislativeDistrict => "Legislative District",
            Self::DolVehicleId => "DOL Vehicle ID",
            Self::VehicleLocation => "Vehicle Location",
            Self::ElectricUtility => "Electric Utility",
            Self::CensusTract => "2020 Census Tract",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Self::ModelYear | Self::ElectricRange | Self::BaseMsrp => ColumnKind::Integer,
            _ => ColumnKind::Text,
        }
    }

    /// Whether ingestion fails when the column is absent.
    pub fn is_required(self) -> bool {
        !matches!(
            self,
            Self::Id
                | Self::PostalCode
                | Self::LegislativeDistrict
                | Self::VehicleLocation
                | Self::ElectricUtility
                | Self::CensusTract
        )
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// A raw value read from a source row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing column or empty cell.
    Null,
    Int64(i64),
    Utf8(String),
}

impl Cell {
    /// CSV-style text cell: surrounding whitespace is trimmed and empty text is [`Cell::Null`].
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Null
        } else {
            Self::Utf8(trimmed.to_owned())
        }
    }

    fn raw(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Int64(v) => v.to_string(),
            Self::Utf8(s) => s.clone(),
        }
    }
}

/// Build a record from one row of cells laid out in [`Column::ALL`] order.
///
/// `row` is the 1-based row number used in error messages; `ordinal` is the 0-based record index
/// used to synthesize an id when the source has no `ID` column.
pub fn build_record(row: usize, ordinal: usize, cells: &[Cell]) -> IngestionResult<VehicleRecord> {
    if cells.len() != Column::ALL.len() {
        return Err(IngestionError::SchemaMismatch {
            message: format!(
                "row {row} has {} cells, expected {}",
                cells.len(),
                Column::ALL.len()
            ),
        });
    }
    let cell = |column: Column| &cells[column.index()];
    let text = |column: Column| cell(column).raw();

    let id = match cell(Column::Id) {
        Cell::Null => format!("EV{ordinal:06}"),
        other => other.raw(),
    };

    let model_year = match cell(Column::ModelYear) {
        Cell::Null => {
            return Err(parse_error(row, Column::ModelYear, &Cell::Null, "missing model year"));
        }
        other => {
            let year = integer(row, Column::ModelYear, other)?;
            i32::try_from(year)
                .map_err(|_| parse_error(row, Column::ModelYear, other, "model year out of range"))?
        }
    };

    let ev_type = EvType::from_label(&text(Column::EvType)).ok_or_else(|| {
        parse_error(
            row,
            Column::EvType,
            cell(Column::EvType),
            "unknown electric vehicle type",
        )
    })?;
    let cafv_eligibility = CafvEligibility::from_label(&text(Column::CafvEligibility))
        .ok_or_else(|| {
            parse_error(
                row,
                Column::CafvEligibility,
                cell(Column::CafvEligibility),
                "unknown CAFV eligibility",
            )
        })?;

    Ok(VehicleRecord {
        id,
        vin: text(Column::Vin),
        county: text(Column::County),
        city: text(Column::City),
        state: text(Column::State),
        postal_code: text(Column::PostalCode),
        model_year,
        make: text(Column::Make),
        model: text(Column::Model),
        ev_type,
        cafv_eligibility,
        electric_range: integer(row, Column::ElectricRange, cell(Column::ElectricRange))?,
        base_msrp: integer(row, Column::BaseMsrp, cell(Column::BaseMsrp))?,
        legislative_district: text(Column::LegislativeDistrict),
        dol_vehicle_id: text(Column::DolVehicleId),
        vehicle_location: text(Column::VehicleLocation),
        electric_utility: text(Column::ElectricUtility),
        census_tract: text(Column::CensusTract),
    })
}

/// Integer cell; an empty cell is the `0` "unknown" sentinel.
fn integer(row: usize, column: Column, cell: &Cell) -> IngestionResult<i64> {
    match cell {
        Cell::Null => Ok(0),
        Cell::Int64(v) => Ok(*v),
        Cell::Utf8(s) => s
            .parse::<i64>()
            .map_err(|e| parse_error(row, column, cell, &e.to_string())),
    }
}

fn parse_error(row: usize, column: Column, cell: &Cell, message: &str) -> IngestionError {
    IngestionError::ParseError {
        row,
        column: column.header().to_owned(),
        raw: cell.raw(),
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, Column, build_record};
    use crate::types::{CafvEligibility, EvType};

    fn row(overrides: &[(Column, Cell)]) -> Vec<Cell> {
        let mut cells: Vec<Cell> = Column::ALL
            .iter()
            .map(|c| match c {
                Column::Vin => Cell::from_text("5YJ3E1EA8J"),
                Column::County => Cell::from_text("King"),
                Column::City => Cell::from_text("Seattle"),
                Column::State => Cell::from_text("WA"),
                Column::ModelYear => Cell::Int64(2018),
                Column::Make => Cell::from_text("TESLA"),
                Column::Model => Cell::from_text("MODEL 3"),
                Column::EvType => Cell::from_text(EvType::BEV_LABEL),
                Column::CafvEligibility => {
                    Cell::from_text(CafvEligibility::Eligible.label())
                }
                Column::ElectricRange => Cell::from_text("215"),
                Column::BaseMsrp => Cell::Int64(0),
                Column::DolVehicleId => Cell::Int64(474_111_233),
                _ => Cell::Null,
            })
            .collect();
        for (column, cell) in overrides {
            cells[column.index()] = cell.clone();
        }
        cells
    }

    #[test]
    fn builds_record_and_synthesizes_missing_id() {
        let record = build_record(2, 7, &row(&[])).unwrap();
        assert_eq!(record.id, "EV000007");
        assert_eq!(record.make, "TESLA");
        assert_eq!(record.model_year, 2018);
        assert_eq!(record.electric_range, 215);
        assert_eq!(record.base_msrp, 0);
        assert_eq!(record.dol_vehicle_id, "474111233");
        assert_eq!(record.postal_code, "");
        assert_eq!(record.ev_type, EvType::Bev);
    }

    #[test]
    fn empty_numeric_cell_is_zero() {
        let record = build_record(2, 0, &row(&[(Column::ElectricRange, Cell::Null)])).unwrap();
        assert_eq!(record.electric_range, 0);
    }

    #[test]
    fn short_ev_type_label_is_rejected() {
        let err = build_record(3, 0, &row(&[(Column::EvType, Cell::from_text("BEV"))])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 3"));
        assert!(msg.contains("column 'Electric Vehicle Type'"));
        assert!(msg.contains("raw='BEV'"));
    }

    #[test]
    fn bad_integer_is_a_parse_error() {
        let err = build_record(4, 0, &row(&[(Column::BaseMsrp, Cell::from_text("lots"))])).unwrap_err();
        assert!(err.to_string().contains("column 'Base MSRP'"));
    }

    #[test]
    fn required_columns() {
        assert!(Column::Make.is_required());
        assert!(Column::DolVehicleId.is_required());
        assert!(!Column::Id.is_required());
        assert!(!Column::CensusTract.is_required());
    }
}
