//! Core data model types.
//!
//! A [`VehicleRecord`] is one registered vehicle. Records are handed to the engines through a
//! caller-owned [`VehicleDataSet`]; nothing in this crate keeps a process-wide copy of the data.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::processing::aggregate::{AggregateStats, FilterSummary, aggregate};
use crate::processing::filter::{FilterSpec, filter};

/// Electric vehicle powertrain type.
///
/// Serialized as the long-form label used by the registration dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EvType {
    /// Battery electric vehicle.
    #[serde(rename = "Battery Electric Vehicle (BEV)")]
    Bev,
    /// Plug-in hybrid electric vehicle.
    #[serde(rename = "Plug-in Hybrid Electric Vehicle (PHEV)")]
    Phev,
}

impl EvType {
    /// Canonical dataset label for [`EvType::Bev`].
    pub const BEV_LABEL: &'static str = "Battery Electric Vehicle (BEV)";
    /// Canonical dataset label for [`EvType::Phev`].
    pub const PHEV_LABEL: &'static str = "Plug-in Hybrid Electric Vehicle (PHEV)";

    /// Both variants, in reporting order.
    pub const ALL: [Self; 2] = [Self::Bev, Self::Phev];

    /// Long-form dataset label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bev => Self::BEV_LABEL,
            Self::Phev => Self::PHEV_LABEL,
        }
    }

    /// Short label (`"BEV"` / `"PHEV"`) used in distribution output.
    pub fn short_label(self) -> &'static str {
        match self {
            Self::Bev => "BEV",
            Self::Phev => "PHEV",
        }
    }

    /// Parse a long-form dataset label.
    ///
    /// Only the exact canonical labels are accepted; `"BEV"` and other short forms return `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            Self::BEV_LABEL => Some(Self::Bev),
            Self::PHEV_LABEL => Some(Self::Phev),
            _ => None,
        }
    }

    pub(crate) fn serialize_short<S: Serializer>(ev_type: &Self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(ev_type.short_label())
    }
}

impl fmt::Display for EvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Clean Alternative Fuel Vehicle eligibility. Display-only; never aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CafvEligibility {
    #[serde(rename = "Clean Alternative Fuel Vehicle Eligible")]
    Eligible,
    #[serde(rename = "Eligibility unknown as battery range has not been researched")]
    Unknown,
    #[serde(rename = "Not eligible due to low battery range")]
    NotEligible,
}

impl CafvEligibility {
    /// All variants, in dataset order.
    pub const ALL: [Self; 3] = [Self::Eligible, Self::Unknown, Self::NotEligible];

    /// Canonical dataset label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Eligible => "Clean Alternative Fuel Vehicle Eligible",
            Self::Unknown => "Eligibility unknown as battery range has not been researched",
            Self::NotEligible => "Not eligible due to low battery range",
        }
    }

    /// Parse a canonical dataset label (exact match).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.label() == label)
    }
}

impl fmt::Display for CafvEligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One registered electric vehicle.
///
/// Identifiers and the free-form location fields are carried through untouched. `electric_range`
/// and `base_msrp` use `0` for "not applicable / unknown".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub id: String,
    pub vin: String,
    pub county: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    pub model_year: i32,
    pub make: String,
    pub model: String,
    pub ev_type: EvType,
    pub cafv_eligibility: CafvEligibility,
    /// Electric range in miles.
    pub electric_range: i64,
    /// Base MSRP in whole currency units.
    #[serde(rename = "baseMSRP")]
    pub base_msrp: i64,
    #[serde(default)]
    pub legislative_district: String,
    pub dol_vehicle_id: String,
    #[serde(default)]
    pub vehicle_location: String,
    #[serde(default)]
    pub electric_utility: String,
    #[serde(rename = "censusTrack", default)]
    pub census_tract: String,
}

impl VehicleRecord {
    /// Create a record with the identifying attributes set and everything else empty/zero.
    ///
    /// Handy for fixtures and synthetic feeds; chain the `with_*` methods to fill in the rest.
    pub fn new(
        id: impl Into<String>,
        make: impl Into<String>,
        model: impl Into<String>,
        ev_type: EvType,
    ) -> Self {
        Self {
            id: id.into(),
            vin: String::new(),
            county: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            model_year: 0,
            make: make.into(),
            model: model.into(),
            ev_type,
            cafv_eligibility: CafvEligibility::Unknown,
            electric_range: 0,
            base_msrp: 0,
            legislative_district: String::new(),
            dol_vehicle_id: String::new(),
            vehicle_location: String::new(),
            electric_utility: String::new(),
            census_tract: String::new(),
        }
    }

    pub fn with_model_year(mut self, model_year: i32) -> Self {
        self.model_year = model_year;
        self
    }

    pub fn with_electric_range(mut self, electric_range: i64) -> Self {
        self.electric_range = electric_range;
        self
    }

    pub fn with_base_msrp(mut self, base_msrp: i64) -> Self {
        self.base_msrp = base_msrp;
        self
    }

    pub fn with_county(mut self, county: impl Into<String>) -> Self {
        self.county = county.into();
        self
    }

    pub fn with_city(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.city = city.into();
        self.state = state.into();
        self
    }

    pub fn with_cafv_eligibility(mut self, cafv_eligibility: CafvEligibility) -> Self {
        self.cafv_eligibility = cafv_eligibility;
        self
    }
}

/// Caller-owned, ordered set of registration records.
///
/// This is the handle threaded through both engines. Filtering returns a new set and never
/// touches the original.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleDataSet {
    records: Vec<VehicleRecord>,
}

impl VehicleDataSet {
    /// Create a dataset from records (order is preserved).
    pub fn new(records: Vec<VehicleRecord>) -> Self {
        Self { records }
    }

    /// Records in their original order.
    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    /// Consume the dataset and return its records.
    pub fn into_records(self) -> Vec<VehicleRecord> {
        self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply a [`FilterSpec`]; see [`crate::processing::filter()`].
    pub fn filter(&self, spec: &FilterSpec) -> Self {
        Self::new(filter(&self.records, spec))
    }

    /// Create a new dataset containing only records that match `predicate`.
    pub fn filter_records<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&VehicleRecord) -> bool,
    {
        let records = self
            .records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect();
        Self { records }
    }

    /// Compute the summary statistics bundle; see [`crate::processing::aggregate()`].
    pub fn aggregate(&self) -> AggregateStats {
        aggregate(&self.records)
    }

    /// Distinct makes, sorted, for populating a filter form.
    pub fn available_makes(&self) -> Vec<String> {
        distinct_sorted(self.records.iter().map(|r| r.make.as_str()))
    }

    /// Distinct counties, sorted, for populating a filter form.
    pub fn available_counties(&self) -> Vec<String> {
        distinct_sorted(self.records.iter().map(|r| r.county.as_str()))
    }

    /// How much of this dataset a filtered subset retains.
    pub fn summarize_filter(&self, filtered: &VehicleDataSet) -> FilterSummary {
        FilterSummary::new(filtered.len(), self.len())
    }
}

impl From<Vec<VehicleRecord>> for VehicleDataSet {
    fn from(records: Vec<VehicleRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<VehicleRecord> for VehicleDataSet {
    fn from_iter<I: IntoIterator<Item = VehicleRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
