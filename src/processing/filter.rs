//! Predicate filtering for registration records.

use serde::{Deserialize, Serialize};

use crate::types::{EvType, VehicleRecord};

/// Sparse set of constraints; every `None` field imposes no constraint.
///
/// Presence is explicit: `range_min: Some(0)` is a real (always-true for valid data) constraint,
/// not an absent one. Bounds in `year_range` / `price_range` are inclusive on both ends and are
/// taken literally, so an inverted pair matches nothing.
///
/// Deserializes from the dashboard's filter state, e.g.
/// `{"county":"King","yearRange":[2020,2023],"rangeMin":200}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    /// Exact, case-sensitive make.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    /// Exact powertrain type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ev_type: Option<EvType>,
    /// Exact, case-sensitive county.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    /// Inclusive lower bound on electric range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_min: Option<i64>,
    /// Inclusive `(min, max)` model year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_range: Option<(i32, i32)>,
    /// Inclusive `(min, max)` base MSRP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<(i64, i64)>,
}

impl FilterSpec {
    /// A spec with no constraints (matches every record).
    pub fn new() -> Self {
        Self::default()
    }

    /// Quick filter: vehicles with at least 200 miles of electric range.
    pub fn long_range() -> Self {
        Self::new().with_range_min(200)
    }

    /// Quick filter: model years from 2020 through `current_year`.
    pub fn recent_models(current_year: i32) -> Self {
        Self::new().with_year_range(2020, current_year)
    }

    pub fn with_make(mut self, make: impl Into<String>) -> Self {
        self.make = Some(make.into());
        self
    }

    pub fn with_ev_type(mut self, ev_type: EvType) -> Self {
        self.ev_type = Some(ev_type);
        self
    }

    pub fn with_county(mut self, county: impl Into<String>) -> Self {
        self.county = Some(county.into());
        self
    }

    pub fn with_range_min(mut self, range_min: i64) -> Self {
        self.range_min = Some(range_min);
        self
    }

    pub fn with_year_range(mut self, min: i32, max: i32) -> Self {
        self.year_range = Some((min, max));
        self
    }

    pub fn with_price_range(mut self, min: i64, max: i64) -> Self {
        self.price_range = Some((min, max));
        self
    }

    /// `true` if no dimension is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self == &Self::default()
    }

    /// Returns `true` if `record` satisfies every present constraint.
    pub fn matches(&self, record: &VehicleRecord) -> bool {
        self.make.as_ref().is_none_or(|make| record.make == *make)
            && self.ev_type.is_none_or(|ev_type| record.ev_type == ev_type)
            && self.county.as_ref().is_none_or(|county| record.county == *county)
            && self.range_min.is_none_or(|min| record.electric_range >= min)
            && self
                .year_range
                .is_none_or(|(lo, hi)| lo <= record.model_year && record.model_year <= hi)
            && self
                .price_range
                .is_none_or(|(lo, hi)| lo <= record.base_msrp && record.base_msrp <= hi)
    }
}

/// Returns the records satisfying every constraint in `spec`, in input order.
///
/// An empty result is a normal outcome, not an error.
pub fn filter(records: &[VehicleRecord], spec: &FilterSpec) -> Vec<VehicleRecord> {
    records
        .iter()
        .filter(|record| spec.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{FilterSpec, filter};
    use crate::types::{EvType, VehicleRecord};

    fn sample_records() -> Vec<VehicleRecord> {
        vec![
            VehicleRecord::new("1", "TESLA", "MODEL 3", EvType::Bev)
                .with_model_year(2022)
                .with_electric_range(300)
                .with_base_msrp(50_000)
                .with_county("King"),
            VehicleRecord::new("2", "TESLA", "MODEL Y", EvType::Bev)
                .with_model_year(2022)
                .with_electric_range(320)
                .with_base_msrp(60_000)
                .with_county("King"),
            VehicleRecord::new("3", "NISSAN", "LEAF", EvType::Bev)
                .with_model_year(2022)
                .with_electric_range(150)
                .with_base_msrp(32_000)
                .with_county("Pierce"),
            VehicleRecord::new("4", "FORD", "ESCAPE", EvType::Phev)
                .with_model_year(2022)
                .with_electric_range(40)
                .with_base_msrp(35_000)
                .with_county("King"),
        ]
    }

    fn ids(records: &[VehicleRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn empty_spec_returns_input_unchanged() {
        let records = sample_records();
        assert!(FilterSpec::new().is_unconstrained());
        assert_eq!(filter(&records, &FilterSpec::new()), records);
    }

    #[test]
    fn county_filter_keeps_original_order() {
        let records = sample_records();
        let out = filter(&records, &FilterSpec::new().with_county("King"));
        assert_eq!(ids(&out), vec!["1", "2", "4"]);
    }

    #[test]
    fn exact_matches_are_case_sensitive() {
        let records = sample_records();
        assert!(filter(&records, &FilterSpec::new().with_make("tesla")).is_empty());
        assert_eq!(
            ids(&filter(&records, &FilterSpec::new().with_make("TESLA"))),
            vec!["1", "2"]
        );
    }

    #[test]
    fn ev_type_filter() {
        let records = sample_records();
        let out = filter(&records, &FilterSpec::new().with_ev_type(EvType::Phev));
        assert_eq!(ids(&out), vec!["4"]);
    }

    #[test]
    fn range_min_zero_is_applied_not_ignored() {
        let mut records = sample_records();
        records.push(
            VehicleRecord::new("5", "ODD", "NEGATIVE", EvType::Bev).with_electric_range(-1),
        );
        let spec = FilterSpec::new().with_range_min(0);
        assert!(!spec.is_unconstrained());
        assert_eq!(ids(&filter(&records, &spec)), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn range_min_is_inclusive() {
        let records = sample_records();
        let out = filter(&records, &FilterSpec::new().with_range_min(300));
        assert_eq!(ids(&out), vec!["1", "2"]);
    }

    #[test]
    fn price_range_bounds_are_inclusive() {
        let records = sample_records();
        let out = filter(&records, &FilterSpec::new().with_price_range(32_000, 50_000));
        assert_eq!(ids(&out), vec!["1", "3", "4"]);
    }

    #[test]
    fn inverted_bounds_match_nothing() {
        let records = sample_records();
        assert!(filter(&records, &FilterSpec::new().with_year_range(2023, 2021)).is_empty());
        assert!(filter(&records, &FilterSpec::new().with_price_range(60_000, 30_000)).is_empty());
    }

    #[test]
    fn constraints_compose_with_and() {
        let records = sample_records();
        let spec = FilterSpec::new()
            .with_county("King")
            .with_ev_type(EvType::Bev)
            .with_range_min(310);
        assert_eq!(ids(&filter(&records, &spec)), vec!["2"]);
    }

    #[test]
    fn presets() {
        let records = sample_records();
        assert_eq!(ids(&filter(&records, &FilterSpec::long_range())), vec!["1", "2"]);
        assert_eq!(filter(&records, &FilterSpec::recent_models(2021)).len(), 0);
        assert_eq!(filter(&records, &FilterSpec::recent_models(2026)).len(), 4);
    }

    #[test]
    fn deserializes_dashboard_filter_state() {
        let spec: FilterSpec = serde_json::from_str(
            r#"{"evType":"Plug-in Hybrid Electric Vehicle (PHEV)","yearRange":[2015,2023],"rangeMin":0}"#,
        )
        .unwrap();
        assert_eq!(
            spec,
            FilterSpec::new()
                .with_ev_type(EvType::Phev)
                .with_year_range(2015, 2023)
                .with_range_min(0)
        );

        let empty: FilterSpec = serde_json::from_str("{}").unwrap();
        assert!(empty.is_unconstrained());

        assert!(serde_json::from_str::<FilterSpec>(r#"{"evType":"BEV"}"#).is_err());
    }
}
