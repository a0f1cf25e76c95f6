//! Summary statistics over a set of registration records.
//!
//! [`aggregate`] computes the fixed [`AggregateStats`] bundle in a single pass through a
//! [`StatsAccumulator`]. The accumulator can also be built per chunk and merged (in input order),
//! which is how [`crate::execution::ExecutionEngine::aggregate_parallel`] works.
//!
//! Rounding is round-half-up on exact integer arithmetic. An empty input yields a fully shaped
//! bundle with zero counts, zero averages and zero percentages.

use serde::Serialize;

use crate::types::{EvType, VehicleRecord};

use super::buckets::{PriceBucket, RangeBucket};
use super::grouping::CategoryCounts;

/// Length of the top-N rankings (makes, models, counties).
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MakeCount {
    pub make: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelCount {
    pub model: String,
    pub make: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeBucketCount {
    pub range: RangeBucket,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBucketCount {
    pub price: PriceBucket,
    pub count: usize,
}

/// Registrations in one county.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountyCount {
    #[serde(rename = "location")]
    pub county: String,
    pub count: usize,
}

/// Count and rounded share of one powertrain type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvTypeShare {
    #[serde(rename = "type", serialize_with = "EvType::serialize_short")]
    pub ev_type: EvType,
    pub count: usize,
    /// Whole percent of the total, rounded independently per entry.
    pub percentage: u32,
}

/// The fixed-shape statistics bundle consumed by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total_vehicles: usize,
    pub bev_count: usize,
    pub phev_count: usize,
    /// Mean electric range in miles, rounded.
    pub average_range: i64,
    /// Mean base MSRP, rounded.
    #[serde(rename = "averageMSRP")]
    pub average_msrp: i64,
    /// Up to [`TOP_N`] makes, most registrations first.
    pub top_makes: Vec<MakeCount>,
    /// Up to [`TOP_N`] (make, model) pairs, most registrations first.
    pub top_models: Vec<ModelCount>,
    /// One entry per model year present, ascending by year.
    pub yearly_distribution: Vec<YearCount>,
    /// Always all five [`RangeBucket`]s, in order.
    pub range_distribution: Vec<RangeBucketCount>,
    /// Always all five [`PriceBucket`]s, in order.
    pub price_distribution: Vec<PriceBucketCount>,
    /// Up to [`TOP_N`] counties, most registrations first.
    pub geographic_distribution: Vec<CountyCount>,
    /// Always exactly `[BEV, PHEV]`.
    pub ev_type_distribution: Vec<EvTypeShare>,
}

impl AggregateStats {
    /// Share of battery electric vehicles, in whole percent.
    pub fn bev_share(&self) -> u32 {
        share_percent(self.bev_count, self.total_vehicles)
    }

    /// Share of `count` in the total, in whole percent (e.g. a make's market share).
    pub fn share_of_total(&self, count: usize) -> u32 {
        share_percent(count, self.total_vehicles)
    }

    /// Market share of one ranked make, in whole percent.
    pub fn make_share(&self, make: &MakeCount) -> u32 {
        self.share_of_total(make.count)
    }

    /// Make with the most registrations.
    pub fn leading_make(&self) -> Option<&MakeCount> {
        self.top_makes.first()
    }

    /// County with the most registrations.
    pub fn leading_county(&self) -> Option<&CountyCount> {
        self.geographic_distribution.first()
    }

    /// Newest model year present.
    pub fn latest_model_year(&self) -> Option<i32> {
        self.yearly_distribution.last().map(|y| y.year)
    }
}

impl Default for AggregateStats {
    /// The bundle for an empty record set.
    fn default() -> Self {
        StatsAccumulator::new().finish()
    }
}

/// How many records a filter kept out of the full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    pub matched: usize,
    pub total: usize,
    /// `matched / total` in whole percent (0 for an empty set).
    pub percentage: u32,
}

impl FilterSummary {
    pub fn new(matched: usize, total: usize) -> Self {
        Self {
            matched,
            total,
            percentage: share_percent(matched, total),
        }
    }
}

/// `count / total` as a whole percent, rounded half up; 0 when `total` is 0.
pub fn share_percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let (count, total) = (count as u128, total as u128);
    ((200 * count + total) / (2 * total)) as u32
}

fn rounded_mean(sum: i128, n: usize) -> i64 {
    if n == 0 {
        return 0;
    }
    let n = n as i128;
    // floor(sum / n + 1/2); the mean of i64 values always fits back into i64.
    (2 * sum + n).div_euclid(2 * n) as i64
}

/// Single-pass accumulator behind [`aggregate`].
#[derive(Debug, Clone, Default)]
pub struct StatsAccumulator {
    total: usize,
    bev: usize,
    phev: usize,
    range_sum: i128,
    msrp_sum: i128,
    makes: CategoryCounts<String>,
    models: CategoryCounts<(String, String)>,
    years: CategoryCounts<i32>,
    counties: CategoryCounts<String>,
    range_buckets: [usize; 5],
    price_buckets: [usize; 5],
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records pushed so far.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Fold one record in.
    pub fn push(&mut self, record: &VehicleRecord) {
        self.total += 1;
        match record.ev_type {
            EvType::Bev => self.bev += 1,
            EvType::Phev => self.phev += 1,
        }
        self.range_sum += i128::from(record.electric_range);
        self.msrp_sum += i128::from(record.base_msrp);

        self.makes.increment_by_ref(record.make.as_str());
        self.models.increment((record.make.clone(), record.model.clone()));
        self.years.increment(record.model_year);
        self.counties.increment_by_ref(record.county.as_str());

        self.range_buckets[RangeBucket::for_range(record.electric_range).index()] += 1;
        self.price_buckets[PriceBucket::for_price(record.base_msrp).index()] += 1;
    }

    /// Fold in an accumulator built over records that come *after* this one's.
    pub fn merge(&mut self, other: Self) {
        self.total += other.total;
        self.bev += other.bev;
        self.phev += other.phev;
        self.range_sum += other.range_sum;
        self.msrp_sum += other.msrp_sum;
        self.makes.merge(other.makes);
        self.models.merge(other.models);
        self.years.merge(other.years);
        self.counties.merge(other.counties);
        for (dst, n) in self.range_buckets.iter_mut().zip(other.range_buckets) {
            *dst += n;
        }
        for (dst, n) in self.price_buckets.iter_mut().zip(other.price_buckets) {
            *dst += n;
        }
    }

    /// Materialize the statistics bundle.
    pub fn finish(self) -> AggregateStats {
        let total = self.total;

        let top_makes = self
            .makes
            .ranked(TOP_N)
            .into_iter()
            .map(|(make, count)| MakeCount { make, count })
            .collect();
        let top_models = self
            .models
            .ranked(TOP_N)
            .into_iter()
            .map(|((make, model), count)| ModelCount { model, make, count })
            .collect();
        let yearly_distribution = self
            .years
            .sorted_by_key()
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect();
        let geographic_distribution = self
            .counties
            .ranked(TOP_N)
            .into_iter()
            .map(|(county, count)| CountyCount { county, count })
            .collect();

        let range_distribution = RangeBucket::ALL
            .into_iter()
            .map(|range| RangeBucketCount {
                range,
                count: self.range_buckets[range.index()],
            })
            .collect();
        let price_distribution = PriceBucket::ALL
            .into_iter()
            .map(|price| PriceBucketCount {
                price,
                count: self.price_buckets[price.index()],
            })
            .collect();

        let ev_type_distribution = [(EvType::Bev, self.bev), (EvType::Phev, self.phev)]
            .into_iter()
            .map(|(ev_type, count)| EvTypeShare {
                ev_type,
                count,
                percentage: share_percent(count, total),
            })
            .collect();

        AggregateStats {
            total_vehicles: total,
            bev_count: self.bev,
            phev_count: self.phev,
            average_range: rounded_mean(self.range_sum, total),
            average_msrp: rounded_mean(self.msrp_sum, total),
            top_makes,
            top_models,
            yearly_distribution,
            range_distribution,
            price_distribution,
            geographic_distribution,
            ev_type_distribution,
        }
    }
}

impl<'a> Extend<&'a VehicleRecord> for StatsAccumulator {
    fn extend<I: IntoIterator<Item = &'a VehicleRecord>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

/// Compute the full [`AggregateStats`] bundle for `records`.
///
/// Defined for every input, including an empty slice.
pub fn aggregate(records: &[VehicleRecord]) -> AggregateStats {
    let mut acc = StatsAccumulator::new();
    acc.extend(records);
    acc.finish()
}
