//! The filter and aggregation engines.
//!
//! Both engines are pure functions over a slice of [`crate::types::VehicleRecord`]s:
//!
//! - [`filter()`]: keep the records matching every constraint of a [`FilterSpec`]
//! - [`aggregate()`]: compute the fixed [`AggregateStats`] bundle
//!
//! ## Example: filter → aggregate
//!
//! ```rust
//! use ev_registration_analytics::processing::{aggregate, filter, FilterSpec};
//! use ev_registration_analytics::types::{EvType, VehicleRecord};
//!
//! let records = vec![
//!     VehicleRecord::new("EV000000", "TESLA", "MODEL Y", EvType::Bev)
//!         .with_county("King")
//!         .with_electric_range(330),
//!     VehicleRecord::new("EV000001", "FORD", "ESCAPE", EvType::Phev)
//!         .with_county("Pierce")
//!         .with_electric_range(37),
//! ];
//!
//! let king = filter(&records, &FilterSpec::new().with_county("King"));
//! let stats = aggregate(&king);
//! assert_eq!(stats.total_vehicles, 1);
//! assert_eq!(stats.average_range, 330);
//! assert_eq!(stats.ev_type_distribution[0].percentage, 100);
//! ```

pub mod aggregate;
pub mod buckets;
pub mod filter;
pub mod grouping;

pub use aggregate::{
    AggregateStats, CountyCount, EvTypeShare, FilterSummary, MakeCount, ModelCount,
    PriceBucketCount, RangeBucketCount, StatsAccumulator, TOP_N, YearCount, aggregate,
    share_percent,
};
pub use buckets::{PriceBucket, RangeBucket};
pub use filter::{FilterSpec, filter};
pub use grouping::CategoryCounts;
