//! `ev-registration-analytics` computes the statistics behind an electric-vehicle registration
//! dashboard: narrowing a record set by user-selected criteria and summarizing it into counts,
//! averages, rankings and distributions.
//!
//! The two engines are plain functions in [`processing`]:
//!
//! - [`processing::filter()`] keeps the records matching every constraint of a
//!   [`processing::FilterSpec`], in input order
//! - [`processing::aggregate()`] turns a record slice into an [`processing::AggregateStats`]
//!   bundle (totals, average range and MSRP, top makes/models/counties, per-year counts, range
//!   and price buckets, BEV/PHEV shares)
//!
//! Records are owned by the caller through a [`types::VehicleDataSet`]; nothing is cached or
//! shared globally.
//!
//! ## Loading records
//!
//! [`ingestion::ingest_from_path`] loads the published registration layout from CSV, JSON or
//! Parquet, auto-detecting the format from the file extension (or you can force a format via
//! [`ingestion::IngestionOptions`]).
//!
//! ```no_run
//! use ev_registration_analytics::ingestion::{ingest_from_path, IngestionOptions};
//! use ev_registration_analytics::processing::FilterSpec;
//!
//! # fn main() -> Result<(), ev_registration_analytics::IngestionError> {
//! let ds = ingest_from_path("Electric_Vehicle_Population_Data.csv", &IngestionOptions::default())?;
//! let recent = ds.filter(&FilterSpec::recent_models(2024));
//! let stats = recent.aggregate();
//! println!("vehicles={} avg_range={}", stats.total_vehicles, stats.average_range);
//! # Ok(())
//! # }
//! ```
//!
//! ## Dashboard example
//!
//! ```rust
//! use ev_registration_analytics::processing::FilterSpec;
//! use ev_registration_analytics::types::{EvType, VehicleDataSet, VehicleRecord};
//!
//! let ds: VehicleDataSet = vec![
//!     VehicleRecord::new("EV000000", "TESLA", "MODEL 3", EvType::Bev)
//!         .with_county("King")
//!         .with_electric_range(272)
//!         .with_base_msrp(42_000),
//!     VehicleRecord::new("EV000001", "TESLA", "MODEL Y", EvType::Bev)
//!         .with_county("King")
//!         .with_electric_range(330)
//!         .with_base_msrp(52_000),
//!     VehicleRecord::new("EV000002", "FORD", "ESCAPE", EvType::Phev)
//!         .with_county("Pierce")
//!         .with_electric_range(37)
//!         .with_base_msrp(35_000),
//! ]
//! .into();
//!
//! let tesla = ds.filter(&FilterSpec::new().with_make("TESLA"));
//! let summary = ds.summarize_filter(&tesla);
//! assert_eq!((summary.matched, summary.total, summary.percentage), (2, 3, 67));
//!
//! let stats = tesla.aggregate();
//! assert_eq!(stats.average_range, 301);
//! assert_eq!(stats.leading_county().map(|c| c.county.as_str()), Some("King"));
//!
//! // Serializes to the dashboard's camelCase JSON shape.
//! let json = serde_json::to_value(&stats).unwrap();
//! assert_eq!(json["averageMSRP"], 47_000);
//! ```
//!
//! ## Modules
//!
//! - [`types`]: record, enum and dataset types
//! - [`processing`]: the filter and aggregation engines
//! - [`execution`]: chunked parallel execution of both engines with metrics and throttling
//! - [`ingestion`]: unified ingestion entrypoints and format-specific loaders
//! - [`error`]: error types

pub mod error;
pub mod execution;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{ExecutionError, ExecutionResult, IngestionError, IngestionResult};
