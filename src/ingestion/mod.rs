//! Record loaders.
//!
//! These adapters hand records to the engines; they never influence filtering or aggregation.
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - loads records into a caller-owned [`crate::types::VehicleDataSet`]
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`parquet`]
//!
//! CSV and Parquet use the published column headers described by [`columns::Column`].

pub mod columns;
pub mod csv;
pub mod json;
pub mod observability;
pub mod parquet;
pub mod unified;

pub use columns::{Cell, Column, ColumnKind};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    StdErrObserver,
};
pub use unified::{IngestionFormat, IngestionOptions, IngestionRequest, ingest_from_path};
