use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for [`crate::execution::ExecutionEngine`] construction.
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared across CSV/JSON/Parquet ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON row is malformed or does not deserialize into a record.
    #[error("json error at row {row}: {source}")]
    Json {
        row: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Parquet ingestion error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The input does not have the registration layout (missing required columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A cell could not be converted into its record field (bad integer, unknown label).
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// Error type returned when an execution engine cannot be built.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// One of the [`crate::execution::ExecutionOptions`] values is out of range.
    #[error("invalid execution options: {message}")]
    InvalidOptions { message: String },

    /// The rayon thread pool could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
