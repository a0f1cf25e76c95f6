//! Execution engine for running the filter and aggregation engines with configurable parallelism.
//!
//! This module sits "above" [`crate::processing`] and provides:
//!
//! - Parallel (chunked) filtering and aggregation with results identical to the sequential path
//! - Resource limits / throttling (in-flight chunks)
//! - Real-time metrics + observer hooks for monitoring

mod observer;
mod semaphore;

use std::sync::Arc;
use std::time::Duration;

use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::error::{ExecutionError, ExecutionResult};
use crate::processing::{AggregateStats, FilterSpec, StatsAccumulator};
use crate::types::VehicleRecord;

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, StdErrExecutionObserver,
};

use semaphore::Semaphore;

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Number of records per chunk.
    pub chunk_size: usize,
    /// Upper bound on concurrently executing chunks.
    ///
    /// This is an additional throttle on top of `num_threads`.
    pub max_in_flight_chunks: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = available_parallelism();
        Self {
            num_threads: Some(n),
            chunk_size: 4_096,
            max_in_flight_chunks: n,
        }
    }
}

impl ExecutionOptions {
    fn validate(&self) -> ExecutionResult<()> {
        let invalid = |message: &str| {
            Err(ExecutionError::InvalidOptions {
                message: message.to_string(),
            })
        };
        if self.chunk_size == 0 {
            return invalid("chunk_size must be > 0");
        }
        if self.max_in_flight_chunks == 0 {
            return invalid("max_in_flight_chunks must be > 0");
        }
        if self.num_threads == Some(0) {
            return invalid("num_threads must be > 0 when set");
        }
        Ok(())
    }
}

/// Runs [`crate::processing::filter`] and [`crate::processing::aggregate`] over a dedicated
/// thread pool.
///
/// Results are identical to the sequential functions for every input, including record order
/// and tie-breaks in the ranked distributions.
///
/// ```
/// use ev_registration_analytics::execution::{ExecutionEngine, ExecutionOptions};
/// use ev_registration_analytics::processing::{aggregate, FilterSpec};
/// use ev_registration_analytics::types::{EvType, VehicleRecord};
///
/// # fn main() -> Result<(), ev_registration_analytics::ExecutionError> {
/// let records: Vec<VehicleRecord> = (0..100)
///     .map(|i| VehicleRecord::new(format!("EV{i:06}"), "TESLA", "MODEL 3", EvType::Bev).with_electric_range(i))
///     .collect();
///
/// let engine = ExecutionEngine::new(ExecutionOptions {
///     num_threads: Some(2),
///     chunk_size: 16,
///     max_in_flight_chunks: 2,
/// })?;
///
/// let long_range = engine.filter_parallel(&records, &FilterSpec::new().with_range_min(50));
/// assert_eq!(long_range.len(), 50);
/// assert_eq!(engine.aggregate_parallel(&records), aggregate(&records));
/// # Ok(())
/// # }
/// ```
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// Fails with [`ExecutionError::InvalidOptions`] if `chunk_size == 0`,
    /// `max_in_flight_chunks == 0`, or `num_threads == Some(0)`.
    pub fn new(opts: ExecutionOptions) -> ExecutionResult<Self> {
        opts.validate()?;

        let n_threads = opts.num_threads.unwrap_or_else(available_parallelism);
        let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn options(&self) -> &ExecutionOptions {
        &self.opts
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Parallel equivalent of [`crate::processing::filter`]; preserves input order.
    pub fn filter_parallel(&self, records: &[VehicleRecord], spec: &FilterSpec) -> Vec<VehicleRecord> {
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted);

        let per_chunk: Vec<Vec<VehicleRecord>> = self.run_chunks(
            records,
            |chunk| {
                chunk
                    .iter()
                    .filter(|record| spec.matches(record))
                    .cloned()
                    .collect::<Vec<_>>()
            },
            Vec::len,
        );

        let out = per_chunk.into_iter().flatten().collect();
        self.finish_run();
        out
    }

    /// Parallel equivalent of [`crate::processing::aggregate`].
    ///
    /// Each chunk folds into its own [`StatsAccumulator`]; accumulators are merged in chunk
    /// order so first-encountered tie-breaks match the sequential pass.
    pub fn aggregate_parallel(&self, records: &[VehicleRecord]) -> AggregateStats {
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted);

        let per_chunk: Vec<StatsAccumulator> = self.run_chunks(
            records,
            |chunk| {
                let mut acc = StatsAccumulator::new();
                acc.extend(chunk);
                acc
            },
            StatsAccumulator::len,
        );

        let mut total = StatsAccumulator::new();
        for acc in per_chunk {
            total.merge(acc);
        }
        let stats = total.finish();

        self.emit(ExecutionEvent::AggregateFinished {
            total_vehicles: stats.total_vehicles,
        });
        self.finish_run();
        stats
    }

    /// Split `records` into chunks, run `work` on each under the in-flight limit, and return the
    /// per-chunk outputs in chunk order.
    fn run_chunks<T, W, C>(&self, records: &[VehicleRecord], work: W, output_len: C) -> Vec<T>
    where
        T: Send,
        W: Fn(&[VehicleRecord]) -> T + Send + Sync,
        C: Fn(&T) -> usize + Send + Sync,
    {
        let sem = Semaphore::new(self.opts.max_in_flight_chunks);
        let chunk_size = self.opts.chunk_size;

        self.pool.install(|| {
            records
                .par_chunks(chunk_size)
                .enumerate()
                .map(|(idx, chunk)| {
                    let (_permit, waited) = sem.acquire_guard();
                    if waited > Duration::ZERO {
                        self.metrics.on_throttle_wait(waited);
                        self.emit(ExecutionEvent::ThrottleWaited { duration: waited });
                    }

                    self.metrics.on_chunk_start();
                    self.emit(ExecutionEvent::ChunkStarted {
                        start_record: idx * chunk_size,
                        record_count: chunk.len(),
                    });

                    let out = work(chunk);
                    self.metrics.on_records_processed(chunk.len());

                    self.emit(ExecutionEvent::ChunkFinished {
                        output_records: output_len(&out),
                    });
                    self.metrics.on_chunk_end();
                    out
                })
                .collect()
        })
    }

    fn finish_run(&self) {
        let elapsed = self.metrics.end_run();
        self.emit(ExecutionEvent::RunFinished {
            elapsed,
            metrics: self.metrics.snapshot(),
        });
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

fn available_parallelism() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::{ExecutionEngine, ExecutionOptions};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::error::ExecutionError;
    use crate::execution::{ExecutionEvent, ExecutionObserver};
    use crate::processing::{FilterSpec, aggregate, filter};
    use crate::types::{EvType, VehicleRecord};

    const MAKES: [&str; 5] = ["TESLA", "NISSAN", "CHEVROLET", "KIA", "BMW"];
    const COUNTIES: [&str; 4] = ["King", "Pierce", "Snohomish", "Clark"];

    fn records_of_n(n: usize) -> Vec<VehicleRecord> {
        (0..n)
            .map(|i| {
                let ev_type = if i % 3 == 0 { EvType::Phev } else { EvType::Bev };
                VehicleRecord::new(format!("EV{i:06}"), MAKES[i % MAKES.len()], format!("M{}", i % 7), ev_type)
                    .with_county(COUNTIES[(i / 2) % COUNTIES.len()])
                    .with_model_year(2015 + (i % 10) as i32)
                    .with_electric_range(((i * 37) % 420) as i64)
                    .with_base_msrp(((i * 7_919) % 140_000) as i64)
            })
            .collect()
    }

    fn engine(num_threads: usize, chunk_size: usize, max_in_flight_chunks: usize) -> ExecutionEngine {
        ExecutionEngine::new(ExecutionOptions {
            num_threads: Some(num_threads),
            chunk_size,
            max_in_flight_chunks,
        })
        .unwrap()
    }

    #[test]
    fn rejects_zero_sized_options() {
        for opts in [
            ExecutionOptions { num_threads: Some(1), chunk_size: 0, max_in_flight_chunks: 1 },
            ExecutionOptions { num_threads: Some(1), chunk_size: 1, max_in_flight_chunks: 0 },
            ExecutionOptions { num_threads: Some(0), chunk_size: 1, max_in_flight_chunks: 1 },
        ] {
            assert!(matches!(
                ExecutionEngine::new(opts),
                Err(ExecutionError::InvalidOptions { .. })
            ));
        }
    }

    #[test]
    fn parallel_filter_matches_sequential_filter() {
        let records = records_of_n(1_000);
        let engine = engine(4, 7, 4);
        let specs = [
            FilterSpec::new(),
            FilterSpec::long_range(),
            FilterSpec::new().with_make("KIA").with_county("Pierce"),
            FilterSpec::new().with_ev_type(EvType::Phev).with_price_range(20_000, 90_000),
            FilterSpec::new().with_year_range(2030, 2020),
        ];
        for spec in &specs {
            assert_eq!(engine.filter_parallel(&records, spec), filter(&records, spec));
        }
    }

    #[test]
    fn parallel_aggregate_matches_sequential_aggregate() {
        let records = records_of_n(1_000);
        for chunk_size in [1, 3, 64, 5_000] {
            let engine = engine(4, chunk_size, 4);
            assert_eq!(engine.aggregate_parallel(&records), aggregate(&records));
        }
    }

    #[test]
    fn parallel_aggregate_of_empty_input_is_empty_bundle() {
        let engine = engine(2, 8, 2);
        let stats = engine.aggregate_parallel(&[]);
        assert_eq!(stats, aggregate(&[]));
        assert_eq!(stats.total_vehicles, 0);
    }

    struct ConcurrencyObserver {
        active_chunks: AtomicUsize,
        max_active_chunks: AtomicUsize,
        chunk_delay: Duration,
    }

    impl ConcurrencyObserver {
        fn new(chunk_delay: Duration) -> Self {
            Self {
                active_chunks: AtomicUsize::new(0),
                max_active_chunks: AtomicUsize::new(0),
                chunk_delay,
            }
        }
        fn max(&self) -> usize {
            self.max_active_chunks.load(Ordering::SeqCst)
        }
    }

    impl ExecutionObserver for ConcurrencyObserver {
        fn on_event(&self, event: &ExecutionEvent) {
            match event {
                ExecutionEvent::ChunkStarted { .. } => {
                    let now = self.active_chunks.fetch_add(1, Ordering::SeqCst) + 1;
                    self.max_active_chunks.fetch_max(now, Ordering::SeqCst);
                    // Make each chunk take long enough to overlap if not throttled.
                    std::thread::sleep(self.chunk_delay);
                }
                ExecutionEvent::ChunkFinished { .. } => {
                    let _ = self.active_chunks.fetch_sub(1, Ordering::SeqCst);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn chunks_run_concurrently_when_allowed() {
        let records = records_of_n(200);
        let observer = Arc::new(ConcurrencyObserver::new(Duration::from_millis(2)));
        let obs_trait: Arc<dyn ExecutionObserver> = observer.clone();
        let engine = engine(4, 1, 4).with_observer(obs_trait);

        let out = engine.filter_parallel(&records, &FilterSpec::new());

        assert_eq!(out.len(), records.len());
        assert!(observer.max() > 1);
    }

    #[test]
    fn max_in_flight_chunks_throttles_chunk_concurrency() {
        let records = records_of_n(100);
        let observer = Arc::new(ConcurrencyObserver::new(Duration::from_millis(1)));
        let obs_trait: Arc<dyn ExecutionObserver> = observer.clone();
        let engine = engine(4, 1, 1).with_observer(obs_trait);

        let stats = engine.aggregate_parallel(&records);

        assert_eq!(stats.total_vehicles, records.len());
        assert_eq!(observer.max(), 1);
    }

    #[test]
    fn metrics_are_available_after_run() {
        let records = records_of_n(60);
        let engine = engine(4, 1, 1);
        let metrics = engine.metrics();

        let out = engine.filter_parallel(&records, &FilterSpec::new());
        assert_eq!(out.len(), records.len());

        let snap = metrics.snapshot();
        assert_eq!(snap.run_id, 1);
        assert_eq!(snap.records_processed, records.len() as u64);
        assert_eq!(snap.chunks_started, records.len() as u64);
        assert_eq!(snap.chunks_finished, records.len() as u64);
        assert_eq!(snap.max_active_chunks, 1);
        assert!(snap.elapsed.is_some());
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<ExecutionEvent>>,
    }

    impl ExecutionObserver for RecordingObserver {
        fn on_event(&self, event: &ExecutionEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn aggregate_run_reports_totals_and_brackets_events() {
        let records = records_of_n(10);
        let observer = Arc::new(RecordingObserver::default());
        let obs_trait: Arc<dyn ExecutionObserver> = observer.clone();
        let engine = engine(2, 4, 2).with_observer(obs_trait);

        engine.aggregate_parallel(&records);

        let events = observer.events.lock().unwrap();
        assert!(matches!(events.first(), Some(ExecutionEvent::RunStarted)));
        assert!(matches!(events.last(), Some(ExecutionEvent::RunFinished { .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            ExecutionEvent::AggregateFinished { total_vehicles: 10 }
        )));

        let mut chunk_sizes: Vec<(usize, usize)> = events
            .iter()
            .filter_map(|e| match e {
                ExecutionEvent::ChunkStarted { start_record, record_count } => Some((*start_record, *record_count)),
                _ => None,
            })
            .collect();
        chunk_sizes.sort();
        assert_eq!(chunk_sizes, vec![(0, 4), (4, 4), (8, 2)]);
    }
}
