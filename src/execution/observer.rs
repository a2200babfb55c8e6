use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::types::TypeTag;

/// Events emitted by the engine during a run.
#[derive(Debug, Clone)]
pub enum InferenceEvent {
    RunStarted { dataset: String, columns: usize },
    /// A hinted column was coerced directly.
    HintApplied { column: String, tag: TypeTag },
    /// A hint carried a tag outside the vocabulary; the column was left unchanged.
    UnknownHintTag { column: String, tag: String },
    /// A hint named a column that is not in the dataset.
    HintForMissingColumn { column: String, tag: String },
    ThrottleWaited { duration: Duration },
    ColumnStarted { column: String },
    ColumnFinished {
        column: String,
        tag: TypeTag,
        detector: Option<&'static str>,
        elapsed: Duration,
    },
    RunFinished {
        elapsed: Duration,
        metrics: InferenceMetricsSnapshot,
    },
}

/// Observer hook for inference events.
pub trait InferenceObserver: Send + Sync {
    fn on_event(&self, event: &InferenceEvent);
}

/// Forwards events to the [`log`] facade.
///
/// Run completion is logged at `info`, everything else at `debug`. The engine itself already
/// warns about unknown or dangling hints.
#[derive(Debug, Default)]
pub struct LogObserver;

impl InferenceObserver for LogObserver {
    fn on_event(&self, event: &InferenceEvent) {
        match event {
            InferenceEvent::RunFinished { elapsed, metrics } => {
                log::info!("[infer] run finished in {elapsed:?}: {metrics}");
            }
            other => log::debug!("[infer] {other:?}"),
        }
    }
}

/// An observer that fans out events to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn InferenceObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn InferenceObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl InferenceObserver for CompositeObserver {
    fn on_event(&self, event: &InferenceEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }
}

/// Real-time metrics for an inference run.
///
/// The engine updates these counters while it runs; callers can snapshot them at any time.
pub struct InferenceMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    columns_started: AtomicU64,
    columns_finished: AtomicU64,
    hinted_columns: AtomicU64,
    unknown_hints: AtomicU64,
    throttle_wait_ns: AtomicU64,

    active_columns: AtomicUsize,
    max_active_columns: AtomicUsize,
}

impl InferenceMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            columns_started: AtomicU64::new(0),
            columns_finished: AtomicU64::new(0),
            hinted_columns: AtomicU64::new(0),
            unknown_hints: AtomicU64::new(0),
            throttle_wait_ns: AtomicU64::new(0),
            active_columns: AtomicUsize::new(0),
            max_active_columns: AtomicUsize::new(0),
        }
    }

    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);

        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.columns_started.store(0, Ordering::SeqCst);
        self.columns_finished.store(0, Ordering::SeqCst);
        self.hinted_columns.store(0, Ordering::SeqCst);
        self.unknown_hints.store(0, Ordering::SeqCst);
        self.throttle_wait_ns.store(0, Ordering::SeqCst);
        self.active_columns.store(0, Ordering::SeqCst);
        self.max_active_columns.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns.store(saturating_nanos(elapsed), Ordering::SeqCst);
    }

    pub fn on_column_start(&self) {
        let _ = self.columns_started.fetch_add(1, Ordering::SeqCst);
        let now = self.active_columns.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.max_active_columns.fetch_max(now, Ordering::SeqCst);
    }

    pub fn on_column_end(&self) {
        let _ = self.columns_finished.fetch_add(1, Ordering::SeqCst);
        let _ = self.active_columns.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn on_hint_applied(&self) {
        let _ = self.hinted_columns.fetch_add(1, Ordering::SeqCst);
    }

    pub fn on_unknown_hint(&self) {
        let _ = self.unknown_hints.fetch_add(1, Ordering::SeqCst);
    }

    pub fn on_throttle_wait(&self, d: Duration) {
        let _ = self.throttle_wait_ns.fetch_add(saturating_nanos(d), Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> InferenceMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        let elapsed = (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns));

        InferenceMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed,
            columns_started: self.columns_started.load(Ordering::SeqCst),
            columns_finished: self.columns_finished.load(Ordering::SeqCst),
            hinted_columns: self.hinted_columns.load(Ordering::SeqCst),
            unknown_hints: self.unknown_hints.load(Ordering::SeqCst),
            throttle_wait: Duration::from_nanos(self.throttle_wait_ns.load(Ordering::SeqCst)),
            max_active_columns: self.max_active_columns.load(Ordering::SeqCst),
        }
    }
}

impl Default for InferenceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}

/// Immutable snapshot of [`InferenceMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    /// Unhinted columns submitted to the detector chain.
    pub columns_started: u64,
    pub columns_finished: u64,
    /// Columns coerced through a recognized hint.
    pub hinted_columns: u64,
    pub unknown_hints: u64,
    pub throttle_wait: Duration,
    pub max_active_columns: usize,
}

impl fmt::Display for InferenceMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, columns={}/{}, hinted={}, unknown_hints={}, max_active_columns={}, throttle_wait={:?}, elapsed={:?}",
            self.run_id,
            self.columns_finished,
            self.columns_started,
            self.hinted_columns,
            self.unknown_hints,
            self.max_active_columns,
            self.throttle_wait,
            self.elapsed
        )
    }
}
