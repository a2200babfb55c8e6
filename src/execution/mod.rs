//! Column dispatcher: runs inference over a whole [`DataSet`] with bounded parallelism.
//!
//! This module sits "above" [`crate::inference`] and provides:
//!
//! - the hinted/unhinted split (hinted columns are coerced synchronously)
//! - one task per unhinted column on a dedicated worker pool, with an in-flight throttle
//! - order-preserving write-back into the dataset
//! - real-time metrics + observer hooks for monitoring

mod observer;
mod semaphore;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, InferenceResult};
use crate::inference::{infer_column, resolve_hint, DetectorChain, HintOutcome, TypeReport, DEFAULT_SENTINELS};
use crate::types::{Column, DataSet, TypeHint, TypeTag, Value};

pub use observer::{
    CompositeObserver, InferenceEvent, InferenceMetrics, InferenceMetricsSnapshot, InferenceObserver, LogObserver,
};

use semaphore::Semaphore;

/// Configuration for the [`InferenceEngine`].
///
/// Deserializes from partial JSON; missing fields take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Upper bound on concurrently inferred columns.
    ///
    /// This is an additional throttle on top of `num_threads`.
    pub max_in_flight_columns: usize,
    /// Cell strings treated as missing before inference (exact match).
    pub sentinels: Vec<String>,
    /// A column is categorical when `distinct / total` is strictly below this.
    pub categorical_threshold: f64,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        let n = available_parallelism();
        Self {
            num_threads: Some(n),
            max_in_flight_columns: n,
            sentinels: DEFAULT_SENTINELS.iter().map(|s| s.to_string()).collect(),
            categorical_threshold: 0.5,
        }
    }
}

impl InferenceOptions {
    /// Load options from a JSON document such as `{"num_threads": 2, "sentinels": ["n/a"]}`.
    pub fn from_json_str(json: &str) -> InferenceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn validate(&self) -> InferenceResult<()> {
        if self.num_threads == Some(0) {
            return Err(invalid("num_threads must be > 0 when set"));
        }
        if self.max_in_flight_columns == 0 {
            return Err(invalid("max_in_flight_columns must be > 0"));
        }
        if !(self.categorical_threshold > 0.0 && self.categorical_threshold <= 1.0) {
            return Err(invalid(format!(
                "categorical_threshold must be in (0, 1], got {}",
                self.categorical_threshold
            )));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> InferenceError {
    InferenceError::InvalidOptions {
        message: message.into(),
    }
}

fn available_parallelism() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Infers and coerces every column of a [`DataSet`].
pub struct InferenceEngine {
    pool: ThreadPool,
    opts: InferenceOptions,
    sentinels: HashSet<String>,
    chain: DetectorChain,
    observer: Option<Arc<dyn InferenceObserver>>,
    metrics: Arc<InferenceMetrics>,
}

impl InferenceEngine {
    /// Create a new engine with the given options.
    pub fn new(opts: InferenceOptions) -> InferenceResult<Self> {
        opts.validate()?;

        let n_threads = opts.num_threads.unwrap_or_else(available_parallelism).max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|i| format!("infer-worker-{i}"))
            .build()?;

        Ok(Self {
            pool,
            sentinels: opts.sentinels.iter().cloned().collect(),
            chain: DetectorChain::standard(opts.categorical_threshold),
            opts,
            observer: None,
            metrics: Arc::new(InferenceMetrics::new()),
        })
    }

    /// Attach an observer for inference events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn InferenceObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn options(&self) -> &InferenceOptions {
        &self.opts
    }

    /// Get a handle to real-time metrics.
    pub fn metrics(&self) -> Arc<InferenceMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Infer (or apply hints to) every column, coercing the dataset in place.
    ///
    /// Column order and row positions are preserved. Never fails: columns no detector accepts
    /// are reported as [`TypeTag::Object`], and so are columns whose hint tag is unknown.
    pub fn run(&self, dataset: &mut DataSet) -> TypeReport {
        self.pool.install(|| self.run_impl(dataset))
    }

    fn run_impl(&self, dataset: &mut DataSet) -> TypeReport {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(InferenceEvent::RunStarted {
            dataset: dataset.name.clone(),
            columns: dataset.column_count(),
        });

        let hinted = self.hint_targets(&dataset.columns, &dataset.type_hints);
        let mut tags = vec![TypeTag::Object; dataset.column_count()];

        let mut pending: Vec<(usize, String, Vec<Value>)> = Vec::new();
        for (idx, column) in dataset.columns.iter_mut().enumerate() {
            match hinted.get(&idx) {
                Some(raw_tag) => tags[idx] = self.apply_hint(column, raw_tag),
                None => pending.push((idx, column.name.clone(), std::mem::take(&mut column.values))),
            }
        }

        let sem = Semaphore::new(self.opts.max_in_flight_columns);
        let inferred: Vec<_> = pending
            .into_par_iter()
            .map(|(idx, name, values)| {
                let permit = sem.acquire();
                let waited = permit.waited();
                if waited > Duration::ZERO {
                    self.metrics.on_throttle_wait(waited);
                    self.emit(InferenceEvent::ThrottleWaited { duration: waited });
                }

                self.metrics.on_column_start();
                self.emit(InferenceEvent::ColumnStarted { column: name.clone() });
                let column_start = Instant::now();

                let result = infer_column(values, &self.sentinels, &self.chain);

                self.emit(InferenceEvent::ColumnFinished {
                    column: name,
                    tag: result.tag,
                    detector: result.detector,
                    elapsed: column_start.elapsed(),
                });
                self.metrics.on_column_end();
                drop(permit);
                (idx, result)
            })
            .collect();

        for (idx, result) in inferred {
            dataset.columns[idx].values = result.values;
            tags[idx] = result.tag;
        }

        let report = TypeReport::new(
            dataset
                .columns
                .iter()
                .map(|c| c.name.clone())
                .zip(tags)
                .collect(),
        );

        self.metrics.end_run(start.elapsed());
        self.emit(InferenceEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });
        log::info!("[infer] data types after inference for '{}':\n{report}", dataset.name);

        report
    }

    /// Map column index -> raw hint tag. Later hints for the same column win.
    fn hint_targets<'a>(&self, columns: &[Column], hints: &'a [TypeHint]) -> HashMap<usize, &'a str> {
        let mut targets = HashMap::with_capacity(hints.len());
        for hint in hints {
            match columns.iter().position(|c| c.name == hint.column) {
                Some(idx) => {
                    targets.insert(idx, hint.tag.as_str());
                }
                None => {
                    log::warn!("[infer] type hint '{}' names missing column '{}'", hint.tag, hint.column);
                    self.emit(InferenceEvent::HintForMissingColumn {
                        column: hint.column.clone(),
                        tag: hint.tag.clone(),
                    });
                }
            }
        }
        targets
    }

    fn apply_hint(&self, column: &mut Column, raw_tag: &str) -> TypeTag {
        let values = std::mem::take(&mut column.values);
        match resolve_hint(values, raw_tag) {
            HintOutcome::Applied { tag, values } => {
                column.values = values;
                self.metrics.on_hint_applied();
                self.emit(InferenceEvent::HintApplied {
                    column: column.name.clone(),
                    tag,
                });
                tag
            }
            HintOutcome::UnknownTag { values } => {
                column.values = values;
                self.metrics.on_unknown_hint();
                log::warn!(
                    "[infer] ignoring unknown type hint '{raw_tag}' for column '{}'",
                    column.name
                );
                self.emit(InferenceEvent::UnknownHintTag {
                    column: column.name.clone(),
                    tag: raw_tag.to_owned(),
                });
                TypeTag::Object
            }
        }
    }

    fn emit(&self, event: InferenceEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

/// Infer and coerce `dataset` in place with default options.
pub fn infer_and_convert(dataset: &mut DataSet) -> InferenceResult<TypeReport> {
    Ok(InferenceEngine::new(InferenceOptions::default())?.run(dataset))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::{InferenceEngine, InferenceOptions};
    use crate::error::InferenceError;
    use crate::execution::{InferenceEvent, InferenceObserver};
    use crate::types::{Column, DataSet, TypeTag, Value};

    fn engine(num_threads: usize, max_in_flight_columns: usize) -> InferenceEngine {
        InferenceEngine::new(InferenceOptions {
            num_threads: Some(num_threads),
            max_in_flight_columns,
            ..Default::default()
        })
        .unwrap()
    }

    fn wide_dataset(columns: usize) -> DataSet {
        let cols = (0..columns)
            .map(|i| {
                let values = (0..50).map(|r| Value::Utf8(format!("{}", r * (i + 1)))).collect();
                Column::new(format!("c{i}"), values)
            })
            .collect();
        DataSet::new("wide", cols).unwrap()
    }

    struct ConcurrencyObserver {
        active: AtomicUsize,
        max_active: AtomicUsize,
        finished: Mutex<Vec<String>>,
    }

    impl ConcurrencyObserver {
        fn new() -> Self {
            Self {
                active: AtomicUsize::new(0),
                max_active: AtomicUsize::new(0),
                finished: Mutex::new(Vec::new()),
            }
        }
    }

    impl InferenceObserver for ConcurrencyObserver {
        fn on_event(&self, event: &InferenceEvent) {
            match event {
                InferenceEvent::ColumnStarted { .. } => {
                    let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
                    self.max_active.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(std::time::Duration::from_millis(2));
                }
                InferenceEvent::ColumnFinished { column, .. } => {
                    let _ = self.active.fetch_sub(1, Ordering::SeqCst);
                    self.finished.lock().unwrap().push(column.clone());
                }
                _ => {}
            }
        }
    }

    #[test]
    fn max_in_flight_columns_throttles_column_concurrency() {
        let observer = Arc::new(ConcurrencyObserver::new());
        let obs_trait: Arc<dyn InferenceObserver> = observer.clone();
        let engine = engine(4, 1).with_observer(obs_trait);

        let mut ds = wide_dataset(12);
        let report = engine.run(&mut ds);

        assert_eq!(report.len(), 12);
        assert_eq!(observer.max_active.load(Ordering::SeqCst), 1);
        assert_eq!(observer.finished.lock().unwrap().len(), 12);
    }

    #[test]
    fn results_keep_dataset_order_regardless_of_completion_order() {
        let mut ds = wide_dataset(16);
        let report = engine(4, 4).run(&mut ds);
        let names: Vec<&str> = report.iter().map(|(n, _)| n).collect();
        let expected: Vec<String> = (0..16).map(|i| format!("c{i}")).collect();
        assert_eq!(names, expected.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(ds.columns[0].name, "c0");
        assert_eq!(ds.columns[15].name, "c15");
    }

    #[test]
    fn metrics_are_available_after_run() {
        let engine = engine(2, 1);
        let metrics = engine.metrics();
        let mut ds = wide_dataset(6).with_type_hints(vec![("c0", Some("object")), ("c1", Some("nope"))]);

        engine.run(&mut ds);

        let snap = metrics.snapshot();
        assert_eq!(snap.run_id, 1);
        assert_eq!(snap.columns_started, 4);
        assert_eq!(snap.columns_finished, 4);
        assert_eq!(snap.hinted_columns, 1);
        assert_eq!(snap.unknown_hints, 1);
        assert_eq!(snap.max_active_columns, 1);
        assert!(snap.elapsed.is_some());
    }

    #[test]
    fn invalid_options_are_rejected() {
        let err = InferenceEngine::new(InferenceOptions {
            max_in_flight_columns: 0,
            ..Default::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, InferenceError::InvalidOptions { .. }));

        let err = InferenceEngine::new(InferenceOptions {
            categorical_threshold: 1.5,
            ..Default::default()
        })
        .err()
        .unwrap();
        assert!(err.to_string().contains("categorical_threshold"));
    }

    #[test]
    fn options_load_from_partial_json() {
        let opts = InferenceOptions::from_json_str(r#"{"num_threads": 2, "sentinels": ["n/a"]}"#).unwrap();
        assert_eq!(opts.num_threads, Some(2));
        assert_eq!(opts.sentinels, vec!["n/a".to_string()]);
        assert_eq!(opts.categorical_threshold, 0.5);

        let err = InferenceOptions::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, InferenceError::Config(_)));
    }

    #[test]
    fn configured_sentinels_replace_the_defaults() {
        let engine = InferenceEngine::new(InferenceOptions {
            num_threads: Some(1),
            sentinels: vec!["n/a".to_string()],
            ..Default::default()
        })
        .unwrap();
        let mut ds = DataSet::new(
            "s",
            vec![Column::new(
                "n",
                vec![Value::Utf8("1".into()), Value::Utf8("n/a".into()), Value::Utf8("2".into())],
            )],
        )
        .unwrap();
        let report = engine.run(&mut ds);
        assert_eq!(report.get("n"), Some(TypeTag::Int8));
        assert_eq!(ds.columns[0].values, vec![Value::Int8(1), Value::Null, Value::Int8(2)]);
    }
}
