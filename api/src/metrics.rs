use parking_lot::Mutex;
use std::{collections::BTreeMap, time::Duration};

/// Events counted by the pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Counter {
    /// constraints emitted by a compilation
    ConstraintsCompiled,
    /// variables allocated by a compilation, the constant one included
    VariablesAllocated,
    #[allow(missing_docs)]
    ProofsProduced,
    #[allow(missing_docs)]
    VerificationsAccepted,
    #[allow(missing_docs)]
    VerificationsRejected,
}

/// Phases timed by the pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Phase {
    Compile,
    Setup,
    Expand,
    Prove,
    Verify,
}

/// Receives counters and phase timings. Implementations must be cheap; the pipeline calls
/// them on every operation.
pub trait MetricsSink: Send + Sync {
    /// Add `n` to `counter`.
    fn incr(&self, counter: Counter, n: u64);

    /// Record that `phase` took `elapsed`.
    fn observe(&self, phase: Phase, elapsed: Duration);
}

/// Drops everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn incr(&self, _counter: Counter, _n: u64) {}

    fn observe(&self, _phase: Phase, _elapsed: Duration) {}
}

/// Keeps every counter and timing in memory.
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    counters: Mutex<BTreeMap<Counter, u64>>,
    timings: Mutex<BTreeMap<Phase, Vec<Duration>>>,
}

impl RecordingMetrics {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current value of `counter`.
    pub fn counter(&self, counter: Counter) -> u64 {
        self.counters.lock().get(&counter).copied().unwrap_or(0)
    }

    /// Every duration recorded for `phase`, oldest first.
    pub fn timings(&self, phase: Phase) -> Vec<Duration> {
        self.timings.lock().get(&phase).cloned().unwrap_or_default()
    }
}

impl MetricsSink for RecordingMetrics {
    fn incr(&self, counter: Counter, n: u64) {
        *self.counters.lock().entry(counter).or_insert(0) += n;
    }

    fn observe(&self, phase: Phase, elapsed: Duration) {
        self.timings.lock().entry(phase).or_default().push(elapsed);
    }
}

impl<M: MetricsSink + ?Sized> MetricsSink for &M {
    fn incr(&self, counter: Counter, n: u64) {
        (**self).incr(counter, n)
    }

    fn observe(&self, phase: Phase, elapsed: Duration) {
        (**self).observe(phase, elapsed)
    }
}
