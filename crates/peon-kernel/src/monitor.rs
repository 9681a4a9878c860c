//! [`LoopMonitor`] – per-behavior loop health.
//!
//! Every behavior loop reports its state transitions and run outcomes here.
//! The monitor keeps counters and timestamps per behavior so a supervisor
//! (the console `/status` command, tests) can see what each loop is doing
//! and which loops have been stuck inside a single run for too long.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use peon_types::BehaviorKind;
use tracing::warn;

// ────────────────────────────────────────────────────────────────────────────
// Public types
// ────────────────────────────────────────────────────────────────────────────

/// Where a behavior loop currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the agent state the behavior needs.
    AwaitingReadiness,
    /// Parked on a clear gate.
    Idle,
    /// Holding its resources and executing.
    Active,
    /// Between runs.
    Sleeping,
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AwaitingReadiness => "awaiting-readiness",
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Sleeping => "sleeping",
        };
        f.write_str(s)
    }
}

/// How one run of a behavior ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The behavior returned `Ok(true)`.
    Succeeded,
    /// The behavior returned `Ok(false)`.
    Missed,
    /// The behavior returned an error.
    Failed,
    /// The behavior panicked.
    Faulted,
}

/// Snapshot of one behavior loop.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopRecord {
    pub state: LoopState,
    pub runs: u64,
    pub successes: u64,
    pub misses: u64,
    pub failures: u64,
    pub faults: u64,
    /// Start of the run in progress, if any.
    pub started: Option<Instant>,
    pub last_outcome: Option<RunOutcome>,
    pub last_finished_at: Option<DateTime<Utc>>,
}

impl Default for LoopRecord {
    fn default() -> Self {
        Self {
            state: LoopState::AwaitingReadiness,
            runs: 0,
            successes: 0,
            misses: 0,
            failures: 0,
            faults: 0,
            started: None,
            last_outcome: None,
            last_finished_at: None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LoopMonitor
// ────────────────────────────────────────────────────────────────────────────

/// Shared table of [`LoopRecord`]s, one per registered behavior.
///
/// # Example
///
/// ```
/// use peon_kernel::{LoopMonitor, LoopState, RunOutcome};
/// use peon_types::BehaviorKind;
///
/// let monitor = LoopMonitor::new([BehaviorKind::Eat]);
/// monitor.begin(BehaviorKind::Eat);
/// monitor.finish(BehaviorKind::Eat, RunOutcome::Missed);
///
/// let record = monitor.record(BehaviorKind::Eat).unwrap();
/// assert_eq!(record.runs, 1);
/// assert_eq!(record.misses, 1);
/// assert_eq!(record.state, LoopState::Sleeping);
/// ```
#[derive(Default)]
pub struct LoopMonitor {
    records: Mutex<BTreeMap<BehaviorKind, LoopRecord>>,
}

impl LoopMonitor {
    pub fn new(kinds: impl IntoIterator<Item = BehaviorKind>) -> Self {
        Self {
            records: Mutex::new(kinds.into_iter().map(|k| (k, LoopRecord::default())).collect()),
        }
    }

    /// Record that the loop for `kind` moved to `state`.
    ///
    /// No-ops for unregistered behaviors.
    pub fn transition(&self, kind: BehaviorKind, state: LoopState) {
        if let Some(record) = self.records.lock().get_mut(&kind) {
            record.state = state;
        }
    }

    /// Mark the start of a run.
    pub fn begin(&self, kind: BehaviorKind) {
        if let Some(record) = self.records.lock().get_mut(&kind) {
            record.state = LoopState::Active;
            record.started = Some(Instant::now());
        }
    }

    /// Close the run in progress with `outcome`.
    pub fn finish(&self, kind: BehaviorKind, outcome: RunOutcome) {
        if let Some(record) = self.records.lock().get_mut(&kind) {
            record.state = LoopState::Sleeping;
            record.started = None;
            record.runs += 1;
            match outcome {
                RunOutcome::Succeeded => record.successes += 1,
                RunOutcome::Missed => record.misses += 1,
                RunOutcome::Failed => record.failures += 1,
                RunOutcome::Faulted => record.faults += 1,
            }
            record.last_outcome = Some(outcome);
            record.last_finished_at = Some(Utc::now());
        }
    }

    pub fn record(&self, kind: BehaviorKind) -> Option<LoopRecord> {
        self.records.lock().get(&kind).cloned()
    }

    /// All records in [`BehaviorKind`] order.
    pub fn snapshot(&self) -> Vec<(BehaviorKind, LoopRecord)> {
        self.records
            .lock()
            .iter()
            .map(|(k, r)| (*k, r.clone()))
            .collect()
    }

    /// Behaviors whose current run has lasted longer than `deadline`.
    pub fn stalled(&self, deadline: Duration) -> Vec<BehaviorKind> {
        let stalled: Vec<_> = self
            .records
            .lock()
            .iter()
            .filter(|(_, r)| r.started.is_some_and(|t| t.elapsed() > deadline))
            .map(|(k, _)| *k)
            .collect();
        for kind in &stalled {
            warn!(behavior = %kind, ?deadline, "behavior run exceeded deadline");
        }
        stalled
    }
}
