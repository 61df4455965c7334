//! Rank observer: hooks for logging, profiling, and debugging.
//!
//! Observers receive notifications at iteration boundaries without coupling
//! to the iteration logic. Use cases include progress logging, capturing the
//! per-iteration mass for diagnostics, and emitting structured telemetry.

use std::time::{Duration, Instant};

/// Snapshot reported after each completed iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationReport {
    /// 1-based iteration index
    pub iteration: usize,
    /// Perplexity of the new rank vector
    pub perplexity: f64,
    /// Absolute perplexity change from the previous vector
    pub delta: f64,
    /// Sum of the new rank vector
    pub mass: f64,
    /// Mass held by sink pages before this iteration
    pub sink_mass: f64,
    pub elapsed: Duration,
}

/// Receives callbacks from a ranking run
///
/// All methods have empty defaults so implementors only override what they
/// need.
pub trait RankObserver {
    /// Called once before the first iteration
    fn on_start(&mut self, _pages: usize, _initial_perplexity: f64) {}

    /// Called after every iteration
    fn on_iteration(&mut self, _report: &IterationReport) {}

    /// Called once when the run stops
    fn on_finish(&mut self, _iterations: usize, _converged: bool) {}
}

/// Observer that ignores every callback
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RankObserver for NoopObserver {}

/// Observer that keeps every iteration report
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub reports: Vec<IterationReport>,
    pub finished: Option<(usize, bool)>,
}

impl RankObserver for RecordingObserver {
    fn on_iteration(&mut self, report: &IterationReport) {
        self.reports.push(*report);
    }

    fn on_finish(&mut self, iterations: usize, converged: bool) {
        self.finished = Some((iterations, converged));
    }
}

/// Wall-clock timer for a single iteration
#[derive(Debug)]
pub(crate) struct IterationClock(Instant);

impl IterationClock {
    pub(crate) fn start() -> Self {
        Self(Instant::now())
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}
