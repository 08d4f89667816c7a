//! Local search statistics.

use std::time::{Duration, Instant};

/// Counters collected over one [`LocalSearch::run`](crate::LocalSearch::run).
///
/// # Example
///
/// ```
/// use steinerforge_local::LocalSearchStats;
///
/// let mut stats = LocalSearchStats::default();
/// stats.start();
/// stats.record_pass();
/// stats.record_elimination();
/// stats.record_exchange();
/// stats.record_committed(0, 1);
/// stats.finish();
///
/// assert_eq!(stats.passes, 1);
/// assert_eq!(stats.moves_evaluated(), 2);
/// assert_eq!(stats.moves_accepted(), 1);
/// assert_eq!(stats.acceptance_rate(), 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalSearchStats {
    start_time: Option<Instant>,
    elapsed: Option<Duration>,
    /// Key-vertex passes started.
    pub passes: u64,
    /// Vertices inserted by vertex insertion.
    pub vertex_insertions: u64,
    /// Accepted greedy extension steps.
    pub extension_steps: u64,
    /// Key-vertex eliminations evaluated.
    pub eliminations_evaluated: u64,
    /// Key-vertex eliminations applied in committed passes.
    pub eliminations_accepted: u64,
    /// Key-path exchanges evaluated.
    pub exchanges_evaluated: u64,
    /// Key-path exchanges applied in committed passes.
    pub exchanges_accepted: u64,
    /// Passes aborted on an inconsistent tree.
    pub aborted_passes: u64,
    /// Phase results discarded after normalization.
    pub rollbacks: u64,
}

impl LocalSearchStats {
    /// Marks the start of the run.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.elapsed = None;
    }

    /// Freezes the elapsed time.
    pub fn finish(&mut self) {
        self.elapsed = Some(self.elapsed());
    }

    /// Time since [`start`](Self::start), or the frozen run time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
            .unwrap_or_else(|| self.start_time.map(|t| t.elapsed()).unwrap_or_default())
    }

    pub fn record_pass(&mut self) {
        self.passes += 1;
    }

    pub fn record_elimination(&mut self) {
        self.eliminations_evaluated += 1;
    }

    pub fn record_exchange(&mut self) {
        self.exchanges_evaluated += 1;
    }

    /// Counts the moves of a pass whose result was kept.
    pub fn record_committed(&mut self, eliminations: u64, exchanges: u64) {
        self.eliminations_accepted += eliminations;
        self.exchanges_accepted += exchanges;
    }

    /// Key-vertex moves evaluated.
    pub fn moves_evaluated(&self) -> u64 {
        self.eliminations_evaluated + self.exchanges_evaluated
    }

    /// Key-vertex moves applied.
    pub fn moves_accepted(&self) -> u64 {
        self.eliminations_accepted + self.exchanges_accepted
    }

    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        let evaluated = self.moves_evaluated();
        if evaluated == 0 {
            0.0
        } else {
            self.moves_accepted() as f64 / evaluated as f64
        }
    }
}
