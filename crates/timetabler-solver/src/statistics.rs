//! Search statistics collection and reporting.
//!
//! Each restart keeps its own [`SearchStatistics`] in its scope. The
//! generator folds finished restarts into a shared [`StatisticsCollector`],
//! which is safe to update from worker threads.

use std::ops::AddAssign;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use timetabler_core::HardSoftCost;

/// Counters for one restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStatistics {
    /// Iterations of the search state machine.
    pub nodes_expanded: u64,
    /// Candidates committed to the store.
    pub placements: u64,
    /// Returns to the immediately preceding decision.
    pub backtracks: u64,
    /// Returns that skipped at least one decision.
    pub backjumps: u64,
    /// Decisions skipped over by backjumps.
    pub levels_skipped: u64,
    /// Untried candidates dropped because their slot already failed.
    pub candidates_discarded: u64,
    /// Deepest decision stack reached.
    pub max_depth: usize,
    /// Improving relocations applied after a complete schedule was found.
    pub refinement_moves: u64,
}

impl SearchStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_depth(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
    }

    /// Returns the share of dead ends resolved by a backjump.
    pub fn backjump_rate(&self) -> f64 {
        let total = self.backtracks + self.backjumps;
        if total == 0 {
            0.0
        } else {
            self.backjumps as f64 / total as f64
        }
    }
}

impl AddAssign for SearchStatistics {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes_expanded += rhs.nodes_expanded;
        self.placements += rhs.placements;
        self.backtracks += rhs.backtracks;
        self.backjumps += rhs.backjumps;
        self.levels_skipped += rhs.levels_skipped;
        self.candidates_discarded += rhs.candidates_discarded;
        self.max_depth = self.max_depth.max(rhs.max_depth);
        self.refinement_moves += rhs.refinement_moves;
    }
}

/// A new best cost reported by a finished restart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostImprovement {
    /// Time since generation started.
    pub time_offset: Duration,
    pub restart: usize,
    pub cost: HardSoftCost,
}

/// Totals for a whole generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationStatistics {
    pub total_duration: Duration,
    /// Restarts that ran to an end, including cancelled ones.
    pub restarts_completed: usize,
    /// Summed counters of every restart; `max_depth` is the deepest.
    pub totals: SearchStatistics,
    /// Best-so-far costs in the order restarts finished.
    pub cost_history: Vec<CostImprovement>,
}

impl GenerationStatistics {
    /// Best cost seen, if any restart finished.
    pub fn best_cost(&self) -> Option<HardSoftCost> {
        self.cost_history.last().map(|i| i.cost)
    }

    pub fn improvement_count(&self) -> usize {
        self.cost_history.len()
    }
}

/// Thread-safe collector for generation statistics.
#[derive(Debug)]
pub struct StatisticsCollector {
    start_time: Instant,
    restarts: AtomicUsize,
    nodes_expanded: AtomicU64,
    totals: Mutex<SearchStatistics>,
    cost_history: Mutex<Vec<CostImprovement>>,
}

impl StatisticsCollector {
    /// Creates a collector; the start time is recorded now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            restarts: AtomicUsize::new(0),
            nodes_expanded: AtomicU64::new(0),
            totals: Mutex::new(SearchStatistics::default()),
            cost_history: Mutex::new(Vec::new()),
        }
    }

    /// Folds in the counters of a finished restart.
    pub fn record_restart(&self, statistics: &SearchStatistics) {
        self.restarts.fetch_add(1, Ordering::Relaxed);
        self.nodes_expanded
            .fetch_add(statistics.nodes_expanded, Ordering::Relaxed);
        *self.totals.lock().unwrap_or_else(PoisonError::into_inner) += *statistics;
    }

    /// Records `cost` if it beats every cost recorded so far.
    ///
    /// Returns the best cost after the update, so the reported sequence
    /// never increases.
    pub fn record_cost(&self, restart: usize, cost: HardSoftCost) -> HardSoftCost {
        let mut history = self
            .cost_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match history.last() {
            Some(best) if best.cost <= cost => best.cost,
            _ => {
                history.push(CostImprovement {
                    time_offset: self.start_time.elapsed(),
                    restart,
                    cost,
                });
                cost
            }
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn restarts_completed(&self) -> usize {
        self.restarts.load(Ordering::Relaxed)
    }

    pub fn current_nodes_expanded(&self) -> u64 {
        self.nodes_expanded.load(Ordering::Relaxed)
    }

    /// Takes a snapshot without consuming the collector.
    pub fn snapshot(&self) -> GenerationStatistics {
        GenerationStatistics {
            total_duration: self.start_time.elapsed(),
            restarts_completed: self.restarts_completed(),
            totals: *self.totals.lock().unwrap_or_else(PoisonError::into_inner),
            cost_history: self
                .cost_history
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }

    pub fn into_statistics(self) -> GenerationStatistics {
        GenerationStatistics {
            total_duration: self.start_time.elapsed(),
            restarts_completed: self.restarts.into_inner(),
            totals: self.totals.into_inner().unwrap_or_else(PoisonError::into_inner),
            cost_history: self
                .cost_history
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }
}

impl Default for StatisticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_deepest() {
        let mut a = SearchStatistics {
            nodes_expanded: 10,
            backtracks: 2,
            max_depth: 7,
            ..SearchStatistics::default()
        };
        a += SearchStatistics {
            nodes_expanded: 5,
            backjumps: 2,
            max_depth: 3,
            ..SearchStatistics::default()
        };
        assert_eq!(a.nodes_expanded, 15);
        assert_eq!(a.max_depth, 7);
        assert!((a.backjump_rate() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_backjump_rate_without_dead_ends() {
        assert_eq!(SearchStatistics::new().backjump_rate(), 0.0);
    }

    #[test]
    fn test_cost_history_never_increases() {
        let collector = StatisticsCollector::new();
        assert_eq!(collector.record_cost(0, HardSoftCost::of(2, 0.0)), HardSoftCost::of(2, 0.0));
        assert_eq!(collector.record_cost(1, HardSoftCost::of(3, 0.0)), HardSoftCost::of(2, 0.0));
        assert_eq!(collector.record_cost(2, HardSoftCost::of(0, 9.0)), HardSoftCost::of(0, 9.0));

        let stats = collector.into_statistics();
        let restarts: Vec<usize> = stats.cost_history.iter().map(|i| i.restart).collect();
        assert_eq!(restarts, vec![0, 2]);
        assert_eq!(stats.best_cost(), Some(HardSoftCost::of(0, 9.0)));
    }

    #[test]
    fn test_collector_thread_safety() {
        let collector = StatisticsCollector::new();
        let restart = SearchStatistics {
            nodes_expanded: 3,
            ..SearchStatistics::default()
        };

        rayon::scope(|s| {
            for _ in 0..4 {
                s.spawn(|_| {
                    for _ in 0..250 {
                        collector.record_restart(&restart);
                    }
                });
            }
        });

        assert_eq!(collector.restarts_completed(), 1000);
        assert_eq!(collector.current_nodes_expanded(), 3000);
        assert_eq!(collector.snapshot().totals.nodes_expanded, 3000);
    }
}
