//! Backtracking search over section hours.
//!
//! The engine is an explicit state machine over a decision stack rather
//! than a recursive function. Each decision level places one hour of one
//! section and remembers its ordered candidates, the candidate currently
//! committed, and the earlier levels that conflict with it. A dead end
//! jumps straight back to the deepest conflicting level
//! (conflict-directed backjumping), skipping at most
//! `max_backjump_depth` levels at once.
//!
//! The termination check runs before every node expansion, so a budget or
//! cancellation stops the engine at any depth with the store intact.

mod candidates;
mod decision;

use std::fmt;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, trace};

use timetabler_config::SearchConfig;
use timetabler_core::{Placement, Schedule, SectionId, TermDomain};
use timetabler_scoring::{AssignmentStore, HardConstraintSet, SoftConstraintSet};

use crate::scope::RestartScope;
use crate::termination::{StopReason, Termination};

use candidates::slot_bound;
pub(crate) use candidates::legal_placements;
pub use decision::Decision;

const NO_LEVEL: u32 = u32::MAX;

/// Where the engine is in its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Choose the next section hour to place.
    Selecting,
    /// Try the next candidate of the top decision.
    Assigning,
    /// Undo decisions after a dead end.
    Backtracking,
    Solved,
    Exhausted,
}

impl SearchState {
    pub fn is_final(self) -> bool {
        matches!(self, SearchState::Solved | SearchState::Exhausted)
    }
}

/// How a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Every searched section holds all of its hours.
    Solved,
    /// The search space ran out with no complete assignment.
    Exhausted,
    Stopped(StopReason),
}

impl SearchStatus {
    pub fn is_solved(self) -> bool {
        self == SearchStatus::Solved
    }

    pub fn stop_reason(self) -> Option<StopReason> {
        match self {
            SearchStatus::Stopped(reason) => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStatus::Solved => f.write_str("solved"),
            SearchStatus::Exhausted => f.write_str("exhausted"),
            SearchStatus::Stopped(reason) => write!(f, "stopped ({reason})"),
        }
    }
}

/// Depth-first search for a complete assignment of section hours.
///
/// Variable order is minimum remaining values: the section whose next hour
/// has the fewest legal (slot, room, faculty) options goes first. Value
/// order is ascending soft-cost marginal with a seeded random tie-break.
/// A section's hours are placed in increasing slot order.
///
/// # Examples
///
/// ```
/// use timetabler_config::SearchConfig;
/// use timetabler_scoring::{HardConstraintSet, SoftConstraintSet};
/// use timetabler_solver::scope::RestartScope;
/// use timetabler_solver::search::{SearchEngine, SearchStatus};
/// use timetabler_solver::termination::NodeCountTermination;
///
/// let domain = timetabler_test::scenario_a();
/// let mut engine = SearchEngine::new(
///     &domain,
///     HardConstraintSet::standard(),
///     SoftConstraintSet::default(),
///     &SearchConfig::default(),
///     NodeCountTermination::new(1_000),
/// );
/// let mut scope = RestartScope::new(0, 42);
/// assert_eq!(engine.run(&mut scope), SearchStatus::Solved);
/// assert_eq!(engine.store().len(), 2);
/// ```
#[derive(Debug)]
pub struct SearchEngine<'d, T> {
    store: AssignmentStore<'d>,
    soft: SoftConstraintSet,
    termination: T,
    max_backjump_depth: usize,
    active: Vec<bool>,
    priority: Vec<u64>,
    stack: Vec<Decision>,
    levels: Vec<u32>,
    slot_count: usize,
    best: Schedule,
    state: SearchState,
}

impl<'d, T: Termination> SearchEngine<'d, T> {
    pub fn new(
        domain: &'d TermDomain,
        hard: HardConstraintSet,
        soft: SoftConstraintSet,
        search: &SearchConfig,
        termination: T,
    ) -> Self {
        let sections = domain.sections().len();
        let slot_count = domain.slots().len();
        Self {
            store: AssignmentStore::with_constraints(domain, hard),
            soft,
            termination,
            max_backjump_depth: search.max_backjump_depth,
            active: vec![true; sections],
            priority: vec![0; sections],
            stack: Vec::new(),
            levels: vec![NO_LEVEL; sections * slot_count],
            slot_count,
            best: Schedule::default(),
            state: SearchState::Selecting,
        }
    }

    /// Searches only `sections`; every other section stays empty.
    pub fn with_sections(mut self, sections: &[SectionId]) -> Self {
        self.active.fill(false);
        for section in sections {
            self.active[section.index()] = true;
        }
        self
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn store(&self) -> &AssignmentStore<'d> {
        &self.store
    }

    /// Current decision stack, outermost level first.
    pub fn decisions(&self) -> &[Decision] {
        &self.stack
    }

    /// The most complete assignment seen so far.
    pub fn best_partial(&self) -> &Schedule {
        &self.best
    }

    /// Runs until solved, exhausted or stopped.
    ///
    /// A stopped engine keeps its state; running it again with a fresh
    /// budget resumes where it left off.
    pub fn run(&mut self, scope: &mut RestartScope) -> SearchStatus {
        if self.stack.is_empty() && self.state == SearchState::Selecting {
            for p in self.priority.iter_mut() {
                *p = scope.rng().random();
            }
        }

        let status = loop {
            match self.state {
                SearchState::Solved => break SearchStatus::Solved,
                SearchState::Exhausted => break SearchStatus::Exhausted,
                _ => {}
            }
            if let Some(reason) = self.termination.check(scope) {
                break SearchStatus::Stopped(reason);
            }
            scope.increment_node_count();
            self.state = match self.state {
                SearchState::Selecting => self.select(scope),
                SearchState::Assigning => self.assign(scope),
                SearchState::Backtracking => self.backtrack(scope),
                state => state,
            };
        };

        let stats = scope.statistics();
        debug!(
            event = "search_end",
            restart = scope.restart(),
            status = %status,
            placed = self.store.len(),
            best_placed = self.best.len(),
            nodes = stats.nodes_expanded,
            backtracks = stats.backtracks,
            backjumps = stats.backjumps,
            max_depth = stats.max_depth,
        );
        status
    }

    /// The store holding the best state reached: the current assignment if
    /// it is at least as complete as the best snapshot, the snapshot
    /// otherwise.
    pub fn into_best_store(self) -> AssignmentStore<'d> {
        let mut store = self.store;
        if store.len() < self.best.len() {
            store.clear();
            for p in self.best.iter() {
                let placed = store.try_assign(*p);
                debug_assert!(placed.is_ok(), "snapshot placement refused: {placed:?}");
            }
        }
        store
    }

    fn level_of(&self, p: &Placement) -> Option<usize> {
        level_in(&self.levels, self.slot_count, p)
    }

    fn select(&mut self, scope: &mut RestartScope) -> SearchState {
        let Some((section, options)) = self.most_constrained() else {
            return SearchState::Solved;
        };
        let (candidates, conflicts) = self.candidates(section, scope);
        trace!(
            event = "select",
            section = section.0,
            options,
            candidates = candidates.len(),
            depth = self.stack.len(),
        );
        self.stack.push(Decision::new(section, candidates, conflicts));
        scope.statistics_mut().record_depth(self.stack.len());
        SearchState::Assigning
    }

    fn assign(&mut self, scope: &mut RestartScope) -> SearchState {
        let level = self.stack.len().saturating_sub(1);
        let Some(decision) = self.stack.last_mut() else {
            return SearchState::Exhausted;
        };
        let Some(candidate) = decision.next_candidate() else {
            return SearchState::Backtracking;
        };

        match self.store.try_assign(candidate) {
            Ok(()) => {
                decision.commit(candidate);
                self.levels[cell(self.slot_count, &candidate)] = level as u32;
                scope.statistics_mut().placements += 1;
                if self.store.len() > self.best.len() {
                    self.best = self.store.freeze();
                }
                SearchState::Selecting
            }
            Err(violation) => {
                if let Some(b) = violation.blocker {
                    if let Some(l) = level_in(&self.levels, self.slot_count, &b) {
                        decision.add_conflict(l, slot_bound(&self.store, &b, &candidate));
                    }
                }
                SearchState::Assigning
            }
        }
    }

    fn backtrack(&mut self, scope: &mut RestartScope) -> SearchState {
        let Some(dead) = self.stack.pop() else {
            return SearchState::Exhausted;
        };
        if let Some(p) = dead.placed() {
            self.remove(p);
        }
        let conflicts = dead.into_conflicts();

        // No conflicting level means no earlier choice can help.
        let Some(wanted) = conflicts.deepest() else {
            return SearchState::Exhausted;
        };
        let depth = self.stack.len();
        let previous = depth.saturating_sub(1);
        let target = wanted.max(previous.saturating_sub(self.max_backjump_depth));
        let skipped = previous.saturating_sub(target);

        while self.stack.len() > target + 1 {
            if let Some(p) = self.stack.pop().and_then(|d| d.placed()) {
                self.remove(p);
            }
        }
        let stats = scope.statistics_mut();
        if skipped > 0 {
            stats.backjumps += 1;
            stats.levels_skipped += skipped as u64;
            trace!(event = "backjump", from = depth, to = target, skipped);
        } else {
            stats.backtracks += 1;
        }

        let retracted = match self.stack.last_mut() {
            Some(decision) => {
                let p = decision.take_placed();
                if let Some(p) = p.filter(|_| conflicts.is_slot_bound(target)) {
                    // other rooms and faculty in this slot fail the same way
                    let discarded = decision.discard_slot(p.slot);
                    stats.candidates_discarded += discarded as u64;
                }
                decision.absorb(conflicts, target);
                p
            }
            None => return SearchState::Exhausted,
        };
        if let Some(p) = retracted {
            self.remove(p);
        }
        SearchState::Assigning
    }

    fn remove(&mut self, p: Placement) {
        self.store.unassign(p.section, p.slot);
        self.levels[cell(self.slot_count, &p)] = NO_LEVEL;
    }
}

fn cell(slot_count: usize, p: &Placement) -> usize {
    p.section.index() * slot_count + p.slot.index()
}

fn level_in(levels: &[u32], slot_count: usize, p: &Placement) -> Option<usize> {
    match levels[cell(slot_count, p)] {
        NO_LEVEL => None,
        level => Some(level as usize),
    }
}
