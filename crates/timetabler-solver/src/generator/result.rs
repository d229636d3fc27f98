use std::fmt;

use serde::Serialize;

use timetabler_core::{HardSoftCost, Schedule, SectionId, TermDomain, TimetableEntry};
use timetabler_scoring::ScheduleReport;

use crate::search::SearchStatus;
use crate::statistics::{GenerationStatistics, SearchStatistics};
use crate::termination::StopReason;

/// Why a section is missing hours in the returned schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No room of the right kind holds the section's headcount.
    NoCompatibleRoom,
    /// No faculty member may teach the section.
    NoQualifiedFaculty,
    /// The grid has fewer slots than the section's weekly hours.
    NotEnoughSlots,
    /// Search proved no legal joint placement exists.
    SearchExhausted,
    /// The budget ran out first.
    BudgetExceeded,
    /// The run was cancelled first.
    Cancelled,
}

impl UnresolvedReason {
    pub(crate) fn from_status(status: SearchStatus) -> Self {
        match status {
            SearchStatus::Solved | SearchStatus::Exhausted => UnresolvedReason::SearchExhausted,
            SearchStatus::Stopped(StopReason::Cancelled) => UnresolvedReason::Cancelled,
            SearchStatus::Stopped(_) => UnresolvedReason::BudgetExceeded,
        }
    }
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnresolvedReason::NoCompatibleRoom => "no compatible room",
            UnresolvedReason::NoQualifiedFaculty => "no qualified faculty",
            UnresolvedReason::NotEnoughSlots => "not enough slots",
            UnresolvedReason::SearchExhausted => "no legal placement left",
            UnresolvedReason::BudgetExceeded => "budget exceeded",
            UnresolvedReason::Cancelled => "cancelled",
        })
    }
}

/// A section whose placed hours fall short of its weekly hours.
///
/// Its legal partial placements stay in the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedSection {
    pub section: SectionId,
    pub key: String,
    pub required_hours: u16,
    pub placed_hours: u16,
    pub reason: UnresolvedReason,
}

/// Outcome of one restart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestartSummary {
    pub restart: usize,
    pub seed: u64,
    pub status: SearchStatus,
    /// Set when refinement, not search, was cut short.
    pub refinement_stopped: Option<StopReason>,
    pub cost: HardSoftCost,
    pub statistics: SearchStatistics,
}

impl RestartSummary {
    /// The limit that stopped this restart, search or refinement.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.status.stop_reason().or(self.refinement_stopped)
    }
}

/// Everything a generation run returns.
///
/// A plain value: the generator keeps nothing from one run to the next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub schedule: Schedule,
    pub report: ScheduleReport,
    pub unresolved_sections: Vec<UnresolvedSection>,
    /// True if any restart that was not cancelled stopped on a budget limit.
    pub budget_exceeded: bool,
    /// Base seed of the run.
    pub seed: u64,
    /// Restart whose schedule was chosen.
    pub best_restart: usize,
    /// Every restart in restart order.
    pub restarts: Vec<RestartSummary>,
    pub statistics: GenerationStatistics,
}

impl GenerationResult {
    pub fn cost(&self) -> HardSoftCost {
        self.report.cost
    }

    pub fn is_feasible(&self) -> bool {
        self.report.is_feasible()
    }

    /// True when every section holds all of its weekly hours.
    pub fn is_complete(&self) -> bool {
        self.unresolved_sections.is_empty()
    }

    /// Calendar rows of the chosen schedule.
    pub fn entries(&self, domain: &TermDomain) -> Vec<TimetableEntry> {
        self.schedule.entries(domain)
    }
}
