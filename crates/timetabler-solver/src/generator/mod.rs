//! Restart orchestration.
//!
//! A run loads nothing and keeps nothing: it takes a resolved
//! [`TermDomain`], runs `restart_count` independent searches with seeds
//! derived from the base seed, scores each schedule, and returns the
//! cheapest as a [`GenerationResult`].

mod result;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use timetabler_config::{ConfigError, GeneratorConfig, ThreadCount};
use timetabler_core::{Schedule, SectionId, TermDomain};
use timetabler_scoring::{ScheduleReport, Scorer};

use crate::complete::complete_greedily;
use crate::event::{ProgressEvent, ProgressEventSupport, ProgressListener};
use crate::feasibility::infeasible_sections;
use crate::refine::Refiner;
use crate::scope::{restart_seed, RestartScope};
use crate::search::{SearchEngine, SearchStatus};
use crate::statistics::StatisticsCollector;
use crate::termination::{
    ExternalTermination, NodeCountTermination, OrTermination, StopReason, TimeTermination,
};

pub use result::{GenerationResult, RestartSummary, UnresolvedReason, UnresolvedSection};

/// Generates timetables from a term.
///
/// Restarts run on a rayon pool sized by `thread_count`, or one after
/// another for `ThreadCount::None`. Each restart owns its store; the domain
/// is shared read-only. Once a restart returns a legal schedule whose soft
/// cost is below `acceptance.soft_cost_threshold`, the others are cancelled
/// at their next node.
///
/// # Examples
///
/// ```
/// use timetabler_config::GeneratorConfig;
/// use timetabler_solver::TimetableGenerator;
///
/// let domain = timetabler_test::scenario_a();
/// let config = GeneratorConfig::new().with_random_seed(1).with_node_limit(10_000);
/// let result = TimetableGenerator::new(config).unwrap().generate(&domain);
///
/// assert!(result.is_complete());
/// assert_eq!(result.schedule.len(), 2);
/// ```
#[derive(Debug)]
pub struct TimetableGenerator {
    config: GeneratorConfig,
    scorer: Scorer,
    events: ProgressEventSupport,
    stop_flag: Option<Arc<AtomicBool>>,
}

impl TimetableGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration fails
    /// validation.
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            scorer: Scorer::from_config(&config),
            config,
            events: ProgressEventSupport::new(),
            stop_flag: None,
        })
    }

    pub fn with_listener(mut self, listener: Arc<dyn ProgressListener>) -> Self {
        self.events.add_listener(listener);
        self
    }

    /// Stops every restart at its next node once `flag` is set.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Runs every restart and returns the cheapest schedule.
    ///
    /// Schedules are ranked by hard cost, then soft cost, then restart
    /// index.
    pub fn generate(&self, domain: &TermDomain) -> GenerationResult {
        let start = Instant::now();
        let seed = self.config.seed();
        let restarts = self.config.restart_count;

        let infeasible = infeasible_sections(domain);
        let searchable: Vec<SectionId> = domain
            .sections()
            .iter()
            .map(|s| s.id)
            .filter(|id| !infeasible.iter().any(|(s, _)| s == id))
            .collect();

        info!(
            event = "generation_start",
            sections = domain.sections().len(),
            weekly_hours = domain.total_weekly_hours(),
            infeasible = infeasible.len(),
            restarts,
            seed,
        );
        self.events.fire(&ProgressEvent::GenerationStarted {
            sections: domain.sections().len(),
            weekly_hours: domain.total_weekly_hours(),
            restarts,
            seed,
        });

        let run = Run {
            generator: self,
            domain,
            searchable: &searchable,
            seed,
            deadline: self.config.time_limit().map(|limit| start + limit),
            node_limit: self.config.node_limit(),
            cancel: AtomicBool::new(false),
            collector: StatisticsCollector::new(),
            progress: Mutex::new(()),
        };
        let outcomes: Vec<RestartOutcome> = match self.thread_pool() {
            Some(pool) => pool.install(|| {
                (0..restarts)
                    .into_par_iter()
                    .map(|r| run.restart(r))
                    .collect()
            }),
            None => (0..restarts).map(|r| run.restart(r)).collect(),
        };
        let statistics = run.collector.into_statistics();

        let best_restart = outcomes
            .iter()
            .enumerate()
            .min_by_key(|(i, o)| (o.report.cost, *i))
            .map_or(0, |(i, _)| i);
        let summaries: Vec<RestartSummary> = outcomes.iter().map(|o| o.summary.clone()).collect();
        let budget_exceeded = summaries
            .iter()
            .any(|s| s.stop_reason().is_some_and(StopReason::is_budget));

        let (schedule, report, status) = match outcomes.into_iter().nth(best_restart) {
            Some(best) => (best.schedule, best.report, best.summary.status),
            None => {
                let empty = Schedule::default();
                let report = self.scorer.score(domain, &empty);
                (empty, report, SearchStatus::Exhausted)
            }
        };

        let unresolved_sections: Vec<UnresolvedSection> = domain
            .sections()
            .iter()
            .filter_map(|section| {
                let placed = schedule.hours_for(section.id) as u16;
                if placed >= section.weekly_hours {
                    return None;
                }
                let reason = infeasible
                    .iter()
                    .find(|(s, _)| *s == section.id)
                    .map_or_else(|| UnresolvedReason::from_status(status), |(_, r)| *r);
                Some(UnresolvedSection {
                    section: section.id,
                    key: section.key.clone(),
                    required_hours: section.weekly_hours,
                    placed_hours: placed,
                    reason,
                })
            })
            .collect();

        let elapsed = start.elapsed();
        info!(
            event = "generation_end",
            cost = %report.cost,
            best_restart,
            placed = schedule.len(),
            unresolved = unresolved_sections.len(),
            budget_exceeded,
            duration_ms = elapsed.as_millis() as u64,
        );
        self.events.fire(&ProgressEvent::GenerationFinished {
            cost: report.cost,
            best_restart,
            budget_exceeded,
            elapsed,
        });

        GenerationResult {
            schedule,
            report,
            unresolved_sections,
            budget_exceeded,
            seed,
            best_restart,
            restarts: summaries,
            statistics,
        }
    }

    fn thread_pool(&self) -> Option<rayon::ThreadPool> {
        let threads = match self.config.thread_count {
            ThreadCount::None => return None,
            _ if self.config.restart_count < 2 => return None,
            ThreadCount::Auto => 0,
            ThreadCount::Count(n) => n,
        };
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => {
                debug!(event = "thread_pool", threads = pool.current_num_threads());
                Some(pool)
            }
            Err(err) => {
                warn!(event = "thread_pool_unavailable", error = %err);
                None
            }
        }
    }
}

struct RestartOutcome {
    summary: RestartSummary,
    schedule: Schedule,
    report: ScheduleReport,
}

/// State shared by the restarts of one run.
struct Run<'a> {
    generator: &'a TimetableGenerator,
    domain: &'a TermDomain,
    searchable: &'a [SectionId],
    seed: u64,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
    cancel: AtomicBool,
    collector: StatisticsCollector,
    /// Serializes progress events so best-so-far costs arrive in order.
    progress: Mutex<()>,
}

impl Run<'_> {
    fn restart(&self, restart: usize) -> RestartOutcome {
        let config = &self.generator.config;
        let scorer = &self.generator.scorer;
        let seed = restart_seed(self.seed, restart);
        let mut scope = RestartScope::new(restart, seed);

        let termination = OrTermination((
            self.deadline.map(TimeTermination::new),
            self.node_limit.map(NodeCountTermination::new),
            ExternalTermination::new(&self.cancel),
            self.generator
                .stop_flag
                .as_deref()
                .map(ExternalTermination::new),
        ));

        let mut engine = SearchEngine::new(
            self.domain,
            scorer.hard_constraints().clone(),
            scorer.soft_constraints().clone(),
            &config.search,
            termination,
        )
        .with_sections(self.searchable);
        let status = engine.run(&mut scope);
        let mut store = engine.into_best_store();

        let refinement_stopped = match status {
            SearchStatus::Solved => Refiner::new(
                scorer.soft_constraints(),
                config.search.refinement_pass_limit,
            )
            .refine(&mut store, &termination, &mut scope),
            SearchStatus::Exhausted => {
                complete_greedily(&mut store, scorer.soft_constraints(), self.searchable);
                None
            }
            SearchStatus::Stopped(_) => None,
        };

        let schedule = store.freeze();
        let report = scorer.score(self.domain, &schedule);
        let cost = report.cost;
        let elapsed = scope.elapsed();
        let statistics = scope.into_statistics();

        if let Some(threshold) = config.acceptance.soft_cost_threshold {
            if cost.is_feasible()
                && cost.soft() < threshold
                && !self.cancel.swap(true, Ordering::Relaxed)
            {
                info!(event = "threshold_met", restart, cost = %cost, threshold);
            }
        }
        info!(
            event = "restart_end",
            restart,
            seed,
            status = %status,
            cost = %cost,
            nodes = statistics.nodes_expanded,
            backtracks = statistics.backtracks,
            backjumps = statistics.backjumps,
            refinement_moves = statistics.refinement_moves,
            duration_ms = elapsed.as_millis() as u64,
        );

        {
            let _order = self.progress.lock().unwrap_or_else(PoisonError::into_inner);
            self.collector.record_restart(&statistics);
            let best_cost = self.collector.record_cost(restart, cost);
            self.generator.events.fire(&ProgressEvent::RestartCompleted {
                restart,
                completed: self.collector.restarts_completed(),
                restarts: config.restart_count,
                status,
                cost,
                best_cost,
            });
        }

        RestartOutcome {
            summary: RestartSummary {
                restart,
                seed,
                status,
                refinement_stopped,
                cost,
                statistics,
            },
            schedule,
            report,
        }
    }
}

#[cfg(test)]
mod tests;
