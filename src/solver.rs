use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::enumerator::PathEnumerator;
use crate::feasibility::is_feasible;
use crate::flow::Flow;
use crate::mask::CellMask;
use crate::topology::GridTopology;

/// Knobs for [`Board::solve_with`](crate::Board::solve_with).
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Before expanding a partial path, check that every later flow can still be joined around it.
    ///
    /// Turning this off never changes whether a solution is found, only how long finding it takes.
    pub forward_checking: bool,
    /// Give up once this much time has passed.
    pub timeout: Option<Duration>,
    /// Give up after expanding this many search states.
    pub max_states: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            forward_checking: true,
            timeout: None,
            max_states: None,
        }
    }
}

/// Counters describing the work done by one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SolveStats {
    /// Partial paths taken off an enumerator's frontier, whether expanded or pruned.
    pub states_expanded: usize,
    /// Existence probes issued while forward checking.
    pub probes: usize,
    /// Complete paths committed to a flow.
    pub candidates: usize,
    /// Candidates withdrawn because the flows after them could not all be joined.
    pub backtracks: usize,
    /// Highest flow index the search reached.
    pub deepest_level: usize,
}

/// Outcome of a search that ran to completion.
#[derive(Clone, Debug)]
pub struct SolveReport {
    /// Whether every flow searched now holds a path.
    pub solved: bool,
    /// Work done.
    pub stats: SolveStats,
    /// Wall time spent.
    pub elapsed: Duration,
}

/// Reasons a bounded search may stop before reaching an answer.
///
/// Every claimed mask is back to its pre-search value when one of these is returned.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum Interrupted {
    /// [`SolverConfig::timeout`] elapsed.
    #[error("search deadline passed")]
    Deadline,
    /// [`SolverConfig::max_states`] was exhausted.
    #[error("search exceeded its budget of {0} states")]
    StateBudget(usize),
}

/// Depth-first search over flows in order, each drawing candidate paths from its own [`PathEnumerator`].
///
/// A level's enumerator lives exactly as long as that level's frame, so backtracking past a level discards it and
/// re-entering the level starts a fresh one.
pub(crate) struct Solver<'b> {
    topology: &'b GridTopology,
    flows: &'b mut [Flow],
    config: &'b SolverConfig,
    deadline: Option<Instant>,
    stats: SolveStats,
}

impl<'b> Solver<'b> {
    pub(crate) fn new(topology: &'b GridTopology, flows: &'b mut [Flow], config: &'b SolverConfig) -> Self {
        Self {
            topology,
            flows,
            config,
            deadline: config.timeout.map(|timeout| Instant::now() + timeout),
            stats: SolveStats::default(),
        }
    }

    /// Find paths for every flow from `start_level` on, leaving flows before it untouched.
    pub(crate) fn run(mut self, start_level: usize) -> Result<SolveReport, Interrupted> {
        let started = Instant::now();
        let start_level = start_level.min(self.flows.len());

        let solved = if self.flows[start_level..].iter().all(Flow::is_solved) {
            true
        } else {
            self.search(start_level)?
        };

        Ok(SolveReport { solved, stats: self.stats, elapsed: started.elapsed() })
    }

    fn search(&mut self, level: usize) -> Result<bool, Interrupted> {
        self.stats.deepest_level = self.stats.deepest_level.max(level);

        let snapshot = self.flows[level].snapshot();
        let filled = self.occupancy_excluding(level);
        let flow = &self.flows[level];
        let mut enumerator = PathEnumerator::new(self.topology.cell_count(), flow.start, flow.end);

        let outcome = loop {
            match self.next_candidate(&mut enumerator, level, &filled) {
                Err(e) => break Err(e),
                Ok(None) => break Ok(false),
                Ok(Some(path)) => {
                    self.stats.candidates += 1;
                    self.flows[level].commit(path);
                    if level + 1 == self.flows.len() {
                        break Ok(true);
                    }

                    match self.search(level + 1) {
                        Ok(true) => break Ok(true),
                        Ok(false) => self.stats.backtracks += 1,
                        Err(e) => break Err(e),
                    }
                }
            }
        };

        // every way out short of success undoes this level
        if outcome != Ok(true) {
            self.flows[level].restore(snapshot);
        }

        outcome
    }

    fn next_candidate(
        &mut self,
        enumerator: &mut PathEnumerator,
        level: usize,
        filled: &CellMask,
    ) -> Result<Option<CellMask>, Interrupted> {
        let topology = self.topology;
        let config = self.config;
        let deadline = self.deadline;
        // partial paths never hold the end cell until they complete, but no later flow may pass through it
        let end = self.flows[level].end;
        let later = &self.flows[level + 1..];
        let stats = &mut self.stats;
        let mut probes = 0;

        let candidate = enumerator.next_path(topology, filled, |_, path| {
            stats.states_expanded += 1;
            if let Some(max_states) = config.max_states {
                if stats.states_expanded > max_states {
                    return Err(Interrupted::StateBudget(max_states));
                }
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(Interrupted::Deadline);
            }

            Ok(!config.forward_checking || is_feasible(topology, later, &filled.union(path).with(end), &mut probes))
        });

        stats.probes += probes;
        candidate
    }

    /// Union of every flow's claimed cells except those of the flow at `level`.
    fn occupancy_excluding(&self, level: usize) -> CellMask {
        let mut filled = CellMask::empty(self.topology.cell_count());
        for (_, flow) in self.flows.iter().enumerate().filter(|(index, _)| *index != level) {
            filled.union_with(&flow.claimed);
        }
        filled
    }
}
