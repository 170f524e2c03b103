use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;
use thiserror::Error;
use unordered_pair::UnorderedPair;

use crate::flow::Flow;
use crate::location::{Dimension, Location};
use crate::mask::CellMask;
use crate::shape;
use crate::solver::{Interrupted, SolveReport, Solver, SolverConfig};
use crate::topology::GridTopology;

/// Ways a set of claimed paths can fail to be a solution, as found by [`Board::verify`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SolutionDefect {
    /// Two flows claim the same cell.
    #[error("flows {0} and {1} both claim {2:?}")]
    Overlap(usize, usize, Location),
    /// A flow's claimed cells do not include one of its own termini.
    #[error("flow {0} does not claim its terminus at {1:?}")]
    MissingTerminus(usize, Location),
    /// A flow's claimed cells are not a single simple path from its start to its end.
    #[error("flow {0} does not form a simple path from start to end")]
    NotAPath(usize),
}

/// A puzzle: the grid, its flows, and a display attribute per flow.
///
/// The attribute `A` means nothing to the solver; it is handed back through [`ColorLookup`] for drawing.
/// [`Board`]s can be assembled directly with [`Board::new`], or checked on the way in by [`BoardBuilder`](crate::BoardBuilder).
#[derive(Clone, Debug)]
pub struct Board<A> {
    pub(crate) topology: GridTopology,
    pub(crate) flows: Vec<Flow>,
    pub(crate) attributes: Vec<A>,
}

impl<A> Board<A> {
    /// A board of `dims` (rows, columns) with one flow per `(start, end, attribute)` entry, solved in the order given.
    ///
    /// Nothing is validated: every location must be on the board and no two termini may coincide.
    pub fn new(dims: (Dimension, Dimension), termini: impl IntoIterator<Item = (Location, Location, A)>) -> Self {
        let topology = GridTopology::new(dims);
        let (flows, attributes): (Vec<Flow>, Vec<A>) = termini.into_iter()
            .map(|(start, end, attribute)| (Flow::new(topology.cell_count(), topology.bit(start), topology.bit(end)), attribute))
            .unzip();

        Self { topology, flows, attributes }
    }

    /// Connect two cells regardless of where they lie, as a portal would. Both must be on the board.
    pub fn add_warp(&mut self, locations: UnorderedPair<Location>) -> &mut Self {
        let cells = UnorderedPair(self.topology.bit(locations.0), self.topology.bit(locations.1));
        self.topology.add_warp(cells);
        self
    }

    /// Force `location` into the claim of flow `flow` before solving.
    ///
    /// Seeded cells keep every other flow out; the flow itself may still route around them.
    pub fn seed(&mut self, flow: usize, location: Location) -> &mut Self {
        let bit = self.topology.bit(location);
        self.flows[flow].claimed.insert(bit);
        self
    }

    /// Board size as (rows, columns).
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.topology.dims()
    }

    /// The flows, in solving order.
    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    /// The display attributes, one per flow.
    pub fn attributes(&self) -> &[A] {
        &self.attributes
    }

    /// Start and end of flow `flow`.
    pub fn termini(&self, flow: usize) -> (Location, Location) {
        let flow = &self.flows[flow];
        (self.topology.location(flow.start), self.topology.location(flow.end))
    }

    /// Every warp on the board.
    pub fn warps(&self) -> Vec<UnorderedPair<Location>> {
        self.topology.warps()
            .map(|UnorderedPair(a, b)| UnorderedPair(self.topology.location(a), self.topology.location(b)))
            .collect_vec()
    }

    /// Whether every flow holds a path.
    pub fn is_solved(&self) -> bool {
        self.flows.iter().all(Flow::is_solved)
    }

    /// Solve every flow. See [`Self::solve_from`].
    pub fn solve(&mut self) -> bool {
        self.solve_from(0)
    }

    /// Find paths for every flow from `start_level` on, keeping the claims of earlier flows fixed.
    ///
    /// On success each flow's claimed mask holds its path; on failure every mask is as it was before the call.
    /// If those flows are already solved this returns `true` at once without searching.
    pub fn solve_from(&mut self, start_level: usize) -> bool {
        self.solve_with(start_level, &SolverConfig::default())
            .is_ok_and(|report| report.solved)
    }

    /// [`Self::solve_from`] with pruning and limits taken from `config`, reporting the work done.
    pub fn solve_with(&mut self, start_level: usize, config: &SolverConfig) -> Result<SolveReport, Interrupted> {
        Solver::new(&self.topology, &mut self.flows, config).run(start_level)
    }

    /// Resolve every flow's claimed cells against its attribute once, for per-cell lookups while drawing.
    pub fn color_lookup(&self) -> ColorLookup<'_, A> {
        ColorLookup {
            entries: self.flows.iter().map(|flow| &flow.claimed).zip(&self.attributes).collect_vec(),
            topology: &self.topology,
        }
    }

    /// The cells of flow `flow`'s path in order from start to end, if it holds one.
    pub fn path(&self, flow: usize) -> Option<Vec<Location>> {
        let flow = &self.flows[flow];
        if !flow.solved {
            return None;
        }

        let order = self.topology.trace(&flow.claimed, flow.start, flow.end)?;
        Some(order.into_iter().map(|bit| self.topology.location(bit)).collect_vec())
    }

    /// Check that the claimed cells form a solution: flows pairwise disjoint, and each flow's cells exactly one
    /// simple path between its termini.
    pub fn verify(&self) -> Result<(), SolutionDefect> {
        for ((i, a), (j, b)) in self.flows.iter().enumerate().tuple_combinations() {
            if !a.claimed.is_disjoint(&b.claimed) {
                let shared = a.claimed.iter_ones().find(|bit| b.claimed.contains(*bit)).unwrap_or_default();
                return Err(SolutionDefect::Overlap(i, j, self.topology.location(shared)));
            }
        }

        for (index, flow) in self.flows.iter().enumerate() {
            for terminus in [flow.start, flow.end] {
                if !flow.claimed.contains(terminus) {
                    return Err(SolutionDefect::MissingTerminus(index, self.topology.location(terminus)));
                }
            }
            if self.topology.trace(&flow.claimed, flow.start, flow.end).is_none() {
                return Err(SolutionDefect::NotAPath(index));
            }
        }

        Ok(())
    }

    /// Lay the board out as text, one row per line: `label` gives each flow's character, upper case at termini
    /// and lower case along the path; `.` marks unclaimed cells.
    pub fn to_text(&self, label: impl Fn(usize, &A) -> char) -> String {
        let (rows, cols) = (self.dims().0.get(), self.dims().1.get());
        let mut cells = Array2::from_elem((rows, cols), '.');

        for (index, (flow, attribute)) in self.flows.iter().zip(&self.attributes).enumerate().rev() {
            let display = label(index, attribute);
            for bit in flow.claimed.iter_ones() {
                cells[self.topology.location(bit).as_index()] = if flow.is_terminus(bit) {
                    display.to_ascii_uppercase()
                } else {
                    display.to_ascii_lowercase()
                };
            }
        }

        shape::print(cells)
    }
}

impl Display for Board<char> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text(|_, display| *display))
    }
}

/// Claimed cells paired with their flow's attribute, resolved once by [`Board::color_lookup`].
pub struct ColorLookup<'a, A> {
    entries: Vec<(&'a CellMask, &'a A)>,
    topology: &'a GridTopology,
}

impl<'a, A> ColorLookup<'a, A> {
    /// The attribute of the first flow, in solving order, claiming `location`.
    pub fn get(&self, location: Location) -> Option<&'a A> {
        let bit = self.topology.bit(location);
        self.entries.iter()
            .find(|(claimed, _)| claimed.contains(bit))
            .map(|(_, attribute)| *attribute)
    }

    /// [`Self::get`], falling back to `background` for unclaimed cells.
    pub fn get_or(&self, location: Location, background: &'a A) -> &'a A {
        self.get(location).unwrap_or(background)
    }
}
