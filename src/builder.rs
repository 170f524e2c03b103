use std::collections::HashSet;

use thiserror::Error;
use unordered_pair::UnorderedPair;

use crate::board::Board;
use crate::location::{Dimension, Location};
use crate::shape::SquareStep;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum BuilderInvalidReason {
    /// A feature was placed outside the bounds specified by `dims` on a builder.
    #[error("feature placed off the board")]
    FeatureOutOfBounds,
    /// An edge warp was placed away from every edge, or at a corner without a direction leading off the board.
    #[error("warp direction does not lead off the board")]
    WarpBadDirection,
    /// A terminus or seeded cell landed on a cell another flow (or the same flow's other terminus) already holds.
    #[error("cell already claimed")]
    CellAlreadyClaimed,
    /// Cells were seeded for a flow that has not been added.
    #[error("no such flow")]
    UnknownFlow,
    /// A location holding a terminus or a seeded cell was dropped from the board.
    #[error("dropped a claimed cell")]
    TerminusDropped,
}

/// A builder for rectangular boards, collecting termini, warps, walls, holes and seeded cells, and checking them
/// on the way in.
///
/// Feature calls mutate the builder in place; [`Clone`] one to branch off variants of a puzzle.
/// Once a builder turns invalid it ignores every further feature and [`build`](Self::build) hands back the reasons.
#[derive(Clone, Debug)]
pub struct BoardBuilder<A> {
    // rows, columns
    dims: (Dimension, Dimension),
    termini: Vec<(Location, Location, A)>,
    invalid_reasons: Vec<BuilderInvalidReason>,
    // one entry per flow, in order
    seeds: Vec<Vec<Location>>,
    // warps
    edge_whitelist: Vec<UnorderedPair<Location>>,
    // walls
    edge_blacklist: HashSet<UnorderedPair<Location>>,
    // holes
    location_blacklist: HashSet<Location>,
}

impl<A> BoardBuilder<A> {
    /// Construct a new [`Self`] with the specified dimensions, specified in `(rows, columns)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            termini: Default::default(),
            invalid_reasons: Default::default(),
            seeds: Default::default(),
            edge_whitelist: Default::default(),
            edge_blacklist: Default::default(),
            location_blacklist: Default::default(),
        }
    }

    #[inline]
    fn max_loc(&self) -> Location {
        Location(self.dims.0.get() - 1, self.dims.1.get() - 1)
    }

    /// Turn invalid unless every location in `locations` is on the board. Returns whether all were.
    fn check_bounds(&mut self, locations: &[Location]) -> bool {
        if locations.iter().all(|location| location.within(self.dims)) {
            true
        } else {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            false
        }
    }

    fn is_claimed(&self, location: Location) -> bool {
        self.termini.iter().any(|(start, end, _)| *start == location || *end == location)
            || self.seeds.iter().flatten().any(|seeded| *seeded == location)
    }

    /// Add a flow running from `locations.0` to `locations.1`, drawn with `display`. Flows are solved in the order
    /// they are added.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if either location is out of bounds,
    /// or a [`CellAlreadyClaimed`](BuilderInvalidReason::CellAlreadyClaimed) one if either is taken or both are the same.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_termini(&mut self, display: A, locations: (Location, Location)) -> &mut Self {
        if !self.invalid_reasons.is_empty() || !self.check_bounds(&[locations.0, locations.1]) {
            return self;
        }

        if locations.0 == locations.1 || self.is_claimed(locations.0) || self.is_claimed(locations.1) {
            self.invalid_reasons.push(BuilderInvalidReason::CellAlreadyClaimed);
            return self;
        }

        self.termini.push((locations.0, locations.1, display));
        self.seeds.push(Vec::new());
        self
    }

    /// Remove the most recently added flow and anything seeded for it.
    ///
    /// If the builder is in an invalid state or no termini are present, this function does nothing.
    pub fn pop_termini(&mut self) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        self.termini.pop();
        self.seeds.pop();
        self
    }

    /// Seed `locations` into the claim of flow `flow` (0 based, in order of [`add_termini`](Self::add_termini)),
    /// reserving them against every other flow.
    ///
    /// May cause the builder to enter [`UnknownFlow`](BuilderInvalidReason::UnknownFlow),
    /// [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) or
    /// [`CellAlreadyClaimed`](BuilderInvalidReason::CellAlreadyClaimed) invalid states.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn seed(&mut self, flow: usize, locations: &[Location]) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if flow >= self.termini.len() {
            self.invalid_reasons.push(BuilderInvalidReason::UnknownFlow);
            return self;
        }

        if !self.check_bounds(locations) {
            return self;
        }

        for location in locations {
            if self.is_claimed(*location) {
                self.invalid_reasons.push(BuilderInvalidReason::CellAlreadyClaimed);
                return self;
            }
            self.seeds[flow].push(*location);
        }

        self
    }

    /// Connect two arbitrary cells, as a portal would.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if either location is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_warp(&mut self, locations: UnorderedPair<Location>) -> &mut Self {
        if !self.invalid_reasons.is_empty() || !self.check_bounds(&[locations.0, locations.1]) {
            return self;
        }

        self.edge_whitelist.push(locations);
        self
    }

    /// Wrap `location` around the board: it is joined to the cell at the far end of its row or column, on the
    /// edge opposite the one `location` sits on.
    ///
    /// `direction` picks the edge, and only matters at corners (or on boards one cell thick), where more than one
    /// edge is possible. Elsewhere it is ignored.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is out of bounds.
    /// May cause the builder to enter a [`WarpBadDirection`](BuilderInvalidReason::WarpBadDirection) invalid state if `location` is not on an edge, or is at a corner and `direction` is missing or is impossible for a warp at this location.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_edge_warp(&mut self, location: Location, direction: Option<SquareStep>) -> &mut Self {
        if !self.invalid_reasons.is_empty() || !self.check_bounds(&[location]) {
            return self;
        }

        let max = self.max_loc();
        let exits = [
            (location.0 == 0, SquareStep::Up),
            (location.0 == max.0, SquareStep::Down),
            (location.1 == 0, SquareStep::Left),
            (location.1 == max.1, SquareStep::Right),
        ]
            .into_iter()
            .filter_map(|(on_edge, step)| on_edge.then_some(step))
            .collect::<Vec<_>>();

        let edge = match (exits.as_slice(), direction) {
            // not on any edge
            ([], _) => None,
            ([only], _) => Some(*only),
            // a corner, or a board one cell thick
            (_, Some(direction)) => exits.contains(&direction).then_some(direction),
            (_, None) => None,
        };

        let Some(edge) = edge else {
            self.invalid_reasons.push(BuilderInvalidReason::WarpBadDirection);
            return self;
        };

        let partner = match edge {
            SquareStep::Up => Location(max.0, location.1),
            SquareStep::Down => Location(0, location.1),
            SquareStep::Left => Location(location.0, max.1),
            SquareStep::Right => Location(location.0, 0),
        };

        if partner == location {
            // a board one cell across in this direction has nothing to warp to
            self.invalid_reasons.push(BuilderInvalidReason::WarpBadDirection);
            return self;
        }

        self.edge_whitelist.push(UnorderedPair(location, partner));
        self
    }

    /// Disconnect the two `locations`, i.e. place a wall between them. Warps between them are cut as well.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if either location is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn disconnect(&mut self, locations: UnorderedPair<Location>) -> &mut Self {
        if !self.invalid_reasons.is_empty() || !self.check_bounds(&[locations.0, locations.1]) {
            return self;
        }

        self.edge_blacklist.insert(locations);
        self
    }

    /// Shorthand for multiple calls to [`Self::disconnect`], with the same conditions.
    ///
    /// Disconnect cells neighboring `location`; directions leading off the board are skipped.
    pub fn disconnect_around(&mut self, location: Location, directions: &[SquareStep]) -> &mut Self {
        for direction in directions {
            let neighbor = direction.attempt_from(location);
            if neighbor.within(self.dims) {
                self.disconnect(UnorderedPair(location, neighbor));
            }
        }

        self
    }

    /// Drop a location from the board, leaving a hole no path may enter.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn drop_location(&mut self, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() || !self.check_bounds(&[location]) {
            return self;
        }

        self.location_blacklist.insert(location);
        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&[BuilderInvalidReason])` otherwise.
    pub fn is_valid(&self) -> Option<&[BuilderInvalidReason]> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Board`].
    /// If the builder is invalid for any reason, the reasons indicate why.
    ///
    /// Holes are checked here, since a location may be dropped before the flow that needs it is added.
    pub fn build(&self) -> Result<Board<A>, Vec<BuilderInvalidReason>>
    where
        A: Clone,
    {
        if !self.invalid_reasons.is_empty() {
            return Err(self.invalid_reasons.clone());
        }

        if self.location_blacklist.iter().any(|hole| self.is_claimed(*hole)) {
            return Err(vec![BuilderInvalidReason::TerminusDropped]);
        }

        let mut board = Board::new(self.dims, self.termini.iter().cloned());

        for warp in &self.edge_whitelist {
            board.add_warp(*warp);
        }

        for UnorderedPair(a, b) in &self.edge_blacklist {
            let cells = UnorderedPair(board.topology.bit(*a), board.topology.bit(*b));
            board.topology.disconnect(cells);
        }

        for hole in &self.location_blacklist {
            let cell = board.topology.bit(*hole);
            board.topology.drop_cell(cell);
        }

        for (flow, seeded) in self.seeds.iter().enumerate() {
            for location in seeded {
                board.seed(flow, *location);
            }
        }

        Ok(board)
    }
}
