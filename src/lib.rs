#![warn(missing_docs)]

//! # `flowpath`
//!
//! A solver for [Numberlink](https://en.wikipedia.org/wiki/Numberlink) as posited in the mobile game Flow Free,
//! including boards with warps, walls and holes.
//! Begin by building a board with a [`BoardBuilder`] (or from a [`PuzzleConfig`] file), then call
//! [`solve()`](crate::Board::solve), which leaves each flow's path in its claimed cells.
//!
//! # Internals
//! Every set of cells (one cell, a path, the cells held by all flows) is a [`CellMask`], a bit per cell, so
//! occupancy tests are word-wise bit operations.
//!
//! Flows are solved one at a time in the order they were added:
//! 1. For the current flow, a breadth-first enumerator walks partial paths from its start, skipping cells held by
//!    other flows, and yields complete paths to its end shortest first. Its frontier persists, so asking again
//!    yields the next path rather than starting over.
//! 2. Before a partial path is extended, a forward check probes every later flow for a single path avoiding all
//!    cells now taken. If one is stranded the partial path is dropped.
//! 3. Each path found is committed and the search moves to the next flow. When a flow runs out of paths its claim
//!    is restored and the previous flow is asked for its next one.
//!
//! Paths are found shortest first per flow, so the solution is valid but need not fill the board.

pub use board::{Board, ColorLookup, SolutionDefect};
pub use builder::{BoardBuilder, BuilderInvalidReason};
pub use config::{ConfigError, PuzzleConfig};
pub use flow::Flow;
pub use location::Location;
pub use mask::CellMask;
pub use shape::SquareStep;
pub use solver::{Interrupted, SolveReport, SolveStats, SolverConfig};

pub(crate) mod board;
pub mod builder;
pub mod config;
mod enumerator;
mod feasibility;
pub(crate) mod flow;
pub(crate) mod location;
pub(crate) mod mask;
pub mod palette;
pub mod render;
pub(crate) mod shape;
pub(crate) mod solver;
pub(crate) mod topology;
