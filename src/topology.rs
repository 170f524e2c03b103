use petgraph::graphmap::UnGraphMap;
use unordered_pair::UnorderedPair;

use crate::location::{Dimension, Location};
use crate::mask::CellMask;
use crate::shape::SquareStep;

/// How two cells of a [`GridTopology`] came to be connected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) enum Link {
    Adjacent,
    Warp,
}

/// Adjacency between the cells of a rectangular board, addressed by row-major bit index.
///
/// Built once with every orthogonal neighbor connected; warps, walls and holes are applied before solving.
#[derive(Clone, Debug)]
pub(crate) struct GridTopology {
    graph: UnGraphMap<usize, Link>,
    dims: (Dimension, Dimension),
}

impl GridTopology {
    pub(crate) fn new(dims: (Dimension, Dimension)) -> Self {
        let (rows, cols) = (dims.0.get(), dims.1.get());
        let mut graph = UnGraphMap::with_capacity(
            rows * cols,
            // "vertical" edges
            (rows - 1) * cols
                // "horizontal" edges
                + (cols - 1) * rows,
        );

        for bit in 0..rows * cols {
            graph.add_node(bit);
        }

        for row in 0..rows {
            for col in 0..cols {
                let location = Location(row, col);
                // add edges down and to the right, if possible
                for step in [SquareStep::Down, SquareStep::Right] {
                    let other = step.attempt_from(location);
                    if other.within(dims) {
                        graph.add_edge(location.bit(cols), other.bit(cols), Link::Adjacent);
                    }
                }
            }
        }

        Self { graph, dims }
    }

    #[inline]
    pub(crate) fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    #[inline]
    pub(crate) fn cols(&self) -> usize {
        self.dims.1.get()
    }

    #[inline]
    pub(crate) fn cell_count(&self) -> usize {
        self.dims.0.get() * self.dims.1.get()
    }

    #[inline]
    pub(crate) fn bit(&self, location: Location) -> usize {
        location.bit(self.cols())
    }

    #[inline]
    pub(crate) fn location(&self, bit: usize) -> Location {
        Location::from_bit(bit, self.cols())
    }

    /// Every cell one step away from `cell`, orthogonal neighbors first, then warp partners in insertion order.
    ///
    /// Dropped cells have no neighbors.
    pub(crate) fn neighbors(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph.neighbors(cell)
    }

    /// Every warp on the board, as pairs of cells.
    pub(crate) fn warps(&self) -> impl Iterator<Item = UnorderedPair<usize>> + '_ {
        self.graph.all_edges()
            .filter(|(_, _, link)| **link == Link::Warp)
            .map(|(a, b, _)| UnorderedPair(a, b))
    }

    /// Connect two cells directly. Cells that are already connected stay as they are.
    ///
    /// Both cells must lie on the board.
    pub(crate) fn add_warp(&mut self, cells: UnorderedPair<usize>) {
        let UnorderedPair(a, b) = cells;
        if a != b && !self.graph.contains_edge(a, b) {
            self.graph.add_edge(a, b, Link::Warp);
        }
    }

    /// Place a wall between two cells, whatever connects them.
    pub(crate) fn disconnect(&mut self, cells: UnorderedPair<usize>) {
        self.graph.remove_edge(cells.0, cells.1);
    }

    /// Cut a hole in the board at `cell`.
    pub(crate) fn drop_cell(&mut self, cell: usize) {
        self.graph.remove_node(cell);
    }

    /// Order the cells of `region` as a simple path from `from` to `to` that uses every one of them, if they allow it.
    pub(crate) fn trace(&self, region: &CellMask, from: usize, to: usize) -> Option<Vec<usize>> {
        if !region.contains(from) || !region.contains(to) {
            return None;
        }

        let mut order = vec![from];
        let mut walked = CellMask::single(region.len(), from);
        self.extend_trace(region, to, &mut walked, &mut order).then_some(order)
    }

    fn extend_trace(&self, region: &CellMask, to: usize, walked: &mut CellMask, order: &mut Vec<usize>) -> bool {
        let Some(&cell) = order.last() else {
            return false;
        };
        if cell == to {
            return walked.count() == region.count();
        }

        for next in self.neighbors(cell) {
            if region.contains(next) && walked.insert(next) {
                order.push(next);
                if self.extend_trace(region, to, walked, order) {
                    return true;
                }
                order.pop();
                walked.remove(next);
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use itertools::Itertools;
    use unordered_pair::UnorderedPair;

    use super::GridTopology;
    use crate::location::Location;
    use crate::mask::CellMask;

    fn grid(rows: usize, cols: usize) -> GridTopology {
        GridTopology::new((NonZero::new(rows).unwrap(), NonZero::new(cols).unwrap()))
    }

    #[test]
    fn corner_edge_and_center_degrees() {
        let topology = grid(3, 4);
        assert_eq!(topology.neighbors(topology.bit(Location(0, 0))).count(), 2);
        assert_eq!(topology.neighbors(topology.bit(Location(0, 2))).count(), 3);
        assert_eq!(topology.neighbors(topology.bit(Location(1, 1))).count(), 4);
        assert_eq!(
            topology.neighbors(topology.bit(Location(2, 3))).map(|bit| topology.location(bit)).sorted().collect_vec(),
            vec![Location(1, 3), Location(2, 2)],
        );
    }

    #[test]
    fn warps_are_bidirectional_and_idempotent() {
        let mut topology = grid(2, 2);
        let (a, b) = (topology.bit(Location(0, 0)), topology.bit(Location(1, 1)));
        topology.add_warp(UnorderedPair(a, b));
        topology.add_warp(UnorderedPair(b, a));
        assert!(topology.neighbors(a).contains(&b));
        assert!(topology.neighbors(b).contains(&a));
        assert_eq!(topology.neighbors(a).count(), 3);

        // already adjacent: stays a geometric edge
        let c = topology.bit(Location(0, 1));
        topology.add_warp(UnorderedPair(a, c));
        assert_eq!(topology.warps().collect_vec(), vec![UnorderedPair(a, b)]);
    }

    #[test]
    fn walls_and_holes_cut_adjacency() {
        let mut topology = grid(2, 3);
        let (a, b) = (topology.bit(Location(0, 0)), topology.bit(Location(0, 1)));
        topology.disconnect(UnorderedPair(a, b));
        assert!(!topology.neighbors(a).contains(&b));

        let hole = topology.bit(Location(1, 1));
        topology.drop_cell(hole);
        assert_eq!(topology.neighbors(hole).count(), 0);
        assert!(!topology.neighbors(topology.bit(Location(1, 0))).contains(&hole));
    }

    #[test]
    fn trace_orders_a_region_that_is_a_path() {
        let topology = grid(2, 2);
        // a U through all four cells, whose ends are adjacent
        let region = CellMask::single(4, 0).with(1).with(2).with(3);
        assert_eq!(topology.trace(&region, 0, 1), Some(vec![0, 2, 3, 1]));

        // a region with a stray cell is not a path
        let topology = grid(1, 4);
        let region = CellMask::single(4, 0).with(1).with(3);
        assert_eq!(topology.trace(&region, 0, 1), None);
    }
}
