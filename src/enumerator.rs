use std::collections::{HashSet, VecDeque};

use crate::mask::CellMask;
use crate::topology::GridTopology;

/// A dequeued state whose neighbors were only partly examined when it completed a path.
struct Suspended {
    cell: usize,
    path: CellMask,
    remaining: Vec<usize>,
}

/// Breadth-first enumerator of the simple paths joining one flow's termini.
///
/// States are `(cell, cells on the path so far)`. The frontier and the visited set persist between calls to
/// [`next_path`](Self::next_path), so successive calls yield distinct paths of non-decreasing length until the
/// search space is exhausted.
pub(crate) struct PathEnumerator {
    end: usize,
    frontier: VecDeque<(usize, CellMask)>,
    visited: HashSet<(usize, CellMask)>,
    offered: HashSet<CellMask>,
    suspended: Option<Suspended>,
}

impl PathEnumerator {
    pub(crate) fn new(cells: usize, start: usize, end: usize) -> Self {
        let origin = CellMask::single(cells, start);
        Self {
            end,
            frontier: VecDeque::from([(start, origin.clone())]),
            visited: HashSet::from([(start, origin)]),
            offered: HashSet::new(),
            suspended: None,
        }
    }

    /// Whether any path joins `start` and `end` without touching `forbidden`.
    ///
    /// A one-shot probe: the frontier it builds is thrown away.
    pub(crate) fn exists(topology: &GridTopology, start: usize, end: usize, forbidden: &CellMask) -> bool {
        let mut probe = Self::new(topology.cell_count(), start, end);
        matches!(probe.next_path::<_, ()>(topology, forbidden, |_, _| Ok(true)), Ok(Some(_)))
    }

    /// Resume the search and return the next path, as the set of its cells including both termini.
    ///
    /// `filled` holds cells other flows occupy; it may differ between calls. `gate` is consulted on every state
    /// taken off the frontier: `Ok(false)` discards the state unexpanded, `Err` abandons the call and leaves the
    /// frontier as it was before that state was taken.
    pub(crate) fn next_path<G, E>(
        &mut self,
        topology: &GridTopology,
        filled: &CellMask,
        mut gate: G,
    ) -> Result<Option<CellMask>, E>
    where
        G: FnMut(usize, &CellMask) -> Result<bool, E>,
    {
        loop {
            let Suspended { cell, path, mut remaining } = match self.suspended.take() {
                Some(suspended) => suspended,
                None => {
                    let Some((cell, path)) = self.frontier.pop_front() else {
                        return Ok(None);
                    };

                    match gate(cell, &path) {
                        Ok(true) => {}
                        Ok(false) => continue,
                        Err(e) => {
                            self.frontier.push_front((cell, path));
                            return Err(e);
                        }
                    }

                    let mut remaining = topology.neighbors(cell).collect::<Vec<_>>();
                    // popped from the back, so reversed to keep adjacency order
                    remaining.reverse();
                    Suspended { cell, path, remaining }
                }
            };

            while let Some(neighbor) = remaining.pop() {
                if neighbor == self.end {
                    let complete = path.with(neighbor);
                    if self.offered.insert(complete.clone()) {
                        self.suspended = Some(Suspended { cell, path, remaining });
                        return Ok(Some(complete));
                    }
                    continue;
                }

                if filled.contains(neighbor) || path.contains(neighbor) {
                    continue;
                }

                let extended = path.with(neighbor);
                if self.visited.insert((neighbor, extended.clone())) {
                    self.frontier.push_back((neighbor, extended));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use itertools::Itertools;

    use super::PathEnumerator;
    use crate::location::Location;
    use crate::mask::CellMask;
    use crate::topology::GridTopology;

    fn grid(rows: usize, cols: usize) -> GridTopology {
        GridTopology::new((NonZero::new(rows).unwrap(), NonZero::new(cols).unwrap()))
    }

    fn drain(topology: &GridTopology, start: Location, end: Location, filled: &CellMask) -> Vec<CellMask> {
        let mut enumerator = PathEnumerator::new(topology.cell_count(), topology.bit(start), topology.bit(end));
        let mut paths = Vec::new();
        while let Ok(Some(path)) = enumerator.next_path::<_, ()>(topology, filled, |_, _| Ok(true)) {
            paths.push(path);
        }
        paths
    }

    #[test]
    fn paths_come_shortest_first_and_never_repeat() {
        let topology = grid(3, 3);
        let paths = drain(&topology, Location(0, 0), Location(2, 2), &CellMask::empty(9));

        assert!(!paths.is_empty());
        assert_eq!(paths[0].count(), 5);
        assert!(paths.iter().tuple_windows().all(|(a, b)| a.count() <= b.count()));
        assert_eq!(paths.iter().unique().count(), paths.len());
        // the 6 monotone routes through a 3x3 grid all have length 5
        assert_eq!(paths.iter().filter(|path| path.count() == 5).count(), 6);
        // the serpentine covering every cell is found eventually
        assert!(paths.iter().any(|path| path.count() == 9));
    }

    #[test]
    fn filled_cells_are_avoided() {
        let topology = grid(3, 3);
        let mut filled = CellMask::empty(9);
        for location in [Location(0, 1), Location(1, 1)] {
            filled.insert(topology.bit(location));
        }

        let paths = drain(&topology, Location(0, 0), Location(0, 2), &filled);
        assert!(!paths.is_empty());
        assert!(paths.iter().all(|path| path.is_disjoint(&filled)));
        // around the bottom is the only way
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].count(), 7);
    }

    #[test]
    fn gate_rejections_prune_whole_subtrees() {
        let topology = grid(1, 4);
        let mut enumerator = PathEnumerator::new(4, 0, 3);
        let blocked = topology.bit(Location(0, 2));
        let result = enumerator.next_path::<_, ()>(&topology, &CellMask::empty(4), |cell, _| Ok(cell != blocked));
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn gate_errors_leave_the_frontier_intact() {
        let topology = grid(1, 3);
        let mut enumerator = PathEnumerator::new(3, 0, 2);
        let filled = CellMask::empty(3);
        assert_eq!(enumerator.next_path(&topology, &filled, |_, _| Err("stop")), Err("stop"));
        let path = enumerator.next_path::<_, ()>(&topology, &filled, |_, _| Ok(true));
        assert_eq!(path, Ok(Some(CellMask::single(3, 0).with(1).with(2))));
    }

    #[test]
    fn existence_probe_sees_walls_of_filled_cells() {
        let topology = grid(3, 3);
        let mut wall = CellMask::empty(9);
        for row in 0..3 {
            wall.insert(topology.bit(Location(row, 1)));
        }
        assert!(!PathEnumerator::exists(&topology, 0, 2, &wall));
        assert!(PathEnumerator::exists(&topology, 0, 6, &wall));
    }
}
