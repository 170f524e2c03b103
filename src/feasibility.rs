use crate::enumerator::PathEnumerator;
use crate::flow::Flow;
use crate::mask::CellMask;
use crate::topology::GridTopology;

/// Forward check: whether every flow in `later` could still be joined with `occupancy` taken.
///
/// Each flow is probed on its own against the same occupancy, never against the others' hypothetical paths,
/// so this can miss dead ends but never rejects a live one. A flow's own claimed cells are not held against it.
/// `probes` counts the existence searches issued.
pub(crate) fn is_feasible(topology: &GridTopology, later: &[Flow], occupancy: &CellMask, probes: &mut usize) -> bool {
    later.iter().all(|flow| {
        *probes += 1;
        let forbidden = occupancy.without(&flow.claimed);
        PathEnumerator::exists(topology, flow.start, flow.end, &forbidden)
    })
}

#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use super::is_feasible;
    use crate::flow::Flow;
    use crate::location::Location;
    use crate::mask::CellMask;
    use crate::topology::GridTopology;

    #[test]
    fn stops_at_the_first_stranded_flow() {
        let topology = GridTopology::new((NonZero::new(3).unwrap(), NonZero::new(3).unwrap()));
        let bit = |location| topology.bit(location);
        let later = [
            // left column to right column, must cross the middle column
            Flow::new(9, bit(Location(0, 0)), bit(Location(0, 2))),
            Flow::new(9, bit(Location(2, 0)), bit(Location(2, 2))),
        ];

        let mut probes = 0;
        assert!(is_feasible(&topology, &later, &CellMask::empty(9), &mut probes));
        assert_eq!(probes, 2);

        let mut middle = CellMask::empty(9);
        for row in 0..3 {
            middle.insert(bit(Location(row, 1)));
        }
        probes = 0;
        assert!(!is_feasible(&topology, &later, &middle, &mut probes));
        assert_eq!(probes, 1);
    }

    #[test]
    fn own_termini_do_not_strand_a_flow() {
        let topology = GridTopology::new((NonZero::new(1).unwrap(), NonZero::new(2).unwrap()));
        let flow = Flow::new(2, 0, 1);
        let occupancy = flow.claimed.clone();
        let mut probes = 0;
        assert!(is_feasible(&topology, &[flow], &occupancy, &mut probes));
    }
}
