use crate::mask::CellMask;

/// One start-end pair to be connected, together with the cells currently claimed for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flow {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) claimed: CellMask,
    pub(crate) solved: bool,
}

impl Flow {
    pub(crate) fn new(cells: usize, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            claimed: CellMask::single(cells, start).with(end),
            solved: false,
        }
    }

    /// The cells claimed by this flow: its termini and any seeded cells before solving, its path afterwards.
    pub fn claimed(&self) -> &CellMask {
        &self.claimed
    }

    /// Whether a search has committed a path to this flow.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub(crate) fn is_terminus(&self, bit: usize) -> bool {
        bit == self.start || bit == self.end
    }

    /// Claim the cells of a discovered path.
    pub(crate) fn commit(&mut self, path: CellMask) {
        self.claimed = path;
        self.solved = true;
    }

    /// Return to a claim recorded before a search level began.
    pub(crate) fn restore(&mut self, snapshot: FlowSnapshot) {
        self.claimed = snapshot.claimed;
        self.solved = snapshot.solved;
    }

    pub(crate) fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot { claimed: self.claimed.clone(), solved: self.solved }
    }
}

/// The mutable part of a [`Flow`], saved on entry to a search level.
pub(crate) struct FlowSnapshot {
    claimed: CellMask,
    solved: bool,
}
