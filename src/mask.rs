use std::fmt::{Debug, Formatter};

use bitvec::prelude::*;

/// A set of cells on one board, one bit per cell in row-major order.
///
/// The same type stands for a single cell, a path, a flow's claimed region or the occupancy of a whole board.
/// Set operations work a machine word at a time.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CellMask {
    bits: BitVec,
}

impl CellMask {
    /// A mask over `cells` cells with nothing set.
    pub fn empty(cells: usize) -> Self {
        Self { bits: bitvec![0; cells] }
    }

    /// A mask over `cells` cells with only `bit` set.
    pub fn single(cells: usize, bit: usize) -> Self {
        let mut mask = Self::empty(cells);
        mask.insert(bit);
        mask
    }

    /// Number of cells this mask ranges over, set or not.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Set `bit`. Returns whether it was previously unset.
    pub fn insert(&mut self, bit: usize) -> bool {
        !self.bits.replace(bit, true)
    }

    /// Unset `bit`.
    pub fn remove(&mut self, bit: usize) {
        self.bits.set(bit, false);
    }

    /// Test membership of `bit`.
    #[inline]
    pub fn contains(&self, bit: usize) -> bool {
        self.bits.get(bit).as_deref() == Some(&true)
    }

    /// A copy of `self` with `bit` also set.
    #[must_use]
    pub fn with(&self, bit: usize) -> Self {
        let mut mask = self.clone();
        mask.insert(bit);
        mask
    }

    /// Union `other` into `self`.
    pub fn union_with(&mut self, other: &Self) {
        debug_assert_eq!(self.len(), other.len());
        for (word, theirs) in self.bits.as_raw_mut_slice().iter_mut().zip(other.bits.as_raw_slice()) {
            *word |= *theirs;
        }
    }

    /// A new mask holding every cell of `self` or `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut mask = self.clone();
        mask.union_with(other);
        mask
    }

    /// A new mask holding the cells of `self` not in `other`.
    #[must_use]
    pub fn without(&self, other: &Self) -> Self {
        debug_assert_eq!(self.len(), other.len());
        let mut mask = self.clone();
        for (word, theirs) in mask.bits.as_raw_mut_slice().iter_mut().zip(other.bits.as_raw_slice()) {
            *word &= !*theirs;
        }
        mask
    }

    /// Whether `self` and `other` share no cell.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.bits.as_raw_slice().iter()
            .zip(other.bits.as_raw_slice())
            .all(|(ours, theirs)| ours & theirs == 0)
    }

    /// Whether every cell of `self` is also in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.bits.as_raw_slice().iter()
            .zip(other.bits.as_raw_slice())
            .all(|(ours, theirs)| ours & !theirs == 0)
    }

    /// Whether no cell is set.
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Number of cells set.
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Indices of the set cells, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }
}

impl Debug for CellMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter_ones()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::CellMask;

    #[test]
    fn set_operations_span_word_boundaries() {
        // 130 cells needs three 64 bit words
        let mut a = CellMask::single(130, 3);
        a.insert(70);
        let b = CellMask::single(130, 129);

        assert!(a.is_disjoint(&b));
        let both = a.union(&b);
        assert_eq!(both.iter_ones().collect::<Vec<_>>(), vec![3, 70, 129]);
        assert!(!both.is_disjoint(&b));
        assert!(a.is_subset(&both));
        assert!(!both.is_subset(&a));
        assert_eq!(both.without(&a), b);
        assert_eq!(both.count(), 3);
    }

    #[test]
    fn insert_reports_novelty() {
        let mut mask = CellMask::empty(9);
        assert!(mask.is_empty());
        assert!(mask.insert(4));
        assert!(!mask.insert(4));
        assert!(mask.contains(4));
        assert!(!mask.contains(5));
        assert_eq!(mask.with(5), CellMask::single(9, 4).union(&CellMask::single(9, 5)));
    }
}
