use alloc::collections::BTreeSet;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::*;

/// Exactly `count` of `cells` are mines.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sentence {
    cells: BTreeSet<Coord2>,
    count: CellCount,
}

impl Sentence {
    pub fn new(cells: impl IntoIterator<Item = Coord2>, count: CellCount) -> Self {
        let cells: BTreeSet<_> = cells.into_iter().collect();
        debug_assert!(
            usize::from(count) <= cells.len(),
            "sentence claims {count} mines among {} cells",
            cells.len()
        );
        Self { cells, count }
    }

    pub fn cells(&self) -> &BTreeSet<Coord2> {
        &self.cells
    }

    pub fn count(&self) -> CellCount {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A sentence without cells carries no information.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Coord2) -> bool {
        self.cells.contains(&cell)
    }

    pub fn known_mines(&self) -> BTreeSet<Coord2> {
        if !self.is_empty() && usize::from(self.count) == self.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    pub fn known_safes(&self) -> BTreeSet<Coord2> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Removes a cell known to be a mine. Returns whether the sentence changed.
    pub fn mark_mine(&mut self, cell: Coord2) -> bool {
        if !self.cells.remove(&cell) {
            return false;
        }
        debug_assert!(self.count > 0, "mine {cell:?} marked in a zero-count sentence");
        self.count = self.count.saturating_sub(1);
        true
    }

    /// Removes a cell known to be safe. Returns whether the sentence changed.
    pub fn mark_safe(&mut self, cell: Coord2) -> bool {
        let removed = self.cells.remove(&cell);
        debug_assert!(
            usize::from(self.count) <= self.cells.len(),
            "safe {cell:?} marked in a sentence whose cells were all mines"
        );
        removed
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.cells.is_subset(&other.cells)
    }

    /// Cells of `self` outside `subset` hold exactly the mines `subset` doesn't account for.
    ///
    /// `subset` must be a subset of `self`. Returns `None` when the counts contradict each
    /// other, which only happens when the observations fed in were untruthful.
    pub fn difference(&self, subset: &Self) -> Option<Self> {
        debug_assert!(subset.is_subset(self));

        let cells: BTreeSet<_> = self.cells.difference(&subset.cells).copied().collect();
        let count = self.count.checked_sub(subset.count);
        match count {
            Some(count) if usize::from(count) <= cells.len() => Some(Self { cells, count }),
            _ => {
                debug_assert!(false, "contradicting sentences: {self} and {subset}");
                log::warn!("Ignoring contradicting sentences {self} and {subset}");
                None
            }
        }
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (row, col)) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({row}, {col})")?;
        }
        write!(f, "}} = {}", self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn zero_count_yields_all_cells_safe() {
        let sentence = Sentence::new([(0, 0), (0, 1)], 0);

        assert_eq!(sentence.known_safes(), BTreeSet::from([(0, 0), (0, 1)]));
        assert!(sentence.known_mines().is_empty());
    }

    #[test]
    fn full_count_yields_all_cells_mines() {
        let sentence = Sentence::new([(2, 2), (2, 3), (3, 3)], 3);

        assert_eq!(sentence.known_mines().len(), 3);
        assert!(sentence.known_safes().is_empty());
    }

    #[test]
    fn vacuous_sentence_yields_nothing() {
        let sentence = Sentence::new(BTreeSet::new(), 0);

        assert!(sentence.is_empty());
        assert!(sentence.known_mines().is_empty());
        assert!(sentence.known_safes().is_empty());
    }

    #[test]
    fn marking_removes_cells_and_tracks_count() {
        let mut sentence = Sentence::new([(0, 0), (0, 1), (0, 2)], 2);

        assert!(sentence.mark_mine((0, 0)));
        assert_eq!(sentence, Sentence::new([(0, 1), (0, 2)], 1));

        assert!(sentence.mark_safe((0, 2)));
        assert_eq!(sentence, Sentence::new([(0, 1)], 1));
        assert_eq!(sentence.known_mines(), BTreeSet::from([(0, 1)]));

        assert!(!sentence.mark_mine((5, 5)));
        assert!(!sentence.mark_safe((0, 0)));
        assert_eq!(sentence.count(), 1);
    }

    #[test]
    fn difference_of_subset_subtracts_counts() {
        let outer = Sentence::new([(0, 0), (0, 1), (0, 2)], 2);
        let inner = Sentence::new([(0, 0), (0, 1)], 1);

        assert!(inner.is_subset(&outer));
        assert_eq!(outer.difference(&inner), Some(Sentence::new([(0, 2)], 1)));
    }

    #[test]
    fn display_lists_cells_and_count() {
        let sentence = Sentence::new([(1, 0), (0, 1)], 1);

        assert_eq!(sentence.to_string(), "{(0, 1), (1, 0)} = 1");
    }
}
