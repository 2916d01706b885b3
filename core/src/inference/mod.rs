use alloc::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::*;

pub use knowledge::*;
pub use sentence::*;

mod knowledge;
mod sentence;

/// Cells proven to be mines or safe.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conclusions {
    pub mines: BTreeSet<Coord2>,
    pub safes: BTreeSet<Coord2>,
}

impl Conclusions {
    pub fn is_empty(&self) -> bool {
        self.mines.is_empty() && self.safes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mines.len() + self.safes.len()
    }

    /// Folds `other` in, keeping both sides disjoint as long as the inputs are.
    pub fn merge(&mut self, other: Conclusions) {
        self.mines.extend(other.mines);
        self.safes.extend(other.safes);
    }
}
