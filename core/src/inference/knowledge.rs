use alloc::collections::BTreeSet;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;

use super::{Conclusions, Sentence};
use crate::*;

/// Stable handle to a sentence stored in a [`KnowledgeBase`].
pub type SentenceId = usize;

/// Growing set of sentences, closed under the subset-difference rule at insertion time.
///
/// Sentences live in insertion-ordered slots. A `Cell -> {SentenceId}` index lets marking,
/// deduplication, and subset lookups touch only the sentences that mention a given cell.
#[derive(Clone, Debug, Default)]
pub struct KnowledgeBase {
    slots: Vec<Option<Sentence>>,
    index: HashMap<Coord2, BTreeSet<SentenceId>>,
    live: usize,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live sentences in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Sentence> {
        self.slots.iter().flatten()
    }

    pub fn get(&self, id: SentenceId) -> Option<&Sentence> {
        self.slots.get(id)?.as_ref()
    }

    pub fn sentences_with(&self, cell: Coord2) -> impl Iterator<Item = &Sentence> {
        self.index
            .get(&cell)
            .into_iter()
            .flatten()
            .filter_map(|&id| self.get(id))
    }

    pub fn contains(&self, sentence: &Sentence) -> bool {
        self.find_equal(sentence, None).is_some()
    }

    /// Adds `sentence` and everything the subset-difference rule derives from it.
    ///
    /// Each pending sentence is compared only against sentences stored before it, never
    /// against itself. Derived sentences go back on the worklist and are handled depth-first
    /// in the order they were derived. Every derived sentence is strictly smaller than one of
    /// its parents, so the worklist drains. Returns how many sentences were stored.
    pub fn add(&mut self, sentence: Sentence) -> usize {
        let mut pending = vec![sentence];
        let mut stored = 0;

        while let Some(sentence) = pending.pop() {
            if sentence.is_empty() || self.contains(&sentence) {
                continue;
            }

            let mut inferred = Vec::new();
            for id in self.related(&sentence) {
                let Some(known) = self.get(id) else {
                    continue;
                };

                if sentence.is_subset(known) {
                    inferred.extend(known.difference(&sentence));
                }
                if known.is_subset(&sentence) {
                    inferred.extend(sentence.difference(known));
                }
            }

            for derived in &inferred {
                log::trace!("Inferred {derived} from {sentence}");
            }

            self.insert(sentence);
            stored += 1;
            pending.extend(inferred.into_iter().rev());
        }

        stored
    }

    /// Removes a mine from every sentence mentioning it. Returns how many sentences changed.
    pub fn mark_mine(&mut self, cell: Coord2) -> usize {
        self.mark(cell, Sentence::mark_mine)
    }

    /// Removes a safe cell from every sentence mentioning it. Returns how many sentences changed.
    pub fn mark_safe(&mut self, cell: Coord2) -> usize {
        self.mark(cell, Sentence::mark_safe)
    }

    /// Union of every cell some sentence alone proves to be a mine or safe.
    pub fn extract_certain(&self) -> Conclusions {
        let mut conclusions = Conclusions::default();
        for sentence in self.iter() {
            conclusions.mines.extend(sentence.known_mines());
            conclusions.safes.extend(sentence.known_safes());
        }
        conclusions
    }

    fn mark(&mut self, cell: Coord2, apply: fn(&mut Sentence, Coord2) -> bool) -> usize {
        let Some(ids) = self.index.remove(&cell) else {
            return 0;
        };

        let mut changed = 0;
        for id in ids {
            let Some(sentence) = self.slots[id].as_mut() else {
                continue;
            };
            if !apply(sentence, cell) {
                continue;
            }
            changed += 1;

            let vacuous = sentence.is_empty();
            if vacuous || self.find_equal_to_slot(id).is_some() {
                self.discard(id);
            }
        }
        changed
    }

    /// Ids of live sentences sharing at least one cell with `sentence`, ascending.
    ///
    /// Any stored superset or non-empty subset of `sentence` is among them.
    fn related(&self, sentence: &Sentence) -> BTreeSet<SentenceId> {
        sentence
            .cells()
            .iter()
            .filter_map(|cell| self.index.get(cell))
            .flatten()
            .copied()
            .collect()
    }

    fn find_equal(&self, sentence: &Sentence, skip: Option<SentenceId>) -> Option<SentenceId> {
        let first = sentence.cells().first()?;
        self.index
            .get(first)?
            .iter()
            .copied()
            .filter(|&id| Some(id) != skip)
            .find(|&id| self.get(id) == Some(sentence))
    }

    fn find_equal_to_slot(&self, id: SentenceId) -> Option<SentenceId> {
        let sentence = self.get(id)?;
        self.find_equal(sentence, Some(id))
    }

    fn insert(&mut self, sentence: Sentence) -> SentenceId {
        let id = self.slots.len();
        for &cell in sentence.cells() {
            self.index.entry(cell).or_default().insert(id);
        }
        self.slots.push(Some(sentence));
        self.live += 1;
        id
    }

    fn discard(&mut self, id: SentenceId) {
        let Some(sentence) = self.slots[id].take() else {
            return;
        };
        for cell in sentence.cells() {
            if let Some(ids) = self.index.get_mut(cell) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.index.remove(cell);
                }
            }
        }
        self.live -= 1;
    }
}
