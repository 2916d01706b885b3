use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// What the agent holds about a single cell. Mines and safe cells are disjoint by construction,
/// and every visited cell is safe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKnowledge {
    Unknown,
    Safe,
    Mine,
    /// Revealed by a move, with the adjacent mine count the board reported.
    Visited(u8),
}

impl CellKnowledge {
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_safe(self) -> bool {
        matches!(self, Self::Safe | Self::Visited(_))
    }

    pub const fn is_visited(self) -> bool {
        matches!(self, Self::Visited(_))
    }
}

impl Default for CellKnowledge {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Minesweeper player for a single game.
///
/// Feeds every observation into its [`KnowledgeBase`], records whatever becomes certain, and
/// proposes the next move. Known mines, known safe cells, and moves made only ever grow.
#[derive(Clone, Debug)]
pub struct Agent {
    config: AgentConfig,
    grid: Grid,
    cells: Array2<CellKnowledge>,
    knowledge: KnowledgeBase,
    rng: SmallRng,
}

impl Agent {
    pub fn new(height: Coord, width: Coord) -> Result<Self> {
        Self::with_config(AgentConfig::new_unchecked((height, width), 0))
    }

    pub fn with_config(config: AgentConfig) -> Result<Self> {
        let grid = config.grid()?;
        Ok(Self {
            config,
            grid,
            cells: Array2::default(grid.size().to_nd_index()),
            knowledge: KnowledgeBase::new(),
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn knowledge_at(&self, cell: Coord2) -> CellKnowledge {
        self.cells[cell.to_nd_index()]
    }

    pub fn is_known_mine(&self, cell: Coord2) -> bool {
        self.grid.contains(cell) && self.knowledge_at(cell).is_mine()
    }

    pub fn is_known_safe(&self, cell: Coord2) -> bool {
        self.grid.contains(cell) && self.knowledge_at(cell).is_safe()
    }

    pub fn moves_made(&self) -> BTreeSet<Coord2> {
        self.cells_where(CellKnowledge::is_visited)
    }

    pub fn known_mines(&self) -> BTreeSet<Coord2> {
        self.cells_where(CellKnowledge::is_mine)
    }

    pub fn known_safes(&self) -> BTreeSet<Coord2> {
        self.cells_where(CellKnowledge::is_safe)
    }

    /// Every cell has been either visited or proven to be a mine.
    pub fn is_finished(&self) -> bool {
        self.cells
            .iter()
            .all(|&knowledge| knowledge.is_visited() || knowledge.is_mine())
    }

    /// Records that `cell` was revealed safe with `count` adjacent mines, and returns what
    /// that lets the agent newly prove.
    pub fn observe(&mut self, cell: Coord2, count: u8) -> Result<Conclusions> {
        let cell = self.grid.validate(cell)?;
        let neighbors: SmallVec<[Coord2; 8]> = self.grid.neighbors(cell).collect();
        if usize::from(count) > neighbors.len() {
            return Err(EngineError::CountOutOfRange {
                count,
                neighbors: neighbors.len() as CellCount,
            });
        }

        match self.knowledge_at(cell) {
            CellKnowledge::Mine => return Err(EngineError::ConflictingKnowledge { cell }),
            CellKnowledge::Visited(previous) if previous != count => {
                return Err(EngineError::ConflictingObservation {
                    cell,
                    previous,
                    count,
                });
            }
            _ => {}
        }

        log::debug!("Observed {cell:?} with {count} adjacent mines");
        self.cells[cell.to_nd_index()] = CellKnowledge::Visited(count);
        self.knowledge.mark_safe(cell);

        let mut sentence = Sentence::new(neighbors.iter().copied(), count.into());
        for &neighbor in &neighbors {
            let known = self.knowledge_at(neighbor);
            if known.is_mine() {
                sentence.mark_mine(neighbor);
            } else if known.is_safe() {
                sentence.mark_safe(neighbor);
            }
        }
        self.knowledge.add(sentence);

        Ok(self.apply_certain())
    }

    /// Records a mine asserted by the caller.
    pub fn mark_mine(&mut self, cell: Coord2) -> Result<MarkOutcome> {
        let cell = self.grid.validate(cell)?;
        self.learn(cell, true)
    }

    /// Records a safe cell asserted by the caller.
    pub fn mark_safe(&mut self, cell: Coord2) -> Result<MarkOutcome> {
        let cell = self.grid.validate(cell)?;
        self.learn(cell, false)
    }

    /// A cell proven safe that hasn't been played yet.
    pub fn next_safe_move(&self) -> Option<Coord2> {
        self.grid
            .cells()
            .find(|&cell| self.knowledge_at(cell) == CellKnowledge::Safe)
    }

    /// A uniformly random cell that hasn't been played and isn't a known mine.
    pub fn next_guess_move(&mut self) -> Option<Coord2> {
        let eligible: Vec<Coord2> = self
            .grid
            .cells()
            .filter(|&cell| {
                let known = self.knowledge_at(cell);
                !known.is_visited() && !known.is_mine()
            })
            .collect();

        match eligible.len() {
            0 => None,
            1 => Some(eligible[0]),
            len => Some(eligible[self.rng.random_range(0..len)]),
        }
    }

    /// Extracts certain cells from the knowledge base and records the new ones.
    fn apply_certain(&mut self) -> Conclusions {
        let mut discovered = Conclusions::default();

        loop {
            let certain = self.knowledge.extract_certain();
            let mut fresh = Conclusions::default();

            for cell in certain.mines {
                if self.learn_deduced(cell, true) {
                    fresh.mines.insert(cell);
                }
            }
            for cell in certain.safes {
                if self.learn_deduced(cell, false) {
                    fresh.safes.insert(cell);
                }
            }

            let progressed = !fresh.is_empty();
            discovered.merge(fresh);
            if !progressed || self.config.extraction == ExtractionPolicy::SinglePass {
                break;
            }
        }

        discovered
    }

    fn learn_deduced(&mut self, cell: Coord2, mine: bool) -> bool {
        match self.learn(cell, mine) {
            Ok(outcome) => {
                if outcome.has_update() {
                    log::debug!(
                        "Deduced {} at {cell:?}",
                        if mine { "mine" } else { "safe cell" }
                    );
                }
                outcome.has_update()
            }
            Err(err) => {
                debug_assert!(false, "unsound deduction: {err}");
                log::warn!("Discarding deduction: {err}");
                false
            }
        }
    }

    fn learn(&mut self, cell: Coord2, mine: bool) -> Result<MarkOutcome> {
        use CellKnowledge::*;
        use MarkOutcome::*;

        let index = cell.to_nd_index();
        Ok(match (self.cells[index], mine) {
            (Unknown, true) => {
                self.cells[index] = Mine;
                self.knowledge.mark_mine(cell);
                Changed
            }
            (Unknown, false) => {
                self.cells[index] = Safe;
                self.knowledge.mark_safe(cell);
                Changed
            }
            (Mine, true) | (Safe | Visited(_), false) => NoChange,
            (Mine, false) | (Safe | Visited(_), true) => {
                return Err(EngineError::ConflictingKnowledge { cell });
            }
        })
    }

    fn cells_where(&self, predicate: fn(CellKnowledge) -> bool) -> BTreeSet<Coord2> {
        self.grid
            .cells()
            .filter(|&cell| predicate(self.knowledge_at(cell)))
            .collect()
    }
}
