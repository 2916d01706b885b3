use serde::{Deserialize, Serialize};

use crate::{EngineError, Result};

/// Single coordinate axis used for grid height, width, and positions.
pub type Coord = u8;

/// Count type used for sentence mine counts and total-cell counts.
pub type CellCount = u16;

/// Cell coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Bounded `height × width` playing field. Only knows shape, never contents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    height: Coord,
    width: Coord,
}

impl Grid {
    pub fn new(height: Coord, width: Coord) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(EngineError::InvalidBoardSize);
        }
        Ok(Self { height, width })
    }

    pub const fn height(&self) -> Coord {
        self.height
    }

    pub const fn width(&self) -> Coord {
        self.width
    }

    pub const fn size(&self) -> Coord2 {
        (self.height, self.width)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.height, self.width)
    }

    pub const fn contains(&self, (row, col): Coord2) -> bool {
        row < self.height && col < self.width
    }

    pub fn validate(&self, cell: Coord2) -> Result<Coord2> {
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(EngineError::InvalidCoords)
        }
    }

    /// In-bounds 8-neighbourhood of `cell`, excluding `cell` itself.
    pub fn neighbors(&self, cell: Coord2) -> NeighborIter {
        NeighborIter::new(cell, self.size())
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (height, width) = self.size();
        (0..height).flat_map(move |row| (0..width).map(move |col| (row, col)))
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Offsets `cell` by `delta`, yielding a value only when it stays inside `bounds`.
fn offset(cell: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let row = cell.0.checked_add_signed(delta.0)?;
    let col = cell.1.checked_add_signed(delta.1)?;
    (row < bounds.0 && col < bounds.1).then_some((row, col))
}

#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    next: usize,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            next: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = DISPLACEMENTS.get(self.next) {
            self.next += 1;
            if let Some(cell) = offset(self.center, delta, self.bounds) {
                return Some(cell);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(DISPLACEMENTS.len() - self.next))
    }
}
