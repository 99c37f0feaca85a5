//! Fixed-domain bitset over board cells, with the push/slide primitive

use crate::board::{Direction, Position, CELL_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Set of board cells, one bit per canonical index
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionSet(u64);

impl PositionSet {
    pub const EMPTY: PositionSet = PositionSet(0);

    /// Every cell of the board
    pub const FULL: PositionSet = PositionSet((1u64 << CELL_COUNT) - 1);

    #[inline]
    pub fn insert(&mut self, pos: Position) {
        self.0 |= 1 << pos.index();
    }

    #[inline]
    pub fn remove(&mut self, pos: Position) {
        self.0 &= !(1 << pos.index());
    }

    #[inline]
    pub fn contains(self, pos: Position) -> bool {
        self.0 & (1 << pos.index()) != 0
    }

    pub fn union(self, other: PositionSet) -> PositionSet {
        PositionSet(self.0 | other.0)
    }

    pub fn difference(self, other: PositionSet) -> PositionSet {
        PositionSet(self.0 & !other.0)
    }

    pub fn intersection(self, other: PositionSet) -> PositionSet {
        PositionSet(self.0 & other.0)
    }

    pub fn intersects(self, other: PositionSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Population count
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Cells in canonical order
    pub fn iter(self) -> impl Iterator<Item = Position> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Position::new(index)
        })
    }

    // ========================================================================
    // PUSH PHYSICS
    // ========================================================================

    /// Whether a piece entering from edge cell `pos` can push toward `dir`,
    /// treating `self` as the combined occupancy.
    ///
    /// The chain starting at the neighbor of `pos` must reach an empty cell
    /// before it runs off the board. The edge cell itself is not part of it.
    pub fn can_push_from(self, pos: Position, dir: Direction) -> bool {
        let mut current = pos.neighbor(dir);
        while let Some(cell) = current {
            if !self.contains(cell) {
                return true;
            }
            current = cell.neighbor(dir);
        }
        false
    }

    /// Bring a new piece of this set's owner in from edge cell `pos`: it
    /// lands on the neighbor along `dir` and the occupied chain from there
    /// shifts one step.
    ///
    /// `occupied` is the combined occupancy of both players and is updated in
    /// place. The walk stops at the first previously-empty cell, which absorbs
    /// the last piece of the chain. Cells outside the chain, `pos` included,
    /// are untouched; the other player's set is `occupied.difference(self)`
    /// afterwards.
    pub fn slide(&mut self, pos: Position, dir: Direction, occupied: &mut PositionSet) {
        debug_assert!(occupied.can_push_from(pos, dir), "slide from {} {} is blocked", pos, dir);

        // Whether the piece moving into the current cell belongs to us
        let mut carrying_own = true;
        let mut current = pos.neighbor(dir);
        while let Some(cell) = current {
            let was_own = self.contains(cell);
            let was_occupied = occupied.contains(cell);

            if carrying_own {
                self.insert(cell);
            } else {
                self.remove(cell);
            }

            if !was_occupied {
                occupied.insert(cell);
                break;
            }
            carrying_own = was_own;
            current = cell.neighbor(dir);
        }
    }
}

impl FromIterator<Position> for PositionSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut set = PositionSet::EMPTY;
        for pos in iter {
            set.insert(pos);
        }
        set
    }
}

impl fmt::Display for PositionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, pos) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", pos)?;
        }
        f.write_str("}")
    }
}
