//! Discrete grid coordinates

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer coordinate of one grid square.
///
/// `x` runs along world +X and `z` along world +Z. Cell `(0, 0)` is the
/// corner of the grid with the smallest world coordinates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    /// Orthogonal neighbour offsets in search order: +x, -x, +z, -z.
    pub const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

    /// Diagonal neighbour offsets, visited after the orthogonal ones.
    pub const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Cell shifted by an offset, clamped at the `i32` range
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            z: self.z.saturating_add(dz),
        }
    }

    /// Manhattan distance to another cell
    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.z.abs_diff(other.z)
    }

    /// Whether `other` is exactly one orthogonal step away
    #[must_use]
    pub fn is_orthogonal_neighbor(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }

    /// Whether `other` is one step away in any of the 8 directions
    #[must_use]
    pub fn is_neighbor(self, other: Self) -> bool {
        self != other && self.x.abs_diff(other.x) <= 1 && self.z.abs_diff(other.z) <= 1
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, z): (i32, i32)) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}
