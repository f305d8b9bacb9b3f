//! Hex coordinate system using axial coordinates (q, r).
//!
//! This module provides the foundational coordinate types for the hex-based game board:
//! - `HexCoord`: Identifies individual hex tiles
//! - `LatticePoint`: Identifies a hex corner on an integer lattice
//!
//! Corners are expressed in thirds of a hex step. Scaling every axial coordinate by
//! [`LATTICE_SCALE`] turns those thirds into whole numbers, so two hexes that share a
//! corner always produce the exact same key and deduplication is a plain equality test.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Factor applied to axial coordinates before adding corner offsets
pub const LATTICE_SCALE: i32 = 3;

/// Corner offsets on the scaled lattice, in ring order starting from the top corner.
///
/// Consecutive entries (wrapping around) are the two ends of one side of the hex.
pub const CORNER_OFFSETS: [(i32, i32); 6] = [
    (-1, 2),  // North
    (1, 1),   // NorthEast
    (2, -1),  // SouthEast
    (1, -2),  // South
    (-1, -1), // SouthWest
    (-2, 1),  // NorthWest
];

/// Axial coordinate for hex grid.
///
/// In axial coordinates:
/// - `q` increases going east (right)
/// - `r` increases going southeast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct HexCoord {
    /// Column (increases going east)
    pub q: i32,
    /// Row (increases going southeast)
    pub r: i32,
}

impl HexCoord {
    /// Create a new hex coordinate
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The six neighboring hexes in clockwise order starting from East
    pub fn neighbors(&self) -> [HexCoord; 6] {
        [
            HexCoord::new(self.q + 1, self.r),     // East
            HexCoord::new(self.q + 1, self.r - 1), // NorthEast
            HexCoord::new(self.q, self.r - 1),     // NorthWest
            HexCoord::new(self.q - 1, self.r),     // West
            HexCoord::new(self.q - 1, self.r + 1), // SouthWest
            HexCoord::new(self.q, self.r + 1),     // SouthEast
        ]
    }

    /// The six corners of this hex on the integer lattice, in ring order
    pub fn corners(&self) -> [LatticePoint; 6] {
        CORNER_OFFSETS.map(|(dx, dy)| {
            LatticePoint::new(LATTICE_SCALE * self.q + dx, LATTICE_SCALE * self.r + dy)
        })
    }

    /// The six sides of this hex as pairs of corners, each pair in lexicographic order
    pub fn sides(&self) -> [(LatticePoint, LatticePoint); 6] {
        let corners = self.corners();
        std::array::from_fn(|i| {
            let a = corners[i];
            let b = corners[(i + 1) % 6];
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        })
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// A hex corner on the scaled integer lattice.
///
/// Ordering is lexicographic on `(x, y)` and doubles as the canonical vertex order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LatticePoint {
    pub x: i32,
    pub y: i32,
}

impl LatticePoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for LatticePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_neighbors_share_exactly_two_corners() {
        let center = HexCoord::new(0, 0);
        let own: HashSet<_> = center.corners().into_iter().collect();

        for neighbor in center.neighbors() {
            let shared = neighbor.corners().iter().filter(|c| own.contains(c)).count();
            assert_eq!(shared, 2, "Neighbor {} should share one side", neighbor);
        }
    }

    #[test]
    fn test_neighbors_share_exactly_one_side() {
        let center = HexCoord::new(0, 0);
        let own: HashSet<_> = center.sides().into_iter().collect();

        for neighbor in center.neighbors() {
            let shared = neighbor.sides().iter().filter(|s| own.contains(s)).count();
            assert_eq!(shared, 1);
        }
    }

    #[test]
    fn test_sides_are_ordered_and_distinct() {
        let hex = HexCoord::new(1, -2);
        let sides = hex.sides();

        let unique: HashSet<_> = sides.iter().collect();
        assert_eq!(unique.len(), 6);
        for (a, b) in sides {
            assert!(a < b, "Side endpoints should be in lattice order");
        }
    }

    #[test]
    fn test_lattice_point_display() {
        assert_eq!(LatticePoint::new(-1, 2).to_string(), "-1,2");
    }
}
