//! 8-Connected Neighborhood
//!
//! Every interior cell has exactly 8 neighbors, one at each compass point.
//! The grid does not wrap: cells on an edge have 5 neighbors and corner
//! cells have 3.

use crate::{GridBounds, GridCoord, Offset, MAX_NEIGHBORS};

/// The compass-point neighborhood of a cell.
#[derive(Debug, Clone, Copy)]
pub struct Neighbors;

impl Neighbors {
    /// The 8 compass directions, row by row from the north-west.
    pub const DIRECTIONS: [Offset; MAX_NEIGHBORS] = [
        Offset::new(-1, -1), // North-west
        Offset::new(0, -1),  // North
        Offset::new(1, -1),  // North-east
        Offset::new(-1, 0),  // West
        Offset::new(1, 0),   // East
        Offset::new(-1, 1),  // South-west
        Offset::new(0, 1),   // South
        Offset::new(1, 1),   // South-east
    ];

    /// Neighbors of `coord` that lie inside `bounds`, in direction order.
    pub fn of(coord: GridCoord, bounds: GridBounds) -> impl Iterator<Item = GridCoord> {
        Self::DIRECTIONS
            .into_iter()
            .filter_map(move |step| bounds.offset(coord, step))
    }

    /// Number of in-bounds neighbors of `coord`.
    pub fn count(coord: GridCoord, bounds: GridBounds) -> usize {
        Self::of(coord, bounds).count()
    }
}
