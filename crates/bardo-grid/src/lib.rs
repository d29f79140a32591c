//! Bardo Grid Topology
//!
//! Square cell grid with an 8-connected, bounds-clipped neighborhood.
//!
//! # Layout
//!
//! A grid is always `dimension × dimension` cells, sized to cover the longer
//! side of a pixel surface. Cells are addressed by [`GridCoord`] and stored
//! flat in `grid[x][y]` order (see [`GridBounds::index_of`]).
//!
//! # Neighborhood
//!
//! Neighbors are the cells one king move away. The grid does not wrap, so
//! the neighborhood shrinks at the border:
//! - interior cells: 8 neighbors
//! - edge cells: 5 neighbors
//! - corner cells: 3 neighbors

mod coord;
mod neighbors;

pub use coord::{GridBounds, GridCoord, Offset};
pub use neighbors::Neighbors;

/// Maximum number of neighbors any cell can have.
pub const MAX_NEIGHBORS: usize = 8;

/// Neighbors of a cell on an edge (but not a corner).
pub const EDGE_NEIGHBORS: usize = 5;

/// Neighbors of a corner cell.
pub const CORNER_NEIGHBORS: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighborhood_sizes() {
        let bounds = GridBounds::square(3);
        assert_eq!(Neighbors::count(GridCoord::new(1, 1), bounds), MAX_NEIGHBORS);
        assert_eq!(Neighbors::count(GridCoord::new(1, 0), bounds), EDGE_NEIGHBORS);
        assert_eq!(Neighbors::count(GridCoord::new(0, 0), bounds), CORNER_NEIGHBORS);
    }
}
