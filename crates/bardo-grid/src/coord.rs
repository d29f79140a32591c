//! Square grid coordinates.
//!
//! Cells live at non-negative integer positions `(x, y)` inside a fixed
//! square. Offsets between cells are signed, so a step can leave the grid;
//! [`GridBounds::offset`] is the only way to turn a step back into a
//! coordinate and it refuses to wrap around.

/// A position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoord {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
}

impl GridCoord {
    /// Top-left corner of every grid.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new coordinate.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Top-left pixel of this cell for a given cell size.
    pub fn to_pixels(&self, cell_size: f64) -> (f64, f64) {
        (self.x as f64 * cell_size, self.y as f64 * cell_size)
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A signed step between two grid positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    pub dx: i64,
    pub dy: i64,
}

impl Offset {
    pub const fn new(dx: i64, dy: i64) -> Self {
        Self { dx, dy }
    }
}

/// Extent of a square grid (`dimension × dimension` cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBounds {
    dimension: usize,
}

impl GridBounds {
    /// Bounds of a square grid with the given side length.
    pub const fn square(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Bounds large enough to cover a `width × height` pixel surface with
    /// square cells of `cell_size` pixels.
    ///
    /// The grid is square, so the longer side decides the dimension.
    /// Returns `None` for a zero cell size.
    pub fn covering(width: u32, height: u32, cell_size: u32) -> Option<Self> {
        if cell_size == 0 {
            return None;
        }
        let longest = width.max(height);
        Some(Self::square(longest.div_ceil(cell_size) as usize))
    }

    /// Side length in cells.
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Total number of cells.
    pub const fn len(&self) -> usize {
        self.dimension * self.dimension
    }

    pub const fn is_empty(&self) -> bool {
        self.dimension == 0
    }

    /// Whether the coordinate lies inside the grid.
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x < self.dimension && coord.y < self.dimension
    }

    /// Apply a step, returning `None` when it leaves the grid.
    pub fn offset(&self, coord: GridCoord, step: Offset) -> Option<GridCoord> {
        let x = coord.x as i64 + step.dx;
        let y = coord.y as i64 + step.dy;
        if x < 0 || y < 0 {
            return None;
        }
        let target = GridCoord::new(x as usize, y as usize);
        self.contains(target).then_some(target)
    }

    /// Flat storage index of a coordinate. Cells are stored as `grid[x][y]`.
    pub fn index_of(&self, coord: GridCoord) -> Option<usize> {
        self.contains(coord)
            .then_some(coord.x * self.dimension + coord.y)
    }

    /// All coordinates in storage order.
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> {
        let dimension = self.dimension;
        (0..dimension).flat_map(move |x| (0..dimension).map(move |y| GridCoord::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_zero() {
        assert_eq!(GridCoord::ORIGIN, GridCoord::new(0, 0));
    }

    #[test]
    fn covering_rounds_up() {
        assert_eq!(GridBounds::covering(100, 60, 20).unwrap().dimension(), 5);
        assert_eq!(GridBounds::covering(101, 60, 20).unwrap().dimension(), 6);
        assert_eq!(GridBounds::covering(60, 101, 20).unwrap().dimension(), 6);
        assert_eq!(GridBounds::covering(0, 0, 20).unwrap().dimension(), 0);
        assert!(GridBounds::covering(100, 100, 0).is_none());
    }

    #[test]
    fn offset_is_clipped() {
        let bounds = GridBounds::square(3);
        assert_eq!(bounds.offset(GridCoord::ORIGIN, Offset::new(-1, 0)), None);
        assert_eq!(bounds.offset(GridCoord::new(2, 2), Offset::new(1, 1)), None);
        assert_eq!(
            bounds.offset(GridCoord::new(1, 1), Offset::new(1, -1)),
            Some(GridCoord::new(2, 0))
        );
    }

    #[test]
    fn storage_order_matches_index() {
        let bounds = GridBounds::square(4);
        for (i, coord) in bounds.coords().enumerate() {
            assert_eq!(bounds.index_of(coord), Some(i));
        }
        assert_eq!(bounds.coords().count(), bounds.len());
        assert_eq!(bounds.index_of(GridCoord::new(4, 0)), None);
    }
}
