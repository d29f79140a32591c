//! The grid of cells and the soul pool they share.

use bardo_grid::{GridBounds, GridCoord, Neighbors};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bardo::Bardo;
use crate::cell::{Cell, CellId, CellSnapshot, CellState};
use crate::clock::Millis;
use crate::config::SimConfig;
use crate::error::{Error, Result};
use crate::karma::{Karma, KarmaRange};
use crate::render::Renderer;

/// Pixel size of the surface the grid is drawn onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Living and dead cells around one position.
///
/// Birthing and dying neighbors count toward neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborTally {
    pub alive: usize,
    pub dead: usize,
    pub total: usize,
}

/// Population summary of a world.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldStats {
    pub alive: usize,
    pub dead: usize,
    pub birthing: usize,
    pub dying: usize,
    /// Souls waiting in the bardo
    pub souls: usize,
    /// Karma extremes among living cells
    pub karma: Option<KarmaRange>,
    /// Living cells per caste band, lowest karma first
    pub castes: Vec<usize>,
}

/// A fixed square grid of cells plus the shared soul pool.
#[derive(Debug)]
pub struct World {
    bounds: GridBounds,
    cells: Vec<Cell>,
    bardo: Bardo,
    config: SimConfig,
}

impl World {
    /// Create a world large enough to cover `surface` with cells of
    /// `config.cell_size` pixels.
    pub fn for_surface<R: Rng + ?Sized>(surface: Surface, config: SimConfig, now: Millis, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let bounds = GridBounds::covering(surface.width, surface.height, config.cell_size)
            .ok_or_else(|| Error::InvalidSurface("cell size is zero".into()))?;
        if bounds.is_empty() {
            return Err(Error::InvalidSurface(format!(
                "{}x{} surface holds no cells",
                surface.width, surface.height
            )));
        }
        Ok(Self::populate(bounds, config, now, rng))
    }

    /// Create a `dimension × dimension` world with random initial states.
    pub fn with_dimension<R: Rng + ?Sized>(dimension: usize, config: SimConfig, now: Millis, rng: &mut R) -> Result<Self> {
        config.validate()?;
        if dimension == 0 {
            return Err(Error::InvalidSurface("grid dimension is zero".into()));
        }
        Ok(Self::populate(GridBounds::square(dimension), config, now, rng))
    }

    /// Create a world with explicit cells.
    ///
    /// `layout` gives the state and karma of every coordinate; all cells
    /// start their current state at `now`.
    pub fn from_layout<F>(dimension: usize, config: SimConfig, now: Millis, mut layout: F) -> Result<Self>
    where
        F: FnMut(GridCoord) -> (CellState, Karma),
    {
        config.validate()?;
        if dimension == 0 {
            return Err(Error::InvalidSurface("grid dimension is zero".into()));
        }
        let bounds = GridBounds::square(dimension);
        let cells = bounds
            .coords()
            .enumerate()
            .map(|(i, coord)| {
                let (state, karma) = layout(coord);
                Cell::new(CellId(i as u64), coord, state, karma, now)
            })
            .collect();

        Ok(Self {
            bounds,
            cells,
            bardo: Bardo::new(),
            config,
        })
    }

    /// Create a world from rows of characters.
    ///
    /// `#` alive, `.` dead, `+` birthing, `x` dying; every row must be as
    /// long as there are rows. All karma starts at zero.
    pub fn from_pattern(pattern: &str, config: SimConfig, now: Millis) -> Result<Self> {
        let rows: Vec<Vec<char>> = pattern
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().collect())
            .collect();

        let dimension = rows.len();
        let actual: usize = rows.iter().map(Vec::len).sum();
        if rows.iter().any(|row| row.len() != dimension) {
            return Err(Error::LayoutMismatch {
                expected: dimension * dimension,
                actual,
            });
        }

        let mut invalid = None;
        let world = Self::from_layout(dimension, config, now, |coord| {
            let state = match rows[coord.y][coord.x] {
                '#' => CellState::Alive,
                '+' => CellState::Birthing,
                'x' => CellState::Dying,
                '.' => CellState::Dead,
                other => {
                    invalid.get_or_insert(other);
                    CellState::Dead
                }
            };
            (state, 0)
        })?;

        match invalid {
            Some(glyph) => Err(Error::InvalidPattern(glyph)),
            None => Ok(world),
        }
    }

    fn populate<R: Rng + ?Sized>(bounds: GridBounds, config: SimConfig, now: Millis, rng: &mut R) -> Self {
        let cells = bounds
            .coords()
            .enumerate()
            .map(|(i, coord)| Cell::spawn(CellId(i as u64), coord, now, &config, rng))
            .collect();

        Self {
            bounds,
            cells,
            bardo: Bardo::new(),
            config,
        }
    }

    /// Replace the soul pool.
    pub fn with_bardo(mut self, bardo: Bardo) -> Self {
        self.bardo = bardo;
        self
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Side length in cells.
    pub fn dimension(&self) -> usize {
        self.bounds.dimension()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn bardo(&self) -> &Bardo {
        &self.bardo
    }

    /// All cells in storage order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at a grid position.
    pub fn cell(&self, coord: GridCoord) -> Option<&Cell> {
        self.bounds.index_of(coord).and_then(|i| self.cells.get(i))
    }

    /// The up-to-8 cells around `coord`, computed fresh on every call.
    pub fn neighbors(&self, coord: GridCoord) -> impl Iterator<Item = &Cell> + '_ {
        Neighbors::of(coord, self.bounds).filter_map(move |n| self.cell(n))
    }

    /// Count living and dead neighbors of `coord`.
    pub fn neighbor_tally(&self, coord: GridCoord) -> NeighborTally {
        self.neighbors(coord)
            .fold(NeighborTally::default(), |mut tally, cell| {
                match cell.state() {
                    CellState::Alive => tally.alive += 1,
                    CellState::Dead => tally.dead += 1,
                    CellState::Birthing | CellState::Dying => {}
                }
                tally.total += 1;
                tally
            })
    }

    /// Karma extremes over the living population, `None` if nobody lives.
    pub fn karma_range(&self) -> Option<KarmaRange> {
        KarmaRange::of(
            self.cells
                .iter()
                .filter(|cell| cell.state() == CellState::Alive)
                .map(Cell::karma),
        )
    }

    /// Copy of every cell, in storage order.
    pub fn snapshot(&self) -> Vec<CellSnapshot> {
        self.cells.iter().map(Cell::snapshot).collect()
    }

    /// Population summary.
    pub fn stats(&self) -> WorldStats {
        let snapshot = self.snapshot();
        let mut stats = WorldStats {
            souls: self.bardo.len(),
            karma: KarmaRange::of(
                snapshot
                    .iter()
                    .filter(|c| c.state == CellState::Alive)
                    .map(|c| c.karma),
            ),
            castes: vec![0; self.config.castes as usize],
            ..WorldStats::default()
        };

        for cell in &snapshot {
            match cell.state {
                CellState::Alive => {
                    stats.alive += 1;
                    if let Some(range) = stats.karma {
                        stats.castes[range.band(cell.karma, self.config.castes) as usize] += 1;
                    }
                }
                CellState::Dead => stats.dead += 1,
                CellState::Birthing => stats.birthing += 1,
                CellState::Dying => stats.dying += 1,
            }
        }
        stats
    }

    /// Side length of the drawn grid in pixels.
    pub fn pixel_extent(&self) -> f64 {
        self.dimension() as f64 * f64::from(self.config.cell_size)
    }

    /// Draw one frame: clear the surface, then every visible cell as it is
    /// right now.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R, now: Millis) {
        let extent = self.pixel_extent();
        renderer.clear(extent, extent);
        for cell in &self.cells {
            let sprite = cell.render(now, &self.config);
            if sprite.is_visible() {
                renderer.draw(&sprite);
            }
        }
        renderer.present();
    }
}
