//! Rendering contract.
//!
//! The simulation does not draw anything itself. Each frame it hands every
//! visible cell to a [`Renderer`] as a [`Sprite`]: the cell's state, how far
//! through its current transition it is, and where it sits on the surface.

use serde::{Deserialize, Serialize};

use crate::cell::CellState;

/// Everything a renderer needs to draw one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub state: CellState,
    /// Elapsed fraction of the decay period, `0.0..=1.0`
    pub progress: f64,
    /// Left edge in pixels
    pub x: f64,
    /// Top edge in pixels
    pub y: f64,
    /// Side length in pixels
    pub size: f64,
}

impl Sprite {
    /// Dead cells draw nothing.
    pub fn is_visible(&self) -> bool {
        self.state != CellState::Dead
    }

    /// Opacity the cell should be drawn with.
    ///
    /// Dying cells fade out over the decay period; everything else that is
    /// drawn is opaque.
    pub fn opacity(&self) -> f64 {
        match self.state {
            CellState::Dead => 0.0,
            CellState::Alive | CellState::Birthing => 1.0,
            CellState::Dying => 1.0 - self.progress,
        }
    }

    /// Center of the cell in pixels.
    pub fn center(&self) -> (f64, f64) {
        let half = self.size / 2.0;
        (self.x + half, self.y + half)
    }
}

/// Sink for rendered frames.
pub trait Renderer {
    /// Erase the whole surface.
    fn clear(&mut self, width: f64, height: f64);

    /// Draw one visible cell.
    fn draw(&mut self, sprite: &Sprite);

    /// Called once all cells of a frame were drawn.
    fn present(&mut self) {}
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn clear(&mut self, width: f64, height: f64) {
        (**self).clear(width, height);
    }

    fn draw(&mut self, sprite: &Sprite) {
        (**self).draw(sprite);
    }

    fn present(&mut self) {
        (**self).present();
    }
}
