//! Drawing surfaces and the sprite-to-shape renderer.

use bardo_sim::{CellState, Renderer, Sprite};

use crate::shape::{birthing_outline, dying_outline, Point};

/// A 2D surface that can fill rectangles and polygons in one color.
pub trait Canvas {
    /// Blank the whole surface.
    fn clear(&mut self, width: f64, height: f64);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, opacity: f64);

    /// Fill a closed outline.
    fn fill_polygon(&mut self, points: &[Point], opacity: f64);

    /// Show everything drawn since the last clear.
    fn present(&mut self) {}
}

/// Turns sprites into canvas shapes.
///
/// Alive cells are filled squares, birthing cells grow from a dot into their
/// square, and dying cells swell into a circle while fading out.
#[derive(Debug, Default)]
pub struct ShapeRenderer<C> {
    canvas: C,
}

impl<C: Canvas> ShapeRenderer<C> {
    pub fn new(canvas: C) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }
}

impl<C: Canvas> Renderer for ShapeRenderer<C> {
    fn clear(&mut self, width: f64, height: f64) {
        self.canvas.clear(width, height);
    }

    fn draw(&mut self, sprite: &Sprite) {
        let (cx, cy) = sprite.center();
        let center = Point::new(cx, cy);
        match sprite.state {
            CellState::Dead => {}
            CellState::Alive => {
                self.canvas
                    .fill_rect(sprite.x, sprite.y, sprite.size, sprite.size, sprite.opacity());
            }
            CellState::Birthing => {
                let outline = birthing_outline(center, sprite.size, sprite.progress);
                self.canvas.fill_polygon(&outline, sprite.opacity());
            }
            CellState::Dying => {
                let outline = dying_outline(center, sprite.size, sprite.progress);
                self.canvas.fill_polygon(&outline, sprite.opacity());
            }
        }
    }

    fn present(&mut self) {
        self.canvas.present();
    }
}

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f64, height: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64, opacity: f64 },
    Polygon { points: Vec<Point>, opacity: f64 },
    Present,
}

/// Canvas that remembers every call instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of presented frames.
    pub fn frames(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Present))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, opacity: f64) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            opacity,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], opacity: f64) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            opacity,
        });
    }

    fn present(&mut self) {
        self.commands.push(DrawCommand::Present);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::OUTLINE_SEGMENTS;
    use bardo_sim::{SimConfig, World};

    fn sprite(state: CellState, progress: f64) -> Sprite {
        Sprite {
            state,
            progress,
            x: 40.0,
            y: 20.0,
            size: 20.0,
        }
    }

    fn draw(sprite: Sprite) -> Vec<DrawCommand> {
        let mut renderer = ShapeRenderer::new(RecordingCanvas::new());
        renderer.draw(&sprite);
        renderer.into_canvas().commands
    }

    #[test]
    fn alive_is_an_opaque_square() {
        assert_eq!(
            draw(sprite(CellState::Alive, 0.7)),
            vec![DrawCommand::Rect {
                x: 40.0,
                y: 20.0,
                width: 20.0,
                height: 20.0,
                opacity: 1.0
            }]
        );
    }

    #[test]
    fn dead_draws_nothing() {
        assert!(draw(sprite(CellState::Dead, 0.5)).is_empty());
    }

    #[test]
    fn birthing_is_an_opaque_outline() {
        let commands = draw(sprite(CellState::Birthing, 0.25));
        let [DrawCommand::Polygon { points, opacity }] = commands.as_slice() else {
            panic!("expected one polygon, got {commands:?}");
        };
        assert_eq!(*opacity, 1.0);
        assert_eq!(points.len(), OUTLINE_SEGMENTS + 1);
        assert_eq!(*points, birthing_outline(Point::new(50.0, 30.0), 20.0, 0.25));
    }

    #[test]
    fn dying_fades_with_progress() {
        let commands = draw(sprite(CellState::Dying, 0.75));
        let [DrawCommand::Polygon { opacity, .. }] = commands.as_slice() else {
            panic!("expected one polygon, got {commands:?}");
        };
        assert!((opacity - 0.25).abs() < 1e-12);
    }

    #[test]
    fn world_frames_are_bracketed() {
        let world = World::from_pattern("#.\n.+", SimConfig::default(), 0).unwrap();
        let mut renderer = ShapeRenderer::new(RecordingCanvas::new());

        world.render(&mut renderer, 100);
        world.render(&mut renderer, 200);

        let canvas = renderer.into_canvas();
        assert_eq!(canvas.frames(), 2);
        assert_eq!(
            canvas.commands.first(),
            Some(&DrawCommand::Clear {
                width: 40.0,
                height: 40.0
            })
        );
        // clear, square, outline, present
        assert_eq!(canvas.commands.len(), 8);
        assert_eq!(canvas.commands.last(), Some(&DrawCommand::Present));
    }
}
