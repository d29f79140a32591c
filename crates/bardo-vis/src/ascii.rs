//! Character-cell canvas for terminals.
//!
//! Each character covers a fixed square of surface pixels and is shaded by
//! the most opaque shape covering its center.

use std::io::Write;

use tracing::warn;

use crate::canvas::Canvas;
use crate::shape::Point;

/// Glyphs from empty to fully opaque.
pub const SHADES: &[u8] = b" .:-=+*#%@";

const HOME: &str = "\x1b[H";
const ERASE: &str = "\x1b[2J";

/// Canvas drawing into a `columns` × `rows` block of characters.
pub struct AsciiCanvas<W> {
    out: W,
    columns: usize,
    rows: usize,
    /// Surface pixels per character, in both directions
    scale: f64,
    coverage: Vec<f64>,
    frames: u64,
    erased: bool,
    failed: bool,
}

impl<W: Write> AsciiCanvas<W> {
    pub fn new(out: W, columns: usize, rows: usize, scale: f64) -> Self {
        Self {
            out,
            columns,
            rows,
            scale: scale.max(f64::MIN_POSITIVE),
            coverage: vec![0.0; columns * rows],
            frames: 0,
            erased: false,
            failed: false,
        }
    }

    /// Frames written so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// The current frame as text, one line per row.
    pub fn frame(&self) -> String {
        let mut text = String::with_capacity((self.columns + 1) * self.rows);
        for row in self.coverage.chunks(self.columns.max(1)).take(self.rows) {
            text.extend(row.iter().map(|&opacity| shade(opacity)));
            text.push('\n');
        }
        text
    }

    /// Surface position of the center of a character.
    fn sample_point(&self, column: usize, row: usize) -> Point {
        Point::new(
            (column as f64 + 0.5) * self.scale,
            (row as f64 + 0.5) * self.scale,
        )
    }

    /// Characters whose centers can fall inside `[min, max]` along one axis.
    fn span(&self, min: f64, max: f64, limit: usize) -> std::ops::Range<usize> {
        let first = (min / self.scale - 0.5).ceil().max(0.0) as usize;
        let last = ((max / self.scale - 0.5).floor() + 1.0).clamp(0.0, limit as f64) as usize;
        first.min(last)..last
    }

    fn cover(&mut self, column: usize, row: usize, opacity: f64) {
        let slot = &mut self.coverage[row * self.columns + column];
        *slot = slot.max(opacity.clamp(0.0, 1.0));
    }

    fn write_frame(&mut self) -> std::io::Result<()> {
        let mut text = String::new();
        if !self.erased {
            text.push_str(ERASE);
            self.erased = true;
        }
        text.push_str(HOME);
        text.push_str(&self.frame());
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> Canvas for AsciiCanvas<W> {
    fn clear(&mut self, _width: f64, _height: f64) {
        self.coverage.fill(0.0);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, opacity: f64) {
        for row in self.span(y, y + height, self.rows) {
            for column in self.span(x, x + width, self.columns) {
                let p = self.sample_point(column, row);
                if p.x >= x && p.x < x + width && p.y >= y && p.y < y + height {
                    self.cover(column, row, opacity);
                }
            }
        }
    }

    fn fill_polygon(&mut self, points: &[Point], opacity: f64) {
        let Some(first) = points.first() else {
            return;
        };
        let (mut min, mut max) = (*first, *first);
        for p in points {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }

        for row in self.span(min.y, max.y, self.rows) {
            for column in self.span(min.x, max.x, self.columns) {
                if contains(points, self.sample_point(column, row)) {
                    self.cover(column, row, opacity);
                }
            }
        }
    }

    fn present(&mut self) {
        self.frames += 1;
        if self.failed {
            return;
        }
        if let Err(error) = self.write_frame() {
            // Later frames are still counted, just not written.
            warn!(%error, "terminal write failed, no further frames will be drawn");
            self.failed = true;
        }
    }
}

fn shade(opacity: f64) -> char {
    let top = SHADES.len() - 1;
    let index = (opacity.clamp(0.0, 1.0) * top as f64).round() as usize;
    char::from(SHADES[index.min(top)])
}

/// Even-odd point-in-polygon test.
fn contains(polygon: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for (i, a) in polygon.iter().enumerate() {
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::ShapeRenderer;
    use crate::shape::{birthing_outline, dying_outline};
    use bardo_sim::{SimConfig, World};

    fn canvas(columns: usize, rows: usize) -> AsciiCanvas<Vec<u8>> {
        AsciiCanvas::new(Vec::new(), columns, rows, 10.0)
    }

    #[test]
    fn shades_cover_the_ramp() {
        assert_eq!(shade(0.0), ' ');
        assert_eq!(shade(1.0), '@');
        assert_eq!(shade(2.0), '@');
        assert_eq!(shade(-1.0), ' ');
    }

    #[test]
    fn rect_covers_character_centers() {
        let mut canvas = canvas(4, 2);
        canvas.fill_rect(10.0, 0.0, 20.0, 10.0, 1.0);
        assert_eq!(canvas.frame(), " @@ \n    \n");
    }

    #[test]
    fn shapes_outside_are_clipped() {
        let mut canvas = canvas(2, 2);
        canvas.fill_rect(-50.0, -50.0, 500.0, 500.0, 1.0);
        canvas.fill_rect(100.0, 100.0, 10.0, 10.0, 1.0);
        assert_eq!(canvas.frame(), "@@\n@@\n");
    }

    #[test]
    fn polygon_membership() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(contains(&square, Point::new(5.0, 5.0)));
        assert!(!contains(&square, Point::new(15.0, 5.0)));
        assert!(!contains(&[], Point::new(0.0, 0.0)));
    }

    #[test]
    fn wide_dying_circle_spills_into_neighbors() {
        let mut canvas = canvas(3, 3);
        canvas.fill_polygon(&dying_outline(Point::new(15.0, 15.0), 12.0, 1.0), 0.5);
        // Radius 12 around the middle character reaches the edge centers but
        // not the corners.
        assert_eq!(canvas.frame(), " + \n+++\n + \n");
    }

    #[test]
    fn newborn_dot_covers_nothing() {
        let mut canvas = canvas(3, 3);
        canvas.fill_polygon(&birthing_outline(Point::new(15.0, 15.0), 10.0, 0.0), 1.0);
        assert_eq!(canvas.frame(), "   \n   \n   \n");
    }

    #[test]
    fn present_writes_home_then_frame() {
        let config = SimConfig {
            cell_size: 10,
            ..SimConfig::default()
        };
        let world = World::from_pattern("#.\n.#", config, 0).unwrap();
        let mut renderer = ShapeRenderer::new(canvas(2, 2));

        world.render(&mut renderer, 0);
        world.render(&mut renderer, 16);

        let canvas = renderer.into_canvas();
        assert_eq!(canvas.frames(), 2);
        let out = String::from_utf8(canvas.into_inner()).unwrap();
        assert_eq!(out, format!("{ERASE}{HOME}@ \n @\n{HOME}@ \n @\n"));
    }

    #[test]
    fn clear_erases_previous_frame() {
        let mut canvas = canvas(1, 1);
        canvas.fill_rect(0.0, 0.0, 10.0, 10.0, 1.0);
        canvas.clear(10.0, 10.0);
        assert_eq!(canvas.frame(), " \n");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_do_not_stop_frames() {
        let mut canvas = AsciiCanvas::new(Broken, 1, 1, 10.0);
        canvas.present();
        canvas.present();
        assert_eq!(canvas.frames(), 2);
        assert!(canvas.failed);
    }
}
