//! Bardo Visualization
//!
//! Draws a running simulation and hosts the `bardo` terminal binary.
//!
//! # Architecture
//!
//! - **Shape**: circle/square morph outlines for birthing and dying cells
//! - **Canvas**: minimal fill-only drawing surface, plus [`ShapeRenderer`]
//!   which turns simulation sprites into canvas shapes
//! - **Ascii**: a canvas that shades terminal characters
//! - **Report**: newline-delimited JSON statistics for headless runs
//! - **Stop**: ends a run on Ctrl-C or after a fixed duration
//!
//! # Usage
//!
//! ```ignore
//! let canvas = AsciiCanvas::new(std::io::stdout(), 80, 24, 20.0);
//! let frames = sim.start(ShapeRenderer::new(canvas));
//! ```

mod ascii;
mod canvas;
mod cli;
mod error;
mod report;
mod shape;
mod stop;

pub use ascii::{AsciiCanvas, SHADES};
pub use canvas::{Canvas, DrawCommand, RecordingCanvas, ShapeRenderer};
pub use cli::{Args, DEFAULT_HEIGHT, DEFAULT_WIDTH, USAGE};
pub use error::{Error, Result};
pub use report::StatsReporter;
pub use shape::{birthing_outline, dying_outline, Point, OUTLINE_SEGMENTS};
pub use stop::{wait_for_stop, StopReason};
