//! Bardo Simulation
//!
//! A cellular automaton where every cell is an independent, self-scheduling
//! actor and dead cells are reborn with the karma of cells that died before
//! them.
//!
//! # Architecture
//!
//! - **Cell**: four-state lifecycle (alive, dying, dead, birthing) plus a
//!   karma accumulator, stored in atomics so it can be read at any moment
//! - **World**: fixed square grid of cells, 8-connected neighborhoods, and
//!   the shared soul pool
//! - **Bardo**: the soul pool; dying cells deposit, dead cells adopt the
//!   first soul within one caste band of their own karma
//! - **Runtime**: one tokio task per cell, each re-arming itself after a
//!   random delay, plus a render loop at a fixed frame cadence
//! - **EventQueue**: the same cells driven from a single time-ordered queue
//!   over virtual time, for reproducible runs
//!
//! # Usage
//!
//! ```ignore
//! let config = SimConfig::from_env()?;
//! let world = World::for_surface(Surface::new(1280, 720), config, 0, &mut rng)?;
//! let mut sim = Simulation::new(Arc::new(world), Arc::new(TokioClock::new()));
//! let frames = sim.start(renderer);
//! ```

mod bardo;
mod cell;
mod clock;
mod config;
mod error;
mod karma;
mod render;
mod runtime;
mod scheduler;
mod world;

pub use bardo::{Bardo, Soul};
pub use cell::{
    Cell, CellId, CellSnapshot, CellState, Step, Transition, MAX_LIVING_NEIGHBORS, MIN_LIVING_NEIGHBORS,
};
pub use clock::{Clock, ManualClock, Millis, TokioClock};
pub use config::SimConfig;
pub use error::{Error, Result};
pub use karma::{Karma, KarmaRange};
pub use render::{Renderer, Sprite};
pub use runtime::Simulation;
pub use scheduler::{Evaluation, EventQueue, RunSummary};
pub use world::{NeighborTally, Surface, World, WorldStats};
