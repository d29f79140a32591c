//! Cell actors and their lifecycle.
//!
//! ```text
//!            < 2 or > 4 living neighbors
//!   alive ──────────────────────────────▶ dying
//!     ▲         (deposit soul)              │
//!     │ decay period elapsed                │ decay period elapsed
//!     │                                     ▼
//!  birthing ◀────────────────────────────── dead
//!        ≥ 2 living neighbors and a similar soul
//!              (adopt the soul's karma)
//! ```
//!
//! A cell's state and transition time share one atomic word, so a reader
//! never sees a new state paired with an old timestamp. Only the cell's own
//! update ever writes to it.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use bardo_grid::GridCoord;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::bardo::Soul;
use crate::clock::Millis;
use crate::config::SimConfig;
use crate::karma::Karma;
use crate::render::Sprite;
use crate::world::World;

/// Fewest living neighbors an alive cell survives with, and the fewest a
/// dead cell needs before it looks for a soul.
pub const MIN_LIVING_NEIGHBORS: usize = 2;

/// Most living neighbors an alive cell survives with.
pub const MAX_LIVING_NEIGHBORS: usize = 4;

/// Unique cell identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub u64);

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cell-{}", self.0)
    }
}

/// Lifecycle state of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum CellState {
    Dead = 0,
    Alive = 1,
    Birthing = 2,
    Dying = 3,
}

impl CellState {
    const MASK: u64 = 0b11;

    fn from_bits(bits: u64) -> Self {
        match bits & Self::MASK {
            0 => CellState::Dead,
            1 => CellState::Alive,
            2 => CellState::Birthing,
            _ => CellState::Dying,
        }
    }

    /// Whether `self → next` is an edge of the lifecycle.
    pub fn can_become(self, next: CellState) -> bool {
        matches!(
            (self, next),
            (CellState::Alive, CellState::Dying)
                | (CellState::Dying, CellState::Dead)
                | (CellState::Dead, CellState::Birthing)
                | (CellState::Birthing, CellState::Alive)
        )
    }

    /// Whether the state is timed (progresses over the decay period).
    pub fn is_transitional(self) -> bool {
        matches!(self, CellState::Birthing | CellState::Dying)
    }
}

impl std::fmt::Display for CellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CellState::Dead => "dead",
            CellState::Alive => "alive",
            CellState::Birthing => "birthing",
            CellState::Dying => "dying",
        };
        f.write_str(name)
    }
}

/// State and timestamp packed into one word: `time << 2 | state`.
fn pack(state: CellState, at: Millis) -> u64 {
    (at << 2) | state as u64
}

fn unpack(word: u64) -> (CellState, Millis) {
    (CellState::from_bits(word), word >> 2)
}

/// A state change that just happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: CellState,
    pub to: CellState,
    pub at: Millis,
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// The transition fired by this evaluation, if any
    pub transition: Option<Transition>,
    /// When the cell wants to be evaluated next
    pub next_wake: Duration,
}

/// Point-in-time copy of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub id: CellId,
    pub coord: GridCoord,
    pub state: CellState,
    pub karma: Karma,
    pub transition_time: Millis,
}

/// One grid cell.
#[derive(Debug)]
pub struct Cell {
    id: CellId,
    coord: GridCoord,
    karma: AtomicI64,
    phase: AtomicU64,
}

impl Cell {
    /// Create a cell in a known state.
    pub fn new(id: CellId, coord: GridCoord, state: CellState, karma: Karma, transition_time: Millis) -> Self {
        Self {
            id,
            coord,
            karma: AtomicI64::new(karma),
            phase: AtomicU64::new(pack(state, transition_time)),
        }
    }

    /// Create a cell with a random initial state and transition time.
    ///
    /// The state is picked by squaring a uniform draw, so sparse life is far
    /// more likely than dense life: the cell starts alive iff
    /// `u² ≥ (1 - p)²`, with `p` the configured alive probability.
    pub fn spawn<R: Rng + ?Sized>(id: CellId, coord: GridCoord, now: Millis, config: &SimConfig, rng: &mut R) -> Self {
        let draw: f64 = rng.gen();
        let dead_share = 1.0 - config.initial_alive_probability;
        let state = if draw * draw >= dead_share * dead_share {
            CellState::Alive
        } else {
            CellState::Dead
        };
        let offset = random_delay(rng, config.decay_period).as_millis() as Millis;
        Self::new(id, coord, state, 0, now.saturating_sub(offset))
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    pub fn karma(&self) -> Karma {
        self.karma.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> CellState {
        self.phase().0
    }

    /// Time of the most recent state change.
    pub fn transition_time(&self) -> Millis {
        self.phase().1
    }

    fn phase(&self) -> (CellState, Millis) {
        unpack(self.phase.load(Ordering::Acquire))
    }

    pub fn snapshot(&self) -> CellSnapshot {
        let (state, transition_time) = self.phase();
        CellSnapshot {
            id: self.id,
            coord: self.coord,
            state,
            karma: self.karma(),
            transition_time,
        }
    }

    /// Fraction of the decay period elapsed since the last transition,
    /// clamped to `0.0..=1.0`.
    pub fn progress(&self, now: Millis, decay_period: Duration) -> f64 {
        progress_since(self.transition_time(), now, decay_period)
    }

    /// Evaluate the neighborhood once and advance the state machine.
    ///
    /// Never blocks. The returned step says when to evaluate again: a random
    /// delay below the check period, or the transition's follow-up delay if
    /// that is sooner.
    pub fn update<R: Rng + ?Sized>(&self, world: &World, now: Millis, rng: &mut R) -> Step {
        let config = world.config();
        let (state, since) = self.phase();

        let fired = match state {
            CellState::Alive => self.live(world, now),
            CellState::Dead => self.seek_rebirth(world, now, rng),
            CellState::Birthing | CellState::Dying => {
                let elapsed = Duration::from_millis(now.saturating_sub(since));
                if elapsed >= config.decay_period {
                    let next = if state == CellState::Birthing {
                        CellState::Alive
                    } else {
                        CellState::Dead
                    };
                    Some((self.transition(state, next, now), random_delay(rng, config.check_period)))
                } else {
                    None
                }
            }
        };

        let recheck = random_delay(rng, config.check_period);
        match fired {
            Some((transition, follow_up)) => Step {
                transition: Some(transition),
                next_wake: recheck.min(follow_up),
            },
            None => Step {
                transition: None,
                next_wake: recheck,
            },
        }
    }

    /// Alive: accumulate karma, then die of loneliness or overcrowding.
    fn live(&self, world: &World, now: Millis) -> Option<(Transition, Duration)> {
        let tally = world.neighbor_tally(self.coord);
        let delta = tally.alive as Karma - tally.dead as Karma;
        let karma = self.karma.fetch_add(delta, Ordering::Relaxed) + delta;

        if (MIN_LIVING_NEIGHBORS..=MAX_LIVING_NEIGHBORS).contains(&tally.alive) {
            return None;
        }

        let transition = self.transition(CellState::Alive, CellState::Dying, now);
        world.bardo().deposit(Soul { id: self.id, karma });
        trace!(cell = %self.id, karma, living = tally.alive, "soul entered the bardo");
        Some((transition, world.config().decay_period))
    }

    /// Dead: with enough living neighbors, adopt the first similar soul.
    fn seek_rebirth<R: Rng + ?Sized>(&self, world: &World, now: Millis, rng: &mut R) -> Option<(Transition, Duration)> {
        let tally = world.neighbor_tally(self.coord);
        if tally.alive < MIN_LIVING_NEIGHBORS {
            return None;
        }

        let Some(range) = world.karma_range() else {
            trace!(cell = %self.id, "no living cells, skipping soul search");
            return None;
        };

        let config = world.config();
        let own = self.karma();
        let soul = world
            .bardo()
            .take_match(|soul| soul.id != self.id && range.admits(own, soul.karma, config.castes))?;

        self.karma.store(soul.karma, Ordering::Relaxed);
        trace!(cell = %self.id, from = %soul.id, karma = soul.karma, "soul reincarnated");
        let transition = self.transition(CellState::Dead, CellState::Birthing, now);
        Some((transition, random_delay(rng, config.check_period)))
    }

    fn transition(&self, from: CellState, to: CellState, now: Millis) -> Transition {
        debug_assert!(from.can_become(to), "illegal transition {from} -> {to}");
        self.phase.store(pack(to, now), Ordering::Release);
        debug!(cell = %self.id, coord = %self.coord, %from, %to, "transition");
        Transition { from, to, at: now }
    }

    /// Visual description of the cell at `now`.
    pub fn render(&self, now: Millis, config: &SimConfig) -> Sprite {
        let (state, since) = self.phase();
        let size = f64::from(config.cell_size);
        let (x, y) = self.coord.to_pixels(size);
        Sprite {
            state,
            progress: progress_since(since, now, config.decay_period),
            x,
            y,
            size,
        }
    }
}

fn progress_since(since: Millis, now: Millis, decay_period: Duration) -> f64 {
    let period = decay_period.as_millis() as f64;
    if period <= 0.0 {
        return 1.0;
    }
    (now.saturating_sub(since) as f64 / period).clamp(0.0, 1.0)
}

/// Uniform delay in `[0, period)`.
fn random_delay<R: Rng + ?Sized>(rng: &mut R, period: Duration) -> Duration {
    period.mul_f64(rng.gen::<f64>())
}
