//! Deterministic scheduler over virtual time.
//!
//! Every cell has exactly one pending wake-up in a time-ordered queue. Popping
//! the earliest wake-up moves a [`ManualClock`] to its due time, runs the
//! cell's update, and queues the wake-up the update asked for. Ties are
//! broken by insertion order, so a seeded run always replays identically.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::warn;

use crate::cell::{CellId, Step, Transition};
use crate::clock::{Clock, ManualClock, Millis};
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Wake {
    due: Millis,
    sequence: u64,
    index: usize,
}

/// One cell evaluation performed by the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub cell: CellId,
    pub at: Millis,
    pub step: Step,
}

/// What happened during [`EventQueue::run_until`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub evaluations: u64,
    pub transitions: Vec<(CellId, Transition)>,
}

/// Single-threaded driver for a [`World`].
#[derive(Debug)]
pub struct EventQueue {
    clock: Arc<ManualClock>,
    rng: SmallRng,
    pending: BinaryHeap<Reverse<Wake>>,
    sequence: u64,
    started: bool,
}

impl EventQueue {
    pub fn new(clock: Arc<ManualClock>, rng: SmallRng) -> Self {
        Self {
            clock,
            rng,
            pending: BinaryHeap::new(),
            sequence: 0,
            started: false,
        }
    }

    /// Queue one immediate evaluation of every cell, in random order.
    /// Calling this twice has no effect.
    pub fn start(&mut self, world: &World) {
        if self.started {
            return;
        }
        self.started = true;

        let now = self.clock.now();
        let mut order: Vec<usize> = (0..world.cells().len()).collect();
        order.shuffle(&mut self.rng);
        for index in order {
            self.schedule(now, index);
        }
    }

    /// Queue an evaluation of a single cell. Only `start` and `step` queue
    /// wake-ups, which keeps each cell at one pending wake-up.
    fn schedule(&mut self, due: Millis, index: usize) {
        self.pending.push(Reverse(Wake {
            due,
            sequence: self.sequence,
            index,
        }));
        self.sequence += 1;
    }

    /// Current virtual time.
    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    /// Number of queued wake-ups.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Due time of the earliest wake-up.
    pub fn next_due(&self) -> Option<Millis> {
        self.pending.peek().map(|Reverse(wake)| wake.due)
    }

    /// Run the earliest wake-up.
    pub fn step(&mut self, world: &World) -> Option<Evaluation> {
        let Reverse(wake) = self.pending.pop()?;
        let Some(cell) = world.cells().get(wake.index) else {
            warn!(
                index = wake.index,
                cells = world.cells().len(),
                "wake-up for a cell outside this world dropped"
            );
            return None;
        };

        self.clock.set(wake.due);
        let step = cell.update(world, wake.due, &mut self.rng);

        // Whole milliseconds, at least one, so virtual time always advances.
        let delay = (step.next_wake.as_millis() as Millis).max(1);
        self.schedule(wake.due + delay, wake.index);

        Some(Evaluation {
            cell: cell.id(),
            at: wake.due,
            step,
        })
    }

    /// Run every wake-up due at or before `until`, then move the clock there.
    pub fn run_until(&mut self, world: &World, until: Millis) -> RunSummary {
        let mut summary = RunSummary::default();
        while self.next_due().is_some_and(|due| due <= until) {
            let Some(evaluation) = self.step(world) else {
                break;
            };
            summary.evaluations += 1;
            if let Some(transition) = evaluation.step.transition {
                summary.transitions.push((evaluation.cell, transition));
            }
        }
        self.clock.set(until);
        summary
    }
}
