//! Live runtime: one tokio task per cell plus a render loop.
//!
//! A cell task evaluates its cell, sleeps for whatever delay the evaluation
//! asked for, and repeats until shutdown. The render loop ticks at the frame
//! period and only ever reads cell atomics, so it never waits on a cell.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::render::Renderer;
use crate::world::World;

/// A running simulation.
pub struct Simulation<C: Clock> {
    world: Arc<World>,
    clock: Arc<C>,
    shutdown: watch::Sender<bool>,
    cells: JoinSet<()>,
    started: bool,
}

impl<C: Clock> Simulation<C> {
    /// Prepare a simulation; nothing runs until [`start_cells`](Self::start_cells).
    pub fn new(world: Arc<World>, clock: Arc<C>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            world,
            clock,
            shutdown,
            cells: JoinSet::new(),
            started: false,
        }
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    pub fn clock(&self) -> &Arc<C> {
        &self.clock
    }

    /// Spawn one self-scheduling task per cell. Each runs its first update
    /// straight away. Calling this twice has no effect.
    pub fn start_cells(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        let config = self.world.config();
        for index in 0..self.world.cells().len() {
            let world = Arc::clone(&self.world);
            let clock = Arc::clone(&self.clock);
            let rng = config.rng(index as u64);
            let shutdown = self.shutdown.subscribe();
            self.cells.spawn(async move {
                run_cell(world, clock, index, rng, shutdown).await;
            });
        }

        info!(
            cells = self.world.cells().len(),
            dimension = self.world.dimension(),
            "simulation started"
        );
    }

    /// Spawn the render loop. The renderer is handed back when the loop
    /// stops.
    pub fn spawn_render_loop<R>(&self, renderer: R) -> JoinHandle<R>
    where
        R: Renderer + Send + 'static,
    {
        let world = Arc::clone(&self.world);
        let clock = Arc::clone(&self.clock);
        let period = world.config().frame_period;
        let shutdown = self.shutdown.subscribe();
        tokio::spawn(run_render_loop(world, clock, renderer, period, shutdown))
    }

    /// Start every cell and the render loop.
    pub fn start<R>(&mut self, renderer: R) -> JoinHandle<R>
    where
        R: Renderer + Send + 'static,
    {
        self.start_cells();
        self.spawn_render_loop(renderer)
    }

    /// Signal every task to stop at its next scheduling point and wait for
    /// the cell tasks to finish.
    pub async fn shutdown(mut self) {
        // send_replace never fails, even with every receiver gone.
        self.shutdown.send_replace(true);
        while self.cells.join_next().await.is_some() {}
        info!("simulation stopped");
    }
}

async fn run_cell<C: Clock, R: rand::Rng>(
    world: Arc<World>,
    clock: Arc<C>,
    index: usize,
    mut rng: R,
    mut shutdown: watch::Receiver<bool>,
) {
    let Some(cell) = world.cells().get(index) else {
        return;
    };

    loop {
        if *shutdown.borrow() {
            return;
        }

        let step = cell.update(&world, clock.now(), &mut rng);

        tokio::select! {
            _ = tokio::time::sleep(step.next_wake) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    debug!(cell = %cell.id(), "cell task stopping");
                    return;
                }
            }
        }
    }
}

async fn run_render_loop<C: Clock, R: Renderer>(
    world: Arc<World>,
    clock: Arc<C>,
    mut renderer: R,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> R {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                world.render(&mut renderer, clock.now());
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    debug!("render loop stopped");
    renderer
}
