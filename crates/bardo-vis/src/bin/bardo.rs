//! Bardo terminal front-end
//!
//! Run the simulation and draw it in the terminal, or print statistics.

use std::sync::Arc;
use std::time::Duration;

use bardo_sim::{Clock, SimConfig, Simulation, Surface, TokioClock, World};
use bardo_vis::{wait_for_stop, Args, AsciiCanvas, ShapeRenderer, StatsReporter, USAGE};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const REPORT_PERIOD: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never interleave with frames or stats
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bardo=info,bardo_sim=info,bardo_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = SimConfig::from_env()?;
    let cell_size = config.cell_size;
    let surface = Surface::new(args.width, args.height);

    let clock = Arc::new(TokioClock::new());
    let mut rng = config.rng(u64::MAX);
    let world = Arc::new(World::for_surface(surface, config, clock.now(), &mut rng)?);
    info!(
        width = surface.width,
        height = surface.height,
        dimension = world.dimension(),
        headless = args.headless,
        "world created"
    );

    let mut sim = Simulation::new(Arc::clone(&world), clock);
    let stop = wait_for_stop(tokio::signal::ctrl_c(), args.duration);
    tokio::pin!(stop);

    if args.headless {
        sim.start_cells();
        let mut reporter = StatsReporter::new(std::io::stdout());
        let mut ticker = tokio::time::interval(REPORT_PERIOD);
        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = ticker.tick() => reporter.report(&world)?,
            }
        }
        sim.shutdown().await;
        info!(reports = reporter.reports(), "headless run finished");
    } else {
        let columns = args.width.div_ceil(cell_size) as usize;
        let rows = args.height.div_ceil(cell_size) as usize;
        let canvas = AsciiCanvas::new(std::io::stdout(), columns, rows, f64::from(cell_size));
        let frames = sim.start(ShapeRenderer::new(canvas));

        stop.await;
        sim.shutdown().await;
        let renderer = frames.await?;
        info!(frames = renderer.canvas().frames(), "render loop finished");
    }

    Ok(())
}
