//! When a run ends.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

/// What ended a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Interrupted,
    Elapsed,
}

/// Wait until `interrupt` fires or `duration` has passed, whichever comes
/// first. Without a duration only the interrupt ends the wait. An interrupt
/// source that fails is logged and the wait falls back to the duration.
pub async fn wait_for_stop<F>(interrupt: F, duration: Option<Duration>) -> StopReason
where
    F: Future<Output = std::io::Result<()>>,
{
    let deadline = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let interrupt_failed = tokio::select! {
        result = interrupt => match result {
            Ok(()) => {
                info!("interrupted");
                return StopReason::Interrupted;
            }
            Err(error) => {
                warn!(%error, "cannot listen for interrupts, waiting for the run time");
                true
            }
        },
        _ = &mut deadline => false,
    };
    if interrupt_failed {
        deadline.await;
    }

    info!("run time elapsed");
    StopReason::Elapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn interrupt_ends_an_unbounded_run() {
        let start = Instant::now();
        let reason = wait_for_stop(async { Ok(()) }, None).await;
        assert_eq!(reason, StopReason::Interrupted);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn duration_ends_a_quiet_run() {
        let start = Instant::now();
        let reason = wait_for_stop(std::future::pending(), Some(Duration::from_secs(3))).await;
        assert_eq!(reason, StopReason::Elapsed);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_interrupt_keeps_waiting_for_the_duration() {
        let start = Instant::now();
        let failing = async { Err(std::io::Error::other("no signal handler")) };
        let reason = wait_for_stop(failing, Some(Duration::from_secs(5))).await;
        assert_eq!(reason, StopReason::Elapsed);
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }
}
