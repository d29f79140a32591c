//! Headless statistics output.

use std::io::Write;

use bardo_sim::World;
use tracing::debug;

use crate::error::Result;

/// Writes one JSON object per report, newline-delimited.
pub struct StatsReporter<W> {
    out: W,
    reports: u64,
}

impl<W: Write> StatsReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, reports: 0 }
    }

    pub fn reports(&self) -> u64 {
        self.reports
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write the world's current statistics as one line.
    pub fn report(&mut self, world: &World) -> Result<()> {
        let stats = world.stats();
        serde_json::to_writer(&mut self.out, &stats)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;

        self.reports += 1;
        debug!(
            alive = stats.alive,
            souls = stats.souls,
            report = self.reports,
            "stats reported"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use bardo_sim::{SimConfig, WorldStats};

    #[test]
    fn one_line_per_report() {
        let world = World::from_pattern("#.\n+x", SimConfig::default(), 0).unwrap();
        let mut reporter = StatsReporter::new(Vec::new());

        reporter.report(&world).unwrap();
        reporter.report(&world).unwrap();
        assert_eq!(reporter.reports(), 2);

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<WorldStats> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], world.stats());
        assert_eq!(
            (lines[0].alive, lines[0].dead, lines[0].birthing, lines[0].dying),
            (1, 1, 1, 1)
        );
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn closed_output_is_an_error() {
        let world = World::from_pattern("#.\n..", SimConfig::default(), 0).unwrap();
        let mut reporter = StatsReporter::new(Closed);

        let result = reporter.report(&world);
        // serde_json wraps writer failures in its own error type
        assert!(matches!(result, Err(Error::Json(_) | Error::Io(_))), "{result:?}");
        assert_eq!(reporter.reports(), 0);
    }
}
