//! Simulation configuration.
//!
//! The default periods are primes so that the decay and re-check cadences
//! never line up.

use std::str::FromStr;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::error::{Error, Result};

/// Time a birthing or dying cell spends in transition.
pub const DEFAULT_DECAY_PERIOD: Duration = Duration::from_millis(1_019);

/// Upper bound of the random delay between two evaluations of a cell.
pub const DEFAULT_CHECK_PERIOD: Duration = Duration::from_millis(307);

/// Number of similarity bands the living karma range is split into.
pub const DEFAULT_CASTES: u32 = 4;

/// Pixel size of a cell on the drawing surface.
pub const DEFAULT_CELL_SIZE: u32 = 20;

/// Probability that a freshly constructed cell starts alive.
pub const DEFAULT_ALIVE_PROBABILITY: f64 = 0.125;

/// Render cadence (roughly one display refresh).
pub const DEFAULT_FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Configuration for a simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Pixel size of one cell
    pub cell_size: u32,

    /// Duration of the birthing and dying transitions
    pub decay_period: Duration,

    /// Upper bound of the jitter between two evaluations of the same cell
    pub check_period: Duration,

    /// Number of karma similarity bands
    pub castes: u32,

    /// Probability that a cell starts alive
    pub initial_alive_probability: f64,

    /// Delay between two rendered frames
    pub frame_period: Duration,

    /// Seed for the per-cell random sources (entropy when absent)
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            decay_period: DEFAULT_DECAY_PERIOD,
            check_period: DEFAULT_CHECK_PERIOD,
            castes: DEFAULT_CASTES,
            initial_alive_probability: DEFAULT_ALIVE_PROBABILITY,
            frame_period: DEFAULT_FRAME_PERIOD,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Create config from `BARDO_*` environment variables with defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    ///
    /// Recognized keys: `BARDO_CELL_SIZE`, `BARDO_DECAY_MS`, `BARDO_CHECK_MS`,
    /// `BARDO_CASTES`, `BARDO_ALIVE_PROBABILITY`, `BARDO_FRAME_MS`,
    /// `BARDO_SEED`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            cell_size: parse(&lookup, "BARDO_CELL_SIZE")?.unwrap_or(defaults.cell_size),
            decay_period: parse(&lookup, "BARDO_DECAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.decay_period),
            check_period: parse(&lookup, "BARDO_CHECK_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.check_period),
            castes: parse(&lookup, "BARDO_CASTES")?.unwrap_or(defaults.castes),
            initial_alive_probability: parse(&lookup, "BARDO_ALIVE_PROBABILITY")?
                .unwrap_or(defaults.initial_alive_probability),
            frame_period: parse(&lookup, "BARDO_FRAME_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.frame_period),
            seed: parse(&lookup, "BARDO_SEED")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(invalid("cell_size", self.cell_size, "must be positive"));
        }
        if self.castes == 0 {
            return Err(invalid("castes", self.castes, "must be positive"));
        }
        if self.decay_period.is_zero() {
            return Err(invalid("decay_period", self.decay_period.as_millis(), "must be positive"));
        }
        if self.check_period.is_zero() {
            return Err(invalid("check_period", self.check_period.as_millis(), "must be positive"));
        }
        if self.frame_period.is_zero() {
            return Err(invalid("frame_period", self.frame_period.as_millis(), "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.initial_alive_probability) {
            return Err(invalid(
                "initial_alive_probability",
                self.initial_alive_probability,
                "must be within 0..=1",
            ));
        }
        Ok(())
    }

    /// Random source for one actor.
    ///
    /// With a seed, every stream is distinct but reproducible; without one
    /// each call draws fresh entropy.
    pub fn rng(&self, stream: u64) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            None => SmallRng::from_entropy(),
        }
    }
}

fn parse<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidConfig {
                key,
                value: raw,
                reason: "not a number",
            }),
    }
}

fn invalid(key: &'static str, value: impl ToString, reason: &'static str) -> Error {
    Error::InvalidConfig {
        key,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_use_prime_periods() {
        let config = SimConfig::default();
        assert_eq!(config.decay_period, Duration::from_millis(1_019));
        assert_eq!(config.check_period, Duration::from_millis(307));
        assert_eq!(config.castes, 4);
        assert_eq!(config.cell_size, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_lookup_yields_defaults() {
        let config = SimConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn lookup_overrides() {
        let config = SimConfig::from_lookup(lookup(&[
            ("BARDO_CELL_SIZE", "10"),
            ("BARDO_DECAY_MS", "500"),
            ("BARDO_CHECK_MS", " 100 "),
            ("BARDO_CASTES", "8"),
            ("BARDO_SEED", "7"),
        ]))
        .unwrap();

        assert_eq!(config.cell_size, 10);
        assert_eq!(config.decay_period, Duration::from_millis(500));
        assert_eq!(config.check_period, Duration::from_millis(100));
        assert_eq!(config.castes, 8);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn unparsable_value_is_rejected() {
        let err = SimConfig::from_lookup(lookup(&[("BARDO_DECAY_MS", "soon")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { key: "BARDO_DECAY_MS", .. }));
    }

    #[test]
    fn zero_castes_is_rejected() {
        let err = SimConfig::from_lookup(lookup(&[("BARDO_CASTES", "0")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { key: "castes", .. }));
    }

    #[test]
    fn probability_out_of_range_is_rejected() {
        let config = SimConfig {
            initial_alive_probability: 1.5,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn seeded_streams_are_reproducible_and_distinct() {
        use rand::Rng;

        let config = SimConfig {
            seed: Some(42),
            ..SimConfig::default()
        };
        let a: u64 = config.rng(1).gen();
        let b: u64 = config.rng(1).gen();
        let c: u64 = config.rng(2).gen();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
