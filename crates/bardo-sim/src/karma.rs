//! Karma normalization.
//!
//! The spread of karma across the living population is split into a fixed
//! number of equal caste bands. Two karma values are "similar" when they are
//! closer than one band width.

use serde::{Deserialize, Serialize};

/// Karma accumulated by a cell.
pub type Karma = i64;

/// Extremes of karma over a non-empty set of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KarmaRange {
    pub min: Karma,
    pub max: Karma,
}

impl KarmaRange {
    /// Range of a single value.
    pub const fn point(karma: Karma) -> Self {
        Self {
            min: karma,
            max: karma,
        }
    }

    /// Range over an iterator, `None` when it is empty.
    pub fn of<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Karma>,
    {
        values.into_iter().fold(None, |range, karma| {
            Some(match range {
                None => Self::point(karma),
                Some(range) => range.including(karma),
            })
        })
    }

    /// Widen the range to include `karma`.
    pub fn including(self, karma: Karma) -> Self {
        Self {
            min: self.min.min(karma),
            max: self.max.max(karma),
        }
    }

    /// `max - min`.
    pub fn span(&self) -> u128 {
        (self.max as i128 - self.min as i128) as u128
    }

    /// Whether `a` and `b` differ by strictly less than one caste band,
    /// `span / castes`.
    ///
    /// Compared as `|a - b| * castes < span` so no precision is lost; a zero
    /// span admits nothing.
    pub fn admits(&self, a: Karma, b: Karma, castes: u32) -> bool {
        let distance = (a as i128 - b as i128).unsigned_abs();
        distance * u128::from(castes) < self.span()
    }

    /// Caste band of `karma`, `0..castes`, clamped for values outside the range.
    pub fn band(&self, karma: Karma, castes: u32) -> u32 {
        let span = self.span();
        if span == 0 || castes == 0 {
            return 0;
        }
        let clamped = karma.clamp(self.min, self.max);
        let offset = (clamped as i128 - self.min as i128) as u128;
        let band = offset * u128::from(castes) / span;
        (band as u32).min(castes - 1)
    }
}
