//! The soul pool.
//!
//! Dying cells leave their karma here; dead cells with enough living
//! neighbors pull a similar soul back out. The pool is the only state that
//! more than one cell mutates, so every read-modify-write happens under a
//! single lock.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::cell::CellId;
use crate::karma::Karma;

/// Karma left behind by a cell that died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Soul {
    /// The cell the soul came from
    pub id: CellId,
    /// Karma at the moment of death
    pub karma: Karma,
}

/// Shared pool of souls awaiting reincarnation, kept in arrival order.
#[derive(Debug, Default)]
pub struct Bardo {
    souls: Mutex<Vec<Soul>>,
}

impl Bardo {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool already holding `souls`, in order.
    pub fn with_souls<I>(souls: I) -> Self
    where
        I: IntoIterator<Item = Soul>,
    {
        Self {
            souls: Mutex::new(souls.into_iter().collect()),
        }
    }

    /// Add a soul at the back of the pool.
    pub fn deposit(&self, soul: Soul) {
        self.souls.lock().push(soul);
    }

    /// Remove and return the first soul accepted by `accepts`.
    ///
    /// Search and removal happen under one lock, so two cells racing for the
    /// same soul cannot both get it.
    pub fn take_match<F>(&self, accepts: F) -> Option<Soul>
    where
        F: Fn(&Soul) -> bool,
    {
        let mut souls = self.souls.lock();
        let index = souls.iter().position(accepts)?;
        Some(souls.remove(index))
    }

    /// Number of souls waiting.
    pub fn len(&self) -> usize {
        self.souls.lock().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.souls.lock().is_empty()
    }

    /// Copy of the current contents, in order.
    pub fn souls(&self) -> Vec<Soul> {
        self.souls.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn soul(id: u64, karma: Karma) -> Soul {
        Soul {
            id: CellId(id),
            karma,
        }
    }

    #[test]
    fn deposit_keeps_arrival_order() {
        let bardo = Bardo::new();
        bardo.deposit(soul(1, 10));
        bardo.deposit(soul(2, 20));
        bardo.deposit(soul(3, 30));

        let ids: Vec<_> = bardo.souls().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![CellId(1), CellId(2), CellId(3)]);
    }

    #[test]
    fn take_match_returns_first_match() {
        let bardo = Bardo::with_souls([soul(1, 10), soul(2, 11), soul(3, 12)]);

        let taken = bardo.take_match(|s| s.karma > 10).unwrap();
        assert_eq!(taken, soul(2, 11));
        assert_eq!(bardo.souls(), vec![soul(1, 10), soul(3, 12)]);
    }

    #[test]
    fn take_match_on_empty_pool() {
        let bardo = Bardo::new();
        assert!(bardo.take_match(|_| true).is_none());
        assert!(bardo.is_empty());
    }

    #[test]
    fn no_match_leaves_pool_untouched() {
        let bardo = Bardo::with_souls([soul(1, 10)]);
        assert!(bardo.take_match(|s| s.karma < 0).is_none());
        assert_eq!(bardo.len(), 1);
        assert_eq!(bardo.souls(), vec![soul(1, 10)]);
    }

    #[test]
    fn concurrent_adoption_takes_each_soul_once() {
        const SOULS: u64 = 64;
        const TAKERS: usize = 16;

        let bardo = Bardo::with_souls((0..SOULS).map(|i| soul(i, i as Karma)));
        let taken = AtomicUsize::new(0);
        let seen = Mutex::new(Vec::new());

        std::thread::scope(|scope| {
            for _ in 0..TAKERS {
                scope.spawn(|| {
                    // Everyone races for the even souls.
                    while let Some(s) = bardo.take_match(|s| s.karma % 2 == 0) {
                        taken.fetch_add(1, Ordering::Relaxed);
                        seen.lock().push(s.id);
                    }
                });
            }
        });

        let mut seen = seen.into_inner();
        let adopted = taken.load(Ordering::Relaxed);
        seen.sort();
        seen.dedup();

        assert_eq!(adopted, (SOULS / 2) as usize);
        assert_eq!(seen.len(), adopted, "a soul was adopted twice");
        assert_eq!(bardo.len(), SOULS as usize - adopted);
        assert!(bardo.souls().iter().all(|s| s.karma % 2 == 1));
    }
}
