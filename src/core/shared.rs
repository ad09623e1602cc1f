use crate::core::season::Season;
use std::sync::{Arc, PoisonError, RwLock};

/// A season shared between threads. All commands go through one writer lock since
/// the invariants span several collections.
#[derive(Debug, Clone, Default)]
pub struct SharedSeason {
    inner: Arc<RwLock<Season>>,
}

impl SharedSeason {
    pub fn new(season: Season) -> Self {
        Self {
            inner: Arc::new(RwLock::new(season)),
        }
    }

    pub fn read<T>(&self, f: impl FnOnce(&Season) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn write<T>(&self, f: impl FnOnce(&mut Season) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> Season {
        self.read(Season::clone)
    }
}
