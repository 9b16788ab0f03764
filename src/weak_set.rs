//! # Layer 0: Weak Membership Set
//!
//! An unordered set of `Arc<T>` handles that never keeps its members alive.
//!
//! ## Identity Keys
//!
//! Entries are keyed by the address of the shared allocation:
//!
//! ```text
//! Arc<T> --as_ptr--> usize key --> Weak<T>
//! ```
//!
//! A `Weak<T>` keeps the allocation (not the value) alive, so an address
//! cannot be handed out again while an entry for it still exists. A key
//! therefore always names the same referent, dead or alive.
//!
//! ## Reclamation
//!
//! Dead entries are dropped lazily: on lookup, on iteration, by an explicit
//! [`WeakSet::sweep`], and by an automatic sweep whenever the backing map has
//! doubled since the previous one. Memory stays proportional to the live
//! population.
//!
//! ## Iteration
//!
//! Iteration is snapshot-on-iterate: live members are upgraded into a `Vec`
//! first, so the set may be mutated freely while a snapshot is walked.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// Backing map size below which `add` never sweeps.
const MIN_SWEEP_THRESHOLD: usize = 16;

/// Non-owning set of shared handles.
pub struct WeakSet<T> {
    entries: HashMap<usize, Weak<T>>,
    sweep_at: usize,
}

#[inline]
fn key<T>(item: &Arc<T>) -> usize {
    Arc::as_ptr(item) as *const () as usize
}

impl<T> WeakSet<T> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self { entries: HashMap::new(), sweep_at: MIN_SWEEP_THRESHOLD }
    }

    /// Adds `item`. Idempotent; returns `true` if it was not already present.
    pub fn add(&mut self, item: &Arc<T>) -> bool {
        if self.entries.len() >= self.sweep_at {
            self.sweep();
            self.sweep_at = (self.entries.len() * 2).max(MIN_SWEEP_THRESHOLD);
        }
        match self.entries.get(&key(item)) {
            Some(existing) if existing.strong_count() > 0 => false,
            _ => {
                self.entries.insert(key(item), Arc::downgrade(item));
                true
            }
        }
    }

    /// Whether `item` is a live member.
    pub fn contains(&self, item: &Arc<T>) -> bool {
        self.entries
            .get(&key(item))
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Removes `item`; returns `true` if it was a live member.
    pub fn remove(&mut self, item: &Arc<T>) -> bool {
        self.entries
            .remove(&key(item))
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Removes every entry immediately.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.sweep_at = MIN_SWEEP_THRESHOLD;
    }

    /// Number of live members.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|weak| weak.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops entries whose referent has died. Returns how many were dropped.
    pub fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, weak| weak.strong_count() > 0);
        before - self.entries.len()
    }

    /// Upgrades every live member into an owned snapshot.
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.entries.values().filter_map(Weak::upgrade).collect()
    }

    /// Iterates over a snapshot of the live members.
    pub fn iter(&self) -> std::vec::IntoIter<Arc<T>> {
        self.snapshot().into_iter()
    }
}

impl<T> Default for WeakSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for WeakSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.snapshot()).finish()
    }
}

impl<'a, T> IntoIterator for &'a WeakSet<T> {
    type Item = Arc<T>;
    type IntoIter = std::vec::IntoIter<Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
