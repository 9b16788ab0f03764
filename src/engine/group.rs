//! Per-group state: required operations, registry and membership caches.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::trace;

use super::runtime::Runtime;
use crate::types::TypeObject;
use crate::weak_set::WeakSet;

/// Capability group state attached to an abstract type.
///
/// ```text
/// registry         declared virtual members          grows only via register
/// cache            proven members                    never contradicted later
/// negative_cache   proven non-members                valid while
///                                                    negative_cache_version == epoch
/// ```
pub struct CapabilityGroup {
    runtime: Runtime,
    required_operations: BTreeSet<String>,
    state: Mutex<GroupState>,
}

pub(crate) struct GroupState {
    pub(crate) registry: WeakSet<TypeObject>,
    pub(crate) cache: WeakSet<TypeObject>,
    pub(crate) negative_cache: WeakSet<TypeObject>,
    pub(crate) negative_cache_version: u64,
}

/// Outcome of consulting the caches before a full check.
pub(crate) enum Lookup {
    Hit(bool),
    /// Carries the negative-cache version the check is running against.
    Miss(u64),
}

impl CapabilityGroup {
    /// Construction hook called once the required-operation set is known.
    /// Starts with an empty registry and caches stamped with the current epoch.
    pub fn new(runtime: &Runtime, required_operations: BTreeSet<String>) -> Self {
        Self {
            runtime: runtime.clone(),
            required_operations,
            state: Mutex::new(GroupState {
                registry: WeakSet::new(),
                cache: WeakSet::new(),
                negative_cache: WeakSet::new(),
                negative_cache_version: runtime.epoch(),
            }),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Operations a direct subtype must supply to stop being abstract.
    pub fn required_operations(&self) -> &BTreeSet<String> {
        &self.required_operations
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, GroupState> {
        self.state.lock()
    }

    /// Positive cache, then negative cache with lazy invalidation.
    pub(crate) fn consult(&self, ty: &Arc<TypeObject>) -> Lookup {
        let epoch = self.runtime.epoch();
        let mut state = self.state();
        if state.cache.contains(ty) {
            return Lookup::Hit(true);
        }
        if state.negative_cache_version < epoch {
            trace!(
                stale = state.negative_cache_version,
                epoch,
                dropped = state.negative_cache.len(),
                "invalidating negative cache"
            );
            state.negative_cache.clear();
            state.negative_cache_version = epoch;
        } else if state.negative_cache.contains(ty) {
            return Lookup::Hit(false);
        }
        Lookup::Miss(state.negative_cache_version)
    }

    /// Instance-check fast path: positive cache only.
    pub(crate) fn cached_positive(&self, ty: &Arc<TypeObject>) -> bool {
        self.state().cache.contains(ty)
    }

    /// Negative cache answer, only if it is current. Never invalidates.
    pub(crate) fn cached_negative(&self, ty: &Arc<TypeObject>) -> bool {
        let epoch = self.runtime.epoch();
        let state = self.state();
        state.negative_cache_version == epoch && state.negative_cache.contains(ty)
    }

    pub(crate) fn record_positive(&self, ty: &Arc<TypeObject>) {
        self.state().cache.add(ty);
    }

    /// Records a negative answer computed against `observed`. Dropped if the
    /// negative cache was rebuilt meanwhile.
    pub(crate) fn record_negative(&self, ty: &Arc<TypeObject>, observed: u64) {
        let mut state = self.state();
        if state.negative_cache_version == observed {
            state.negative_cache.add(ty);
        }
    }

    pub(crate) fn registry_snapshot(&self) -> Vec<Arc<TypeObject>> {
        self.state().registry.snapshot()
    }
}

impl fmt::Debug for CapabilityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("CapabilityGroup")
            .field("required_operations", &self.required_operations)
            .field("registry", &state.registry.len())
            .field("cache", &state.cache.len())
            .field("negative_cache", &state.negative_cache.len())
            .field("negative_cache_version", &state.negative_cache_version)
            .finish()
    }
}
