//! The runtime: epoch counter, declare lock and configuration.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, MutexGuard};

/// Default bound on nested group checks (one level per group visited).
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tunables for a [`Runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Nested group checks allowed before a check fails with
    /// [`AbcError::RecursionLimit`](crate::AbcError::RecursionLimit).
    ///
    /// Every level counts: a hop into a registered group and a hop into a
    /// direct subclass alike. A negative answer walks the whole inheritance
    /// chain below the group, so a lineage deeper than this fails too.
    pub max_depth: usize,
}

impl RuntimeConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

/// Opaque snapshot of a runtime's epoch.
///
/// Changes with every successful registration on any group of the runtime.
/// Callers caching their own decisions compare tokens to detect staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheToken(u64);

impl CacheToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CacheToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Shared state of every group built against it.
///
/// The epoch starts at 0 and only [`TypeRef::register`](crate::TypeRef::register)
/// advances it. Registrations are serialized by the declare lock; checks never
/// take it.
#[derive(Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

struct RuntimeInner {
    epoch: AtomicU64,
    declare_lock: Mutex<()>,
    config: RuntimeConfig,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            inner: Arc::new(RuntimeInner {
                epoch: AtomicU64::new(0),
                declare_lock: Mutex::new(()),
                config,
            }),
        }
    }

    /// Process-wide default runtime, created on first use.
    pub fn global() -> &'static Runtime {
        static GLOBAL: OnceLock<Runtime> = OnceLock::new();
        GLOBAL.get_or_init(Runtime::new)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub fn cache_token(&self) -> CacheToken {
        CacheToken(self.epoch())
    }

    pub fn ptr_eq(&self, other: &Runtime) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::SeqCst)
    }

    /// Bumps the epoch; returns the new value.
    pub(crate) fn advance(&self) -> u64 {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn declare_lock(&self) -> MutexGuard<'_, ()> {
        self.inner.declare_lock.lock()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("epoch", &self.epoch())
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Cache token of the global runtime.
pub fn get_cache_token() -> CacheToken {
    Runtime::global().cache_token()
}
