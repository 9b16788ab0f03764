//! # Layer 2: Relationship Engine
//!
//! Virtual member registration and the cached subclass/instance checks.
//!
//! ## Module Structure
//!
//! ```text
//! engine/
//! ├── runtime.rs  - Runtime (epoch, declare lock, config), CacheToken
//! ├── group.rs    - CapabilityGroup: registry + positive/negative caches
//! ├── hook.rs     - SubclassHook, HookResult
//! ├── check.rs    - subclass_check / instance_check
//! ├── register.rs - register (virtual membership)
//! └── dump.rs     - RegistryDump, forced clearing
//! ```
//!
//! ## Invalidation
//!
//! One epoch per runtime, bumped by every successful registration. Each group
//! stamps its negative cache with the epoch it was built under and discards
//! it wholesale when the stamp falls behind. Positive answers are never
//! invalidated: registration only ever adds relationships.

pub mod check;
pub mod dump;
pub mod group;
pub mod hook;
pub mod register;
pub mod runtime;

pub use check::{is_instance, is_subclass};
pub use dump::RegistryDump;
pub use group::CapabilityGroup;
pub use hook::{HookResult, SubclassHook};
pub use runtime::{CacheToken, DEFAULT_MAX_DEPTH, Runtime, RuntimeConfig, get_cache_token};
