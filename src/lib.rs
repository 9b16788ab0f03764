//! # tola-abc
//!
//! Run-time capability groups with virtual subclass registration.
//!
//! **Abstract base classes for dynamic type models.**
//!
//! ## Architecture
//!
//! A *capability group* is an abstract type that other types satisfy either by
//! inheriting from it or by being *registered* as a virtual member. Virtual
//! membership forms a general directed graph: one type may join any number
//! of unrelated groups.
//!
//! ### 1. Weak Membership
//! Registries and caches hold [`WeakSet`]s keyed by allocation identity. A
//! group never keeps a type alive.
//!
//! ### 2. Epoch-Validated Caches
//! Every answer is memoized per group. Positive answers are permanent; negative
//! answers are stamped with the runtime epoch and dropped once any registration
//! anywhere has advanced it.
//!
//! ```text
//! register(G, T) ---> G.registry += T ---> epoch += 1
//!                                              |
//! subclass_check(H, U) ---> H.stamp < epoch ? clear H.negative_cache
//! ```
//!
//! ### 3. Recursive Resolution
//! A miss walks the group's registry and direct subclasses, recursing into
//! every group it meets.
//!
//! ```text
//! +-------------------------------------------------------------------+
//! |  Layer 0: Weak Membership                                         |
//! |  - WeakSet (identity keys, lazy reclamation, snapshot iteration)  |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 1: Type Model                                              |
//! |  - TypeRef, TypeBuilder (C3 ancestry, abstract folding), Instance |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 2: Relationship Engine                                     |
//! |  - Runtime (epoch), CapabilityGroup, register, subclass_check,    |
//! |    instance_check, hooks, registry dump                           |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 3: Syntax                                                  |
//! |  - define_type!                                                   |
//! +-------------------------------------------------------------------+
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use tola_abc::prelude::*;
//!
//! let rt = Runtime::new();
//! let a = define_type!(rt, abc A {})?;
//! let b = define_type!(rt, abc B {})?;
//! let c = define_type!(rt, class C {})?;
//!
//! a.register(&b)?;
//! b.register(&c)?;
//! assert!(a.subclass_check(&c)?);
//!
//! // The reverse registration would close a cycle.
//! assert!(matches!(b.register(&a), Err(AbcError::CycleRejected { .. })));
//! assert!(!b.subclass_check(&a)?);
//! # Ok::<(), AbcError>(())
//! ```

// =============================================================================
// Layer 0: Weak Membership
// =============================================================================
pub mod weak_set;

// =============================================================================
// Layer 1: Type Model
// =============================================================================
pub mod types;

// =============================================================================
// Layer 2: Relationship Engine
// =============================================================================
pub mod engine;

// =============================================================================
// Layer 3: Syntax
// =============================================================================
pub mod syntax_macros;

pub mod error;

// =============================================================================
// Re-exports at Crate Root
// =============================================================================

pub use engine::{
    CacheToken, CapabilityGroup, DEFAULT_MAX_DEPTH, HookResult, RegistryDump, Runtime,
    RuntimeConfig, SubclassHook, get_cache_token, is_instance, is_subclass,
};
pub use error::{AbcError, Result};
pub use types::{Attr, Instance, TypeBuilder, TypeObject, TypeRef, Value, WeakTypeRef};
pub use weak_set::WeakSet;

/// Common items for defining and checking capability groups.
pub mod prelude {
    pub use crate::engine::{HookResult, Runtime, RuntimeConfig, get_cache_token};
    pub use crate::error::AbcError;
    pub use crate::types::{Instance, TypeBuilder, TypeRef, Value};
    pub use crate::{define_type, is_instance, is_subclass};
}
