//! Relationship checks: subclass and instance membership.
//!
//! ```text
//! subclass_check(G, T)
//!   1. T in G.cache                       -> true
//!   2. negative cache stale?  clear + restamp
//!      else T in G.negative_cache         -> false
//!   3. hook(G, T) = Yes | No              -> cache, answer
//!   4. G in ancestry(T)                   -> cache, true
//!   5. any R in G.registry: T <: R        -> cache, true   (recursive)
//!   6. any direct subclass S of G: T <: S -> cache, true   (recursive)
//!   7. cache negative                     -> false
//! ```
//!
//! No group lock is held across steps 3 to 6, so the recursion may visit
//! any number of groups from any number of threads without lock ordering.

use tracing::{trace, warn};

use super::group::{CapabilityGroup, Lookup};
use super::hook::HookResult;
use crate::error::{AbcError, Result};
use crate::types::{Instance, TypeRef, Value};

impl TypeRef {
    /// Whether `candidate` is a subtype or (transitive) virtual member of `self`.
    ///
    /// Fails with [`AbcError::NotAType`] if `candidate` is an instance.
    pub fn subclass_check(&self, candidate: impl Into<Value>) -> Result<bool> {
        let candidate = candidate.into();
        subtype_at(candidate.as_type()?, self, 0)
    }

    /// Whether `instance` satisfies `self`.
    ///
    /// The reported class is tried first; the concrete type is consulted as
    /// well when a proxy makes the two differ.
    pub fn instance_check(&self, instance: &Instance) -> Result<bool> {
        let class = instance.class();
        let concrete = instance.concrete_type();

        let Some(group) = self.group() else {
            return Ok(class.has_ancestor(self) || concrete.has_ancestor(self));
        };

        if group.cached_positive(class.arc()) {
            return Ok(true);
        }
        if class == concrete {
            if group.cached_negative(class.arc()) {
                return Ok(false);
            }
            return group_check(self, group, class, 0);
        }
        Ok(group_check(self, group, class, 0)? || group_check(self, group, concrete, 0)?)
    }
}

/// `issubclass(candidate, target)`.
pub fn is_subclass(candidate: &TypeRef, target: &TypeRef) -> Result<bool> {
    subtype_at(candidate, target, 0)
}

/// `isinstance(instance, target)`.
pub fn is_instance(instance: &Instance, target: &TypeRef) -> Result<bool> {
    target.instance_check(instance)
}

/// Groups answer through the engine; plain types by ancestry alone.
pub(crate) fn subtype_at(candidate: &TypeRef, target: &TypeRef, depth: usize) -> Result<bool> {
    match target.group() {
        Some(group) => group_check(target, group, candidate, depth),
        None => Ok(candidate.has_ancestor(target)),
    }
}

fn group_check(
    target: &TypeRef,
    group: &CapabilityGroup,
    candidate: &TypeRef,
    depth: usize,
) -> Result<bool> {
    let limit = group.runtime().config().max_depth;
    if depth >= limit {
        warn!(group = %target, candidate = %candidate, limit, "relationship check too deep");
        return Err(AbcError::RecursionLimit { group: target.name().to_string(), limit });
    }

    let observed = match group.consult(candidate.arc()) {
        Lookup::Hit(answer) => return Ok(answer),
        Lookup::Miss(version) => version,
    };

    if let Some(hook) = target.subclass_hook() {
        match hook.check(target, candidate) {
            HookResult::Yes => {
                trace!(group = %target, candidate = %candidate, "hook accepted");
                group.record_positive(candidate.arc());
                return Ok(true);
            }
            HookResult::No => {
                trace!(group = %target, candidate = %candidate, "hook rejected");
                group.record_negative(candidate.arc(), observed);
                return Ok(false);
            }
            HookResult::Undecided => {}
        }
    }

    if candidate.has_ancestor(target) {
        group.record_positive(candidate.arc());
        return Ok(true);
    }

    for member in group.registry_snapshot() {
        if subtype_at(candidate, &TypeRef::from_arc(member), depth + 1)? {
            group.record_positive(candidate.arc());
            return Ok(true);
        }
    }

    for sub in target.subclasses() {
        if subtype_at(candidate, &sub, depth + 1)? {
            group.record_positive(candidate.arc());
            return Ok(true);
        }
    }

    trace!(group = %target, candidate = %candidate, "caching negative answer");
    group.record_negative(candidate.arc(), observed);
    Ok(false)
}
