//! Type construction: ancestry linearization and abstract-method folding.
//!
//! This is the collaborator that sits in front of the relationship engine.
//! It works out which operations a new type leaves abstract and hands that
//! set to [`CapabilityGroup::new`] when the type is a group.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use super::object::{Attr, TypeObject, TypeRef};
use crate::engine::{CapabilityGroup, Runtime, SubclassHook};
use crate::error::{AbcError, Result};

/// Builder for a [`TypeRef`].
///
/// # Example
///
/// ```
/// use tola_abc::{Runtime, TypeBuilder};
///
/// let rt = Runtime::new();
/// let sized = TypeBuilder::new("Sized").abstract_base().abstract_method("len").build(&rt)?;
/// let bag = TypeBuilder::new("Bag").base(&sized).method("len").build(&rt)?;
///
/// assert!(sized.is_abstract());
/// assert!(!bag.is_abstract());
/// # Ok::<(), tola_abc::AbcError>(())
/// ```
pub struct TypeBuilder {
    name: String,
    bases: Vec<TypeRef>,
    members: BTreeMap<String, Attr>,
    abstract_base: bool,
    hook: Option<Arc<dyn SubclassHook>>,
}

impl TypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            members: BTreeMap::new(),
            abstract_base: false,
            hook: None,
        }
    }

    pub fn base(mut self, base: &TypeRef) -> Self {
        self.bases.push(base.clone());
        self
    }

    pub fn bases<'a>(mut self, bases: impl IntoIterator<Item = &'a TypeRef>) -> Self {
        self.bases.extend(bases.into_iter().cloned());
        self
    }

    /// Declares an operation subtypes must override.
    pub fn abstract_method(self, name: impl Into<String>) -> Self {
        self.member(name, Attr::Abstract)
    }

    /// Defines a concrete operation.
    pub fn method(self, name: impl Into<String>) -> Self {
        self.member(name, Attr::Concrete)
    }

    /// Sets an attribute to "none", hiding any inherited definition from
    /// structural checks.
    pub fn blocked(self, name: impl Into<String>) -> Self {
        self.member(name, Attr::Blocked)
    }

    pub fn member(mut self, name: impl Into<String>, attr: Attr) -> Self {
        self.members.insert(name.into(), attr);
        self
    }

    /// Makes the type a capability group even if none of its bases is one.
    pub fn abstract_base(mut self) -> Self {
        self.abstract_base = true;
        self
    }

    /// Installs a subclass hook. Subtypes inherit it.
    ///
    /// Only group checks consult hooks, so on a plain type the hook lies
    /// dormant until a group derives from it.
    ///
    /// The hook receives the group being checked, so it does not need to
    /// capture a handle to it (capturing one would keep the type alive forever).
    pub fn subclass_hook(mut self, hook: impl SubclassHook + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Creates the type.
    ///
    /// Fails with [`AbcError::DuplicateBase`] or [`AbcError::MroConflict`]
    /// when the bases cannot be linearized, and with
    /// [`AbcError::RuntimeMismatch`] when a base group was built against a
    /// different runtime.
    ///
    /// Abstract operations are only tracked for groups; on a plain type an
    /// abstract member is an ordinary attribute and never blocks
    /// instantiation.
    pub fn build(self, runtime: &Runtime) -> Result<TypeRef> {
        let Self { name, bases, members, abstract_base, hook } = self;

        for base in &bases {
            if let Some(group) = base.group() {
                if !group.runtime().ptr_eq(runtime) {
                    return Err(AbcError::RuntimeMismatch { name, other: base.name().to_string() });
                }
            }
        }

        let mut seen = Vec::with_capacity(bases.len());
        for base in &bases {
            if seen.contains(&base) {
                return Err(AbcError::DuplicateBase { name, base: base.name().to_string() });
            }
            seen.push(base);
        }

        let mro = linearize(&name, &bases)?;
        let is_group = abstract_base || bases.iter().any(TypeRef::is_group);
        let abstract_methods = if is_group {
            fold_abstract_methods(&members, &mro, &bases)
        } else {
            BTreeSet::new()
        };

        let group = is_group.then(|| CapabilityGroup::new(runtime, abstract_methods.clone()));

        trace!(
            name = %name,
            bases = bases.len(),
            abstract_methods = abstract_methods.len(),
            group = group.is_some(),
            "built type"
        );

        let inner = Arc::new(TypeObject {
            name,
            bases,
            mro,
            members,
            abstract_methods,
            subclasses: Mutex::new(Vec::new()),
            hook,
            group,
        });
        for base in &inner.bases {
            base.0.subclasses.lock().push(Arc::downgrade(&inner));
        }
        Ok(TypeRef::from_arc(inner))
    }
}

// =============================================================================
// C3 linearization
// =============================================================================

/// Merges the ancestries of `bases` into one order that keeps every base
/// before its own ancestors and preserves the local base order.
fn linearize(name: &str, bases: &[TypeRef]) -> Result<Vec<TypeRef>> {
    let mut seqs: Vec<Vec<TypeRef>> = bases
        .iter()
        .map(|base| base.ancestry().cloned().collect())
        .collect();
    seqs.push(bases.to_vec());

    let mut out = Vec::new();
    loop {
        seqs.retain(|seq| !seq.is_empty());
        if seqs.is_empty() {
            return Ok(out);
        }

        let head = seqs
            .iter()
            .map(|seq| &seq[0])
            .find(|candidate| !seqs.iter().any(|seq| seq[1..].contains(*candidate)))
            .cloned()
            .ok_or_else(|| AbcError::MroConflict { name: name.to_string() })?;

        for seq in &mut seqs {
            if seq[0] == head {
                seq.remove(0);
            }
        }
        out.push(head);
    }
}

// =============================================================================
// Abstract methods
// =============================================================================

/// Own abstract members plus every inherited abstract operation that still
/// resolves to an abstract attribute through the new type's ancestry.
fn fold_abstract_methods(
    members: &BTreeMap<String, Attr>,
    mro: &[TypeRef],
    bases: &[TypeRef],
) -> BTreeSet<String> {
    let resolve = |op: &str| {
        members
            .get(op)
            .copied()
            .or_else(|| mro.iter().find_map(|t| t.members().get(op).copied()))
    };

    let mut abstracts: BTreeSet<String> = members
        .iter()
        .filter(|(_, attr)| **attr == Attr::Abstract)
        .map(|(op, _)| op.clone())
        .collect();
    for base in bases {
        for op in base.abstract_methods() {
            if resolve(op) == Some(Attr::Abstract) {
                abstracts.insert(op.clone());
            }
        }
    }
    abstracts
}
