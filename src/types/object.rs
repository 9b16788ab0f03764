//! Type objects and the handles the engine passes around.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::engine::{CapabilityGroup, SubclassHook};

/// How a type defines one of its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    /// Declared but left for subtypes to implement.
    Abstract,
    /// Implemented.
    Concrete,
    /// Explicitly set to "none"; structural checks treat it as missing.
    Blocked,
}

/// A run-time type.
///
/// Owned through [`TypeRef`]. A type holds its bases strongly and its direct
/// subclasses weakly, so dropping the last handle to a leaf type frees it even
/// if it was registered with, or cached by, any number of groups.
pub struct TypeObject {
    pub(crate) name: String,
    pub(crate) bases: Vec<TypeRef>,
    /// Linearized ancestry, self excluded.
    pub(crate) mro: Vec<TypeRef>,
    pub(crate) members: BTreeMap<String, Attr>,
    pub(crate) abstract_methods: BTreeSet<String>,
    pub(crate) subclasses: Mutex<Vec<Weak<TypeObject>>>,
    pub(crate) hook: Option<Arc<dyn SubclassHook>>,
    pub(crate) group: Option<CapabilityGroup>,
}

impl fmt::Debug for TypeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeObject")
            .field("name", &self.name)
            .field("bases", &self.bases)
            .field("abstract_methods", &self.abstract_methods)
            .field("group", &self.group.is_some())
            .finish()
    }
}

/// Shared handle to a [`TypeObject`], compared and hashed by identity.
#[derive(Clone)]
pub struct TypeRef(pub(crate) Arc<TypeObject>);

/// Non-owning counterpart of [`TypeRef`].
#[derive(Clone)]
pub struct WeakTypeRef(Weak<TypeObject>);

impl TypeRef {
    pub(crate) fn from_arc(inner: Arc<TypeObject>) -> Self {
        Self(inner)
    }

    pub(crate) fn arc(&self) -> &Arc<TypeObject> {
        &self.0
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Direct bases in declaration order.
    pub fn bases(&self) -> &[TypeRef] {
        &self.0.bases
    }

    /// Linearized ancestry, self excluded.
    pub fn mro(&self) -> &[TypeRef] {
        &self.0.mro
    }

    /// Self followed by the linearized ancestry.
    pub fn ancestry(&self) -> impl Iterator<Item = &TypeRef> {
        std::iter::once(self).chain(self.0.mro.iter())
    }

    /// Whether `other` is this type or one of its normal (non-virtual) ancestors.
    pub fn has_ancestor(&self, other: &TypeRef) -> bool {
        self.ancestry().any(|t| t == other)
    }

    /// Attributes defined directly on this type.
    pub fn members(&self) -> &BTreeMap<String, Attr> {
        &self.0.members
    }

    /// Resolves `name` along the ancestry.
    pub fn lookup(&self, name: &str) -> Option<Attr> {
        self.ancestry().find_map(|t| t.0.members.get(name).copied())
    }

    /// Operations still abstract on this type.
    pub fn abstract_methods(&self) -> &BTreeSet<String> {
        &self.0.abstract_methods
    }

    pub fn is_abstract(&self) -> bool {
        !self.0.abstract_methods.is_empty()
    }

    /// Capability group state, present for groups and every subtype of one.
    pub fn group(&self) -> Option<&CapabilityGroup> {
        self.0.group.as_ref()
    }

    pub fn is_group(&self) -> bool {
        self.0.group.is_some()
    }

    /// Live direct subclasses. Dead links are pruned on the way.
    pub fn subclasses(&self) -> Vec<TypeRef> {
        let mut links = self.0.subclasses.lock();
        links.retain(|weak| weak.strong_count() > 0);
        links.iter().filter_map(Weak::upgrade).map(TypeRef).collect()
    }

    /// Subclass hook in effect for this type: its own, or the nearest ancestor's.
    pub fn subclass_hook(&self) -> Option<&Arc<dyn SubclassHook>> {
        self.ancestry().find_map(|t| t.0.hook.as_ref())
    }

    pub fn downgrade(&self) -> WeakTypeRef {
        WeakTypeRef(Arc::downgrade(&self.0))
    }

    /// Number of strong handles to this type.
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl WeakTypeRef {
    pub fn upgrade(&self) -> Option<TypeRef> {
        self.0.upgrade().map(TypeRef)
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<type {}>", self.0.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

impl fmt::Debug for WeakTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(t) => write!(f, "<weak {}>", t.name()),
            None => f.write_str("<weak dead>"),
        }
    }
}
