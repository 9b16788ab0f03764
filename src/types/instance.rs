//! Instances and the values accepted at the API boundary.

use std::fmt;

use super::object::TypeRef;
use crate::error::{AbcError, Result};

/// An instance of a type.
///
/// Carries two types that usually agree: the class it reports and the type
/// it was actually created from. Proxies and wrappers report a different
/// class through [`Instance::with_class`].
#[derive(Clone, PartialEq, Eq)]
pub struct Instance {
    class: TypeRef,
    concrete: TypeRef,
}

impl Instance {
    pub(crate) fn new(ty: &TypeRef) -> Self {
        Self { class: ty.clone(), concrete: ty.clone() }
    }

    /// The class this instance reports.
    pub fn class(&self) -> &TypeRef {
        &self.class
    }

    /// The type this instance was created from.
    pub fn concrete_type(&self) -> &TypeRef {
        &self.concrete
    }

    /// Overrides the reported class, leaving the concrete type unchanged.
    pub fn with_class(mut self, class: &TypeRef) -> Self {
        self.class = class.clone();
        self
    }

    pub fn is_proxied(&self) -> bool {
        self.class != self.concrete
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_proxied() {
            write!(f, "<{} object as {}>", self.concrete.name(), self.class.name())
        } else {
            write!(f, "<{} object>", self.concrete.name())
        }
    }
}

impl TypeRef {
    /// Creates an instance, refusing while any operation is still abstract.
    pub fn instantiate(&self) -> Result<Instance> {
        if self.is_abstract() {
            return Err(AbcError::AbstractInstantiation {
                name: self.name().to_string(),
                missing: self.abstract_methods().clone(),
            });
        }
        Ok(Instance::new(self))
    }
}

/// A value handed to the engine: either a type or an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Type(TypeRef),
    Instance(Instance),
}

impl Value {
    /// The type, or [`AbcError::NotAType`] for an instance.
    pub fn as_type(&self) -> Result<&TypeRef> {
        match self {
            Value::Type(ty) => Ok(ty),
            Value::Instance(instance) => Err(not_a_type(instance)),
        }
    }

    pub fn into_type(self) -> Result<TypeRef> {
        match self {
            Value::Type(ty) => Ok(ty),
            Value::Instance(instance) => Err(not_a_type(&instance)),
        }
    }
}

fn not_a_type(instance: &Instance) -> AbcError {
    AbcError::NotAType { found: format!("instance of `{}`", instance.class().name()) }
}

impl From<TypeRef> for Value {
    fn from(ty: TypeRef) -> Self {
        Value::Type(ty)
    }
}

impl From<&TypeRef> for Value {
    fn from(ty: &TypeRef) -> Self {
        Value::Type(ty.clone())
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Instance(instance)
    }
}

impl From<&Instance> for Value {
    fn from(instance: &Instance) -> Self {
        Value::Instance(instance.clone())
    }
}
