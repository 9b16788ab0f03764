//! # Layer 1: Type Model
//!
//! The run-time types the relationship engine reasons about.
//!
//! - **Objects**: `TypeObject` behind the identity-compared `TypeRef` handle.
//! - **Construction**: `TypeBuilder` linearizes the ancestry (C3) and folds
//!   inherited abstract operations before handing a group its
//!   required-operation set.
//! - **Values**: `Instance` (reported class vs. concrete type) and `Value`.

pub mod builder;
pub mod instance;
pub mod object;

pub use builder::TypeBuilder;
pub use instance::{Instance, Value};
pub use object::{Attr, TypeObject, TypeRef, WeakTypeRef};
