//! Declarative type definitions
//!
//! `define_type!` reads like a class statement and expands to a
//! [`TypeBuilder`](crate::TypeBuilder) chain.

// =============================================================================
// define_type! - class-statement sugar over TypeBuilder
// =============================================================================

/// Define a type (or a capability group) against a runtime.
///
/// Evaluates to `Result<TypeRef, AbcError>`.
///
/// - `abc Name(...)` makes the type a capability group.
/// - `class Name(...)` is a plain type; it still becomes a group if any base is one.
///
/// Member syntax: `abstract fn op;`, `fn op;`, and `op = None;` (blocked).
///
/// # Example
///
/// ```
/// use tola_abc::{define_type, Runtime};
///
/// let rt = Runtime::new();
/// let sized = define_type!(rt, abc Sized { abstract fn len; })?;
/// let container = define_type!(rt, abc Container { abstract fn contains; })?;
/// let collection = define_type!(rt, abc Collection(sized, container) {
///     abstract fn iter;
/// })?;
/// let frozen = define_type!(rt, class Frozen(collection) {
///     fn len;
///     fn contains;
///     fn iter;
///     hash = None;
/// })?;
///
/// assert_eq!(collection.abstract_methods().len(), 3);
/// assert!(!frozen.is_abstract());
/// assert!(sized.subclass_check(&frozen)?);
/// # Ok::<(), tola_abc::AbcError>(())
/// ```
#[macro_export]
macro_rules! define_type {
    ($rt:expr, abc $name:ident $(( $($base:expr),* $(,)? ))? { $($body:tt)* }) => {
        $crate::__define_type_body!(
            $crate::TypeBuilder::new(stringify!($name)).abstract_base() $($(.base(&$base))*)? ;
            $($body)*
        )
        .build(&$rt)
    };
    ($rt:expr, class $name:ident $(( $($base:expr),* $(,)? ))? { $($body:tt)* }) => {
        $crate::__define_type_body!(
            $crate::TypeBuilder::new(stringify!($name)) $($(.base(&$base))*)? ;
            $($body)*
        )
        .build(&$rt)
    };
}

/// Member muncher for `define_type!` - DO NOT USE DIRECTLY.
#[macro_export]
#[doc(hidden)]
macro_rules! __define_type_body {
    ($builder:expr ;) => {
        $builder
    };
    ($builder:expr ; abstract fn $op:ident ; $($rest:tt)*) => {
        $crate::__define_type_body!($builder.abstract_method(stringify!($op)) ; $($rest)*)
    };
    ($builder:expr ; fn $op:ident ; $($rest:tt)*) => {
        $crate::__define_type_body!($builder.method(stringify!($op)) ; $($rest)*)
    };
    ($builder:expr ; $op:ident = None ; $($rest:tt)*) => {
        $crate::__define_type_body!($builder.blocked(stringify!($op)) ; $($rest)*)
    };
}
