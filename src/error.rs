//! Error taxonomy for registration, relationship checks and type construction.

use std::collections::BTreeSet;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AbcError>;

/// Everything that can go wrong in the capability runtime.
///
/// Every variant is reported synchronously by the call that triggered it.
/// Nothing is retried internally, and a failed `register` leaves both the
/// registry and the epoch untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbcError {
    /// A value that is not a type was passed where a type is required.
    #[error("expected a type, found {found}")]
    NotAType { found: String },

    /// `register` was called on a type that carries no capability group.
    #[error("`{name}` is not a capability group; only groups accept virtual members")]
    NotAGroup { name: String },

    /// Registering `member` under `group` would make `group` a member of itself.
    #[error("refusing to register `{member}` under `{group}`: it would create a relationship cycle")]
    CycleRejected { group: String, member: String },

    /// `name` and `other` were built against different runtimes, so no single
    /// epoch could retire negative answers that relate them.
    #[error("`{name}` and `{other}` belong to different runtimes")]
    RuntimeMismatch { name: String, other: String },

    /// Nested group checks exceeded the configured depth.
    #[error("relationship check on `{group}` exceeded the maximum depth of {limit}")]
    RecursionLimit { group: String, limit: usize },

    /// The bases of a new type admit no consistent linearization.
    #[error("cannot create a consistent ancestry for `{name}`")]
    MroConflict { name: String },

    /// The same base was listed twice.
    #[error("duplicate base `{base}` in definition of `{name}`")]
    DuplicateBase { name: String, base: String },

    /// Attempted to instantiate a type that still has abstract operations.
    #[error("cannot instantiate abstract type `{name}` with abstract operations {}", join(.missing))]
    AbstractInstantiation { name: String, missing: BTreeSet<String> },
}

fn join(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
