//! Subclass hooks: a group's custom override of the relationship check.

use crate::types::{Attr, TypeRef};

/// Three-valued answer of a [`SubclassHook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookResult {
    Yes,
    No,
    /// Fall through to the registry and ancestry search.
    Undecided,
}

impl HookResult {
    /// `Yes` if every operation in `ops` is defined along `candidate`'s
    /// ancestry and the nearest definition is not blocked; `Undecided` otherwise.
    pub fn from_methods<I, S>(candidate: &TypeRef, ops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let all_defined = ops.into_iter().all(|op| {
            matches!(candidate.lookup(op.as_ref()), Some(Attr::Abstract | Attr::Concrete))
        });
        if all_defined { HookResult::Yes } else { HookResult::Undecided }
    }
}

impl From<bool> for HookResult {
    fn from(value: bool) -> Self {
        if value { HookResult::Yes } else { HookResult::No }
    }
}

/// Custom relationship predicate attached to a type and inherited by its subtypes.
///
/// Called with the group being checked and the candidate type. Must not
/// register virtual members.
pub trait SubclassHook: Send + Sync {
    fn check(&self, group: &TypeRef, candidate: &TypeRef) -> HookResult;
}

impl<F> SubclassHook for F
where
    F: Fn(&TypeRef, &TypeRef) -> HookResult + Send + Sync,
{
    fn check(&self, group: &TypeRef, candidate: &TypeRef) -> HookResult {
        self(group, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Runtime, TypeBuilder};

    #[test]
    fn test_from_methods_follows_ancestry() {
        let rt = Runtime::new();
        let base = TypeBuilder::new("Base").method("len").build(&rt).unwrap();
        let child = TypeBuilder::new("Child").base(&base).method("iter").build(&rt).unwrap();

        assert_eq!(HookResult::from_methods(&child, ["len", "iter"]), HookResult::Yes);
        assert_eq!(HookResult::from_methods(&child, ["len", "contains"]), HookResult::Undecided);
    }

    #[test]
    fn test_blocked_member_hides_inherited_definition() {
        let rt = Runtime::new();
        let base = TypeBuilder::new("Base").method("hash").build(&rt).unwrap();
        let child = TypeBuilder::new("Child").base(&base).blocked("hash").build(&rt).unwrap();

        assert_eq!(HookResult::from_methods(&base, ["hash"]), HookResult::Yes);
        assert_eq!(HookResult::from_methods(&child, ["hash"]), HookResult::Undecided);
    }

    #[test]
    fn test_from_bool() {
        assert_eq!(HookResult::from(true), HookResult::Yes);
        assert_eq!(HookResult::from(false), HookResult::No);
    }
}
