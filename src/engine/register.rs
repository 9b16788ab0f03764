//! Virtual member registration.

use tracing::{debug, trace};

use super::check::subtype_at;
use crate::error::{AbcError, Result};
use crate::types::{TypeRef, Value};

impl TypeRef {
    /// Declares `candidate` a virtual member of this group and returns it.
    ///
    /// A candidate that already satisfies the group is returned unchanged
    /// without touching the epoch, which also makes registering a group with
    /// itself a no-op. A candidate the group already satisfies is refused with
    /// [`AbcError::CycleRejected`]. Otherwise the candidate is added to the
    /// registry and the runtime epoch advances by one, which retires every
    /// group's negative cache on its next check.
    ///
    /// A member group built against another [`Runtime`](crate::Runtime) is
    /// refused with [`AbcError::RuntimeMismatch`]: its registrations would
    /// advance an epoch this group never consults.
    ///
    /// # Example
    ///
    /// ```
    /// use tola_abc::{Runtime, TypeBuilder};
    ///
    /// let rt = Runtime::new();
    /// let sized = TypeBuilder::new("Sized").abstract_base().abstract_method("len").build(&rt)?;
    /// let bag = TypeBuilder::new("Bag").method("len").build(&rt)?;
    ///
    /// assert!(!sized.subclass_check(&bag)?);
    /// assert_eq!(sized.register(&bag)?, bag);
    /// assert!(sized.subclass_check(&bag)?);
    /// # Ok::<(), tola_abc::AbcError>(())
    /// ```
    pub fn register(&self, candidate: impl Into<Value>) -> Result<TypeRef> {
        let group = self
            .group()
            .ok_or_else(|| AbcError::NotAGroup { name: self.name().to_string() })?;
        let member = candidate.into().into_type()?;
        let runtime = group.runtime();
        if let Some(other) = member.group() {
            if !other.runtime().ptr_eq(runtime) {
                return Err(AbcError::RuntimeMismatch {
                    name: self.name().to_string(),
                    other: member.name().to_string(),
                });
            }
        }

        let _declaring = runtime.declare_lock();

        if subtype_at(&member, self, 0)? {
            trace!(group = %self, member = %member, "already a member");
            return Ok(member);
        }
        if subtype_at(self, &member, 0)? {
            debug!(group = %self, member = %member, "refusing to create a relationship cycle");
            return Err(AbcError::CycleRejected {
                group: self.name().to_string(),
                member: member.name().to_string(),
            });
        }

        group.state().registry.add(member.arc());
        let epoch = runtime.advance();
        debug!(group = %self, member = %member, epoch, "registered virtual member");
        Ok(member)
    }
}
