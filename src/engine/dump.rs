//! Debug helpers: registry dump and forced clearing.

use std::fmt;

use super::runtime::CacheToken;
use crate::error::{AbcError, Result};
use crate::types::{TypeObject, TypeRef};
use crate::weak_set::WeakSet;

/// Point-in-time view of a group's registry and caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryDump {
    pub group: String,
    pub cache_token: CacheToken,
    /// Member names, sorted.
    pub registry: Vec<String>,
    pub cache: Vec<String>,
    pub negative_cache: Vec<String>,
    pub negative_cache_version: u64,
}

impl fmt::Display for RegistryDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Group: {}", self.group)?;
        writeln!(f, "Cache token: {}", self.cache_token)?;
        writeln!(f, "registry: {{{}}}", self.registry.join(", "))?;
        writeln!(f, "cache: {{{}}}", self.cache.join(", "))?;
        writeln!(f, "negative cache: {{{}}}", self.negative_cache.join(", "))?;
        write!(f, "negative cache version: {}", self.negative_cache_version)
    }
}

fn sorted_names(set: &WeakSet<TypeObject>) -> Vec<String> {
    let mut names: Vec<String> = set.iter().map(|ty| ty.name.clone()).collect();
    names.sort();
    names
}

impl TypeRef {
    fn require_group(&self) -> Result<&super::CapabilityGroup> {
        self.group().ok_or_else(|| AbcError::NotAGroup { name: self.name().to_string() })
    }

    pub fn dump_registry(&self) -> Result<RegistryDump> {
        let group = self.require_group()?;
        let cache_token = group.runtime().cache_token();
        let state = group.state();
        Ok(RegistryDump {
            group: self.name().to_string(),
            cache_token,
            registry: sorted_names(&state.registry),
            cache: sorted_names(&state.cache),
            negative_cache: sorted_names(&state.negative_cache),
            negative_cache_version: state.negative_cache_version,
        })
    }

    /// Forgets every virtual member. Debugging and tests only: positive
    /// answers already cached elsewhere are not revisited.
    pub fn clear_registry(&self) -> Result<()> {
        self.require_group()?.state().registry.clear();
        Ok(())
    }

    /// Empties both membership caches.
    pub fn clear_caches(&self) -> Result<()> {
        let group = self.require_group()?;
        let mut state = group.state();
        state.cache.clear();
        state.negative_cache.clear();
        Ok(())
    }
}
