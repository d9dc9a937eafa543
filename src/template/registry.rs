//! Type registry: index of every host type by `full_name@module`

use std::collections::{BTreeMap, HashMap};

use crate::error::ExpressionError;
use crate::host::{Host, TypeRef};

use super::parser::parse_type_reference;

/// Types matched by a type reference, plus its entity id filter
#[derive(Debug, Clone)]
pub struct ResolvedTypes {
    pub types: Vec<TypeRef>,
    /// Stable id filter, empty when the reference has none
    pub entity_id: String,
}

/// Registry of host types with a resolution cache
///
/// The cache is only cleared by [`rebuild`](Self::rebuild); callers rebuild
/// whenever the host's set of loaded modules changes.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    all_types: BTreeMap<String, TypeRef>,
    cache: HashMap<String, Vec<TypeRef>>,
    /// Compound keys rewritten before lookup, e.g. `Theo@` -> `TheoCrystal@`
    aliases: BTreeMap<String, String>,
}

impl TypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with an alias table
    pub fn with_aliases(aliases: BTreeMap<String, String>) -> Self {
        Self {
            aliases,
            ..Self::default()
        }
    }

    /// Re-index every type the host knows and drop all cached resolutions
    pub fn rebuild(&mut self, host: &dyn Host) {
        self.all_types.clear();
        self.cache.clear();
        for ty in host.types() {
            self.all_types.insert(ty.key(), ty);
        }
        log::debug!("type registry rebuilt with {} types", self.all_types.len());
    }

    pub fn len(&self) -> usize {
        self.all_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_types.is_empty()
    }

    /// Number of cached resolutions
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Resolve a base name and optional assembly hint to every matching type.
    ///
    /// Passes, first non-empty wins: key prefix, namespace suffix (`.Name`),
    /// nested type (`+Name`). An empty result is cached as well.
    pub fn resolve(&mut self, base_name: &str, assembly: &str) -> Vec<TypeRef> {
        let compound = format!("{}@{}", base_name, assembly);
        let compound = match self.aliases.get(&compound) {
            Some(alias) => alias.clone(),
            None => compound,
        };

        if let Some(types) = self.cache.get(&compound) {
            return types.clone();
        }

        let mut keys: Vec<&String> = self
            .all_types
            .keys()
            .filter(|key| key.starts_with(compound.as_str()))
            .collect();

        let stripped = compound
            .strip_prefix(['.', '+'])
            .unwrap_or(compound.as_str());
        if keys.is_empty() {
            let pattern = format!(".{}", stripped);
            keys = self
                .all_types
                .keys()
                .filter(|key| key.contains(pattern.as_str()))
                .collect();
        }
        if keys.is_empty() {
            let pattern = format!("+{}", stripped);
            keys = self
                .all_types
                .keys()
                .filter(|key| key.contains(pattern.as_str()))
                .collect();
        }

        let types: Vec<TypeRef> = keys
            .into_iter()
            .filter_map(|key| self.all_types.get(key).cloned())
            .collect();
        log::trace!("resolved '{}' to {} types", compound, types.len());
        self.cache.insert(compound, types.clone());
        types
    }

    /// Parse a type reference and resolve it.
    pub fn try_parse_types(&mut self, text: &str) -> Result<ResolvedTypes, ExpressionError> {
        let reference = parse_type_reference(text)?;
        let types = self.resolve(&reference.base, &reference.assembly);
        if types.is_empty() {
            return Err(ExpressionError::type_not_found(reference.base));
        }
        Ok(ResolvedTypes {
            types,
            entity_id: reference.entity_id,
        })
    }

    /// Like [`try_parse_types`](Self::try_parse_types) but keeps only the first match
    pub fn try_parse_type(&mut self, text: &str) -> Result<(TypeRef, String), ExpressionError> {
        let mut resolved = self.try_parse_types(text)?;
        let first = resolved.types.swap_remove(0);
        Ok((first, resolved.entity_id))
    }
}
