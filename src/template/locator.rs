//! Locating live objects of a type in the current scene

use std::collections::HashMap;

use crate::host::{Host, ObjectRef, TypeDef};

/// Objects found per `(type, entity id filter)` during one render pass
///
/// Never reuse a cache across passes: the scene changes between frames.
#[derive(Debug, Default)]
pub struct EntityCache {
    entries: HashMap<(String, String), Option<Vec<ObjectRef>>>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Find live objects of `ty` (or a subtype), optionally filtered by stable id.
///
/// Returns `None` when no scene is active.
pub fn find_entities(host: &dyn Host, ty: &TypeDef, entity_id: &str) -> Option<Vec<ObjectRef>> {
    host.scene()?;

    let entities = host.tracked(ty).unwrap_or_else(|| {
        host.objects()
            .into_iter()
            .filter(|o| o.type_def().is_same_or_subtype_of(ty))
            .collect()
    });

    if entity_id.is_empty() {
        return Some(entities);
    }
    Some(
        entities
            .into_iter()
            .filter(|o| o.stable_id() == Some(entity_id))
            .collect(),
    )
}

/// [`find_entities`] through the per-pass cache
pub fn find_cached(
    host: &dyn Host,
    ty: &TypeDef,
    entity_id: &str,
    cache: &mut EntityCache,
) -> Option<Vec<ObjectRef>> {
    let key = (ty.key(), entity_id.to_string());
    if let Some(found) = cache.entries.get(&key) {
        return found.clone();
    }
    log::trace!("entity cache miss for {}{}", key.0, key.1);
    let found = find_entities(host, ty, entity_id);
    cache.entries.insert(key, found.clone());
    found
}
