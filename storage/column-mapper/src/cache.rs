// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{
    descriptor::{MappingDescriptor, resolve},
    error::MappingError,
    metadata::TypeDescription,
    metrics::{CACHE_HIT, CACHE_MISS, CACHE_RESOLVE_ERROR, record_cache_event},
};
use parking_lot::RwLock;
use std::{any::TypeId, collections::HashMap, sync::Arc};

/// Resolved descriptors keyed by type.
///
/// A miss resolves outside of any lock. When several threads miss on the
/// same type at once, the first insert wins and every caller gets that
/// `Arc`; the redundant copies are dropped. Failed resolutions are not
/// cached.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    descriptors: RwLock<HashMap<TypeId, Arc<MappingDescriptor>>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_resolve(
        &self,
        type_id: TypeId,
        describe: impl FnOnce() -> TypeDescription,
    ) -> Result<Arc<MappingDescriptor>, MappingError> {
        if let Some(descriptor) = self.get(type_id) {
            record_cache_event(CACHE_HIT);
            return Ok(descriptor);
        }

        record_cache_event(CACHE_MISS);
        let descriptor = resolve(&describe()).inspect_err(|_| {
            record_cache_event(CACHE_RESOLVE_ERROR);
        })?;

        Ok(self
            .descriptors
            .write()
            .entry(type_id)
            .or_insert_with(|| Arc::new(descriptor))
            .clone())
    }

    pub fn get(&self, type_id: TypeId) -> Option<Arc<MappingDescriptor>> {
        self.descriptors.read().get(&type_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.descriptors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.read().is_empty()
    }

    /// Drops every cached descriptor.
    pub fn clear(&self) {
        self.descriptors.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_ok};
    use std::thread;

    struct Person;
    struct Broken;

    fn person() -> TypeDescription {
        TypeDescription::builder("Person")
            .keyspace("Test")
            .family("Standard")
            .key::<String>("id")
            .value::<String>("name", "name")
            .build()
    }

    #[test]
    fn test_resolves_once() {
        let cache = DescriptorCache::new();
        assert!(cache.is_empty());

        let first = assert_ok!(cache.get_or_resolve(TypeId::of::<Person>(), person));
        let second = assert_ok!(cache.get_or_resolve(TypeId::of::<Person>(), || {
            panic!("cached descriptors are not re-resolved")
        }));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.get(TypeId::of::<Person>()).is_none());
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = DescriptorCache::new();
        let broken = || TypeDescription::builder("Broken").keyspace("Test").build();
        assert_err!(cache.get_or_resolve(TypeId::of::<Broken>(), broken));
        assert_err!(cache.get_or_resolve(TypeId::of::<Broken>(), broken));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_first_use_converges() {
        let cache = Arc::new(DescriptorCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                thread::spawn(move || {
                    cache
                        .get_or_resolve(TypeId::of::<Person>(), person)
                        .unwrap()
                })
            })
            .collect();
        let descriptors: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let cached = cache.get(TypeId::of::<Person>()).unwrap();
        assert!(descriptors.iter().all(|d| Arc::ptr_eq(d, &cached)));
        assert_eq!(cache.len(), 1);
    }
}
