use super::{DuplicateResource, ResourceStore};
use crate::native::{ObjectClass, ObjectId};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResourceEntry {
    instance: ObjectId,
    class: ObjectClass,
}

/// In-memory [`ResourceStore`] backing the `resources` element
#[derive(Debug, Clone, Default)]
pub struct ResourceContainer {
    entries: HashMap<String, ResourceEntry>,
}

impl ResourceContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Unbind `id` only if it still points at `instance`.
    ///
    /// A rejected duplicate never owned the id, so unmounting it must not drop
    /// the binding that won.
    pub fn release(&mut self, id: &str, instance: ObjectId) -> bool {
        match self.entries.get(id) {
            Some(entry) if entry.instance == instance => {
                self.entries.remove(id);
                true
            }
            _ => false,
        }
    }

    /// Class of the instance bound to `id`
    pub fn class_of(&self, id: &str) -> Option<ObjectClass> {
        self.entries.get(id).map(|entry| entry.class)
    }

    /// Number of bound ids
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceStore for ResourceContainer {
    fn get(&self, id: &str) -> Option<ObjectId> {
        self.entries.get(id).map(|entry| entry.instance)
    }

    fn set(&mut self, id: &str, instance: ObjectId, class: ObjectClass) -> Result<(), DuplicateResource> {
        if let Some(existing) = self.entries.get(id) {
            if existing.class != class {
                return Err(DuplicateResource {
                    id: id.to_string(),
                    existing: existing.class.label(),
                    incoming: class.label(),
                });
            }
            if existing.instance != instance {
                log::warn!("Resource id `{}` rebound to a new {}", id, class.label());
            }
        }
        self.entries.insert(id.to_string(), ResourceEntry { instance, class });
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Option<ObjectId> {
        self.entries.remove(id).map(|entry| entry.instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(count: usize) -> Vec<ObjectId> {
        let mut map: SlotMap<ObjectId, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_different_kind_duplicate_keeps_first_binding() {
        let ids = ids(2);
        let mut container = ResourceContainer::new();
        container.set("hey", ids[0], ObjectClass::Geometry).unwrap();

        let error = container.set("hey", ids[1], ObjectClass::Material).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Two resources seem to have the same id, one geometry and another material."
        );
        assert_eq!(container.get("hey"), Some(ids[0]));
    }

    #[test]
    fn test_same_kind_duplicate_rebinds() {
        let ids = ids(2);
        let mut container = ResourceContainer::new();
        container.set("hey", ids[0], ObjectClass::Geometry).unwrap();
        container.set("hey", ids[1], ObjectClass::Geometry).unwrap();
        assert_eq!(container.get("hey"), Some(ids[1]));
    }

    #[test]
    fn test_release_ignores_stale_owner() {
        let ids = ids(2);
        let mut container = ResourceContainer::new();
        container.set("hey", ids[0], ObjectClass::Geometry).unwrap();

        assert!(!container.release("hey", ids[1]));
        assert_eq!(container.get("hey"), Some(ids[0]));
        assert!(container.release("hey", ids[0]));
        assert!(container.get("hey").is_none());
        assert!(container.is_empty());
    }
}
