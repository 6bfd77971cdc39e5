//! Keyed resource containers
//!
//! Elements carrying a resource id register the instance they produce with the
//! nearest `resources` container so other parts of the tree can look it up.

mod container;

pub use container::ResourceContainer;

use crate::native::{ObjectClass, ObjectId};
use thiserror::Error;

/// Two instances of different classes claimed the same resource id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Two resources seem to have the same id, one {existing} and another {incoming}.")]
pub struct DuplicateResource {
    /// Contested id
    pub id: String,
    /// Class label of the binding that stays
    pub existing: &'static str,
    /// Class label of the rejected instance
    pub incoming: &'static str,
}

/// Registry of constructed instances keyed by resource id
pub trait ResourceStore {
    /// Instance bound to `id`
    fn get(&self, id: &str) -> Option<ObjectId>;

    /// Bind `id` to `instance`.
    ///
    /// Fails when `id` is already bound to an instance of a different class;
    /// the existing binding is kept.
    fn set(&mut self, id: &str, instance: ObjectId, class: ObjectClass) -> Result<(), DuplicateResource>;

    /// Unbind `id`, returning the instance it pointed at
    fn remove(&mut self, id: &str) -> Option<ObjectId>;
}
