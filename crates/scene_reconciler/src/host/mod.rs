//! Host-config core
//!
//! [`HostConfig`] is the contract a tree reconciler drives: create instances,
//! attach and detach them, diff and commit prop updates, and mark commit
//! boundaries. [`SceneHost`] implements it on top of the descriptor registry
//! and the native object graph.

mod diagnostics;
mod record;
mod scene_host;

pub use diagnostics::Diagnostics;
pub use record::LiveInstanceRecord;
pub use scene_host::{SceneChanges, SceneHost};

use crate::element::Element;
use std::fmt::Debug;

/// Outcome of diffing an element against the one its instance was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePayload {
    /// Nothing to apply
    Unchanged,
    /// Props, ref or resource id changed; `commit_update` must run
    Changed,
    /// A constructor-only prop changed; the instance has to be rebuilt
    Remount,
}

/// Operations a tree reconciler needs from the host environment
pub trait HostConfig {
    /// Handle to a host instance
    type Instance: Copy + Eq + Debug;
    /// Error raised by host operations
    type Error;

    /// Construct a detached instance for `element` and apply its initial props
    fn create_instance(&mut self, element: &Element) -> Result<Self::Instance, Self::Error>;

    /// Attach `child` as the last child of `parent`
    fn append_child(&mut self, parent: Self::Instance, child: Self::Instance) -> Result<(), Self::Error>;

    /// Attach `child` to `parent` right before `before`
    fn insert_before(
        &mut self,
        parent: Self::Instance,
        child: Self::Instance,
        before: Self::Instance,
    ) -> Result<(), Self::Error>;

    /// Detach `child` and everything below it, then dispose them
    fn remove_child(&mut self, parent: Self::Instance, child: Self::Instance) -> Result<(), Self::Error>;

    /// Called once the initial children of a new instance are attached
    fn finalize_initial_children(
        &mut self,
        _instance: Self::Instance,
        _element: &Element,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Diff `new` against `old` for an existing instance
    fn prepare_update(&self, instance: Self::Instance, old: &Element, new: &Element) -> UpdatePayload;

    /// Apply the changes between `old` and `new`; at most once per instance per commit
    fn commit_update(
        &mut self,
        instance: Self::Instance,
        old: &Element,
        new: &Element,
    ) -> Result<(), Self::Error>;

    /// Value exposed to callers for an instance
    fn get_public_instance(&self, instance: Self::Instance) -> Self::Instance {
        instance
    }

    /// A commit is about to start
    fn prepare_for_commit(&mut self);

    /// The commit finished; flush anything batched during it
    fn reset_after_commit(&mut self) -> Result<(), Self::Error>;
}
