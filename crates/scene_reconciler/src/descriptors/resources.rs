use super::TypeDescriptor;
use crate::error::HostResult;
use crate::kind::NodeKind;
use crate::native::{NativeObject, ObjectBody, ObjectGraph, ObjectId};
use crate::props::{PropertySet, Props};
use crate::resources::ResourceContainer;

/// Descriptor for `resources`.
///
/// The container is bookkeeping only: it never links into the native graph,
/// and its children register with it by resource id instead of attaching.
pub struct ResourcesDescriptor {
    props: PropertySet,
}

impl ResourcesDescriptor {
    /// Create the descriptor
    pub fn new() -> Self {
        Self {
            props: PropertySet::new(NodeKind::Resources),
        }
    }
}

impl Default for ResourcesDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDescriptor for ResourcesDescriptor {
    fn kind(&self) -> NodeKind {
        NodeKind::Resources
    }

    fn properties(&self) -> &PropertySet {
        &self.props
    }

    fn create_instance(&self, graph: &mut ObjectGraph, _props: &Props) -> HostResult<ObjectId> {
        Ok(graph.insert(NativeObject::new(ObjectBody::Resources(ResourceContainer::new()))))
    }

    fn will_be_added_to_parent(
        &self,
        _graph: &mut ObjectGraph,
        _instance: ObjectId,
        _parent: ObjectId,
        _before: Option<ObjectId>,
    ) -> HostResult<()> {
        Ok(())
    }

    fn will_be_removed_from_parent(
        &self,
        _graph: &mut ObjectGraph,
        _instance: ObjectId,
        _parent: ObjectId,
    ) -> HostResult<()> {
        Ok(())
    }
}
