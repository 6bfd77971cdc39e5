use super::object3d::declare_object_props;
use super::TypeDescriptor;
use crate::error::HostResult;
use crate::kind::NodeKind;
use crate::native::{MeshData, NativeObject, ObjectBody, ObjectGraph, ObjectId};
use crate::props::{PropertySet, Props};

/// Descriptor for `mesh`. Geometry and material arrive as children.
pub struct MeshDescriptor {
    props: PropertySet,
}

impl MeshDescriptor {
    /// Create the descriptor
    pub fn new() -> Self {
        let mut props = PropertySet::new(NodeKind::Mesh);
        declare_object_props(&mut props);
        Self { props }
    }
}

impl Default for MeshDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDescriptor for MeshDescriptor {
    fn kind(&self) -> NodeKind {
        NodeKind::Mesh
    }

    fn properties(&self) -> &PropertySet {
        &self.props
    }

    fn create_instance(&self, graph: &mut ObjectGraph, _props: &Props) -> HostResult<ObjectId> {
        Ok(graph.insert(NativeObject::new(ObjectBody::Mesh(MeshData::default()))))
    }
}
