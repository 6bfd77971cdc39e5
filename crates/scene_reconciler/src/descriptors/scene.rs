use super::object3d::{attach_to_parent, declare_object_props};
use super::TypeDescriptor;
use crate::error::{HostError, HostResult};
use crate::kind::NodeKind;
use crate::native::{NativeObject, ObjectBody, ObjectClass, ObjectGraph, ObjectId, SceneData};
use crate::props::{PropValue, PropertySet, Props};

/// Descriptor for `scene`
pub struct SceneDescriptor {
    props: PropertySet,
}

impl SceneDescriptor {
    /// Create the descriptor
    pub fn new() -> Self {
        let mut props = PropertySet::new(NodeKind::Scene);
        declare_object_props(&mut props);
        props
            .has_simple_prop("background", |ctx, id, value| {
                let background = match value {
                    None | Some(PropValue::Null) => None,
                    Some(value) => Some(value.expect_color("scene", "background")?),
                };
                ctx.graph.scene_mut(id)?.background = background;
                Ok(())
            })
            .has_simple_prop("fog", |ctx, id, value| {
                let fog = match value {
                    None | Some(PropValue::Null) => None,
                    Some(value) => Some(
                        value
                            .as_fog()
                            .ok_or_else(|| HostError::invalid_value("scene", "fog", "fog settings"))?,
                    ),
                };
                ctx.graph.scene_mut(id)?.fog = fog;
                Ok(())
            });
        Self { props }
    }
}

impl Default for SceneDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDescriptor for SceneDescriptor {
    fn kind(&self) -> NodeKind {
        NodeKind::Scene
    }

    fn properties(&self) -> &PropertySet {
        &self.props
    }

    fn create_instance(&self, graph: &mut ObjectGraph, _props: &Props) -> HostResult<ObjectId> {
        Ok(graph.insert(NativeObject::new(ObjectBody::Scene(SceneData::default()))))
    }

    /// A scene rendered straight into a renderer or surface becomes a render
    /// root and is not linked into any graph.
    fn will_be_added_to_parent(
        &self,
        graph: &mut ObjectGraph,
        instance: ObjectId,
        parent: ObjectId,
        before: Option<ObjectId>,
    ) -> HostResult<()> {
        match graph.class(parent)? {
            ObjectClass::Renderer | ObjectClass::Surface => Ok(()),
            _ => attach_to_parent(graph, NodeKind::Scene, instance, parent, before),
        }
    }
}
