use super::TypeDescriptor;
use crate::error::{HostError, HostResult};
use crate::kind::NodeKind;
use crate::native::{NativeObject, ObjectBody, ObjectClass, ObjectGraph, ObjectId};
use crate::props::{PropertySet, Props};

/// Declare the props every scene node accepts
pub(crate) fn declare_object_props(props: &mut PropertySet) {
    props
        .has_prop_with_default("name", "", |ctx, id, value| {
            let name = match value {
                Some(value) => value.expect_text(ctx.kind.name(), "name")?.to_string(),
                None => String::new(),
            };
            ctx.graph.object_mut(id)?.name = name;
            Ok(())
        })
        .has_simple_prop("position", |ctx, id, value| {
            let position = match value {
                Some(value) => value.expect_vector(ctx.kind.name(), "position")?,
                None => crate::foundation::math::Vec3::zeros(),
            };
            ctx.graph.object_mut(id)?.transform.position = position;
            Ok(())
        })
        .has_simple_prop("rotation", |ctx, id, value| {
            let euler = match value {
                Some(value) => value.expect_vector(ctx.kind.name(), "rotation")?,
                None => crate::foundation::math::Vec3::zeros(),
            };
            ctx.graph.object_mut(id)?.transform.set_euler(euler);
            Ok(())
        })
        .has_simple_prop("scale", |ctx, id, value| {
            let scale = match value {
                Some(value) => value.expect_vector(ctx.kind.name(), "scale")?,
                None => crate::foundation::math::Vec3::new(1.0, 1.0, 1.0),
            };
            ctx.graph.object_mut(id)?.transform.scale = scale;
            Ok(())
        })
        .has_prop_with_default("visible", true, |ctx, id, value| {
            let visible = value.map_or(Ok(true), |value| value.expect_bool(ctx.kind.name(), "visible"))?;
            ctx.graph.object_mut(id)?.visible = visible;
            Ok(())
        })
        .has_prop_with_default("castShadow", false, |ctx, id, value| {
            let cast = value.map_or(Ok(false), |value| value.expect_bool(ctx.kind.name(), "castShadow"))?;
            ctx.graph.object_mut(id)?.cast_shadow = cast;
            Ok(())
        })
        .has_prop_with_default("receiveShadow", false, |ctx, id, value| {
            let receive = value.map_or(Ok(false), |value| value.expect_bool(ctx.kind.name(), "receiveShadow"))?;
            ctx.graph.object_mut(id)?.receive_shadow = receive;
            Ok(())
        });
}

/// Default attach rule for scene nodes.
///
/// Scene nodes and render actions take the instance as a native child. A
/// surface holds top-level objects without linking them. Anything else cannot
/// be a parent.
pub(crate) fn attach_to_parent(
    graph: &mut ObjectGraph,
    kind: NodeKind,
    instance: ObjectId,
    parent: ObjectId,
    before: Option<ObjectId>,
) -> HostResult<()> {
    let class = graph.class(parent)?;
    if class.is_scene_node() || class == ObjectClass::RenderAction {
        return match before {
            Some(before) => graph.insert_child_before(parent, instance, before),
            None => graph.add_child(parent, instance),
        };
    }
    if class == ObjectClass::Surface {
        return Ok(());
    }
    Err(HostError::InvalidParent {
        child: kind.name(),
        parent: class.label(),
    })
}

/// Descriptor for `object3D` and `group`
pub struct Object3DDescriptor {
    kind: NodeKind,
    props: PropertySet,
}

impl Object3DDescriptor {
    /// Descriptor for a plain transform node kind
    pub fn new(kind: NodeKind) -> Self {
        let mut props = PropertySet::new(kind);
        declare_object_props(&mut props);
        Self { kind, props }
    }
}

impl TypeDescriptor for Object3DDescriptor {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn properties(&self) -> &PropertySet {
        &self.props
    }

    fn create_instance(&self, graph: &mut ObjectGraph, _props: &Props) -> HostResult<ObjectId> {
        Ok(graph.insert(NativeObject::new(ObjectBody::Group)))
    }
}
