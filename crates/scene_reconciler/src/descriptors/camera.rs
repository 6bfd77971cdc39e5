use super::object3d::declare_object_props;
use super::{constructor_f32, TypeDescriptor};
use crate::error::HostResult;
use crate::kind::NodeKind;
use crate::native::{CameraData, NativeObject, ObjectBody, ObjectGraph, ObjectId, Projection};
use crate::props::{PropContext, PropValue, PropertySet, Props};

/// Set one projection parameter and rebuild the projection matrix
fn set_projection(
    ctx: &mut PropContext<'_>,
    id: ObjectId,
    name: &'static str,
    value: Option<&PropValue>,
    default: f32,
    apply: impl Fn(&mut Projection, f32),
) -> HostResult<()> {
    let value = match value {
        Some(value) => value.expect_f32(ctx.kind.name(), name)?,
        None => default,
    };
    let camera = ctx.graph.camera_mut(id)?;
    apply(&mut camera.projection, value);
    if !camera.update_projection_matrix() {
        ctx.advise(format!(
            "`{}` = {} gives a degenerate projection on `{}`; keeping the previous matrix",
            name,
            value,
            ctx.kind.name()
        ));
    }
    Ok(())
}

macro_rules! projection_prop {
    ($props:expr, $variant:ident, $name:literal, $field:ident, $default:expr) => {
        $props.has_constructor_prop($name, $default, |ctx, id, value| {
            set_projection(ctx, id, $name, value, $default, |projection, x| {
                if let Projection::$variant { $field, .. } = projection {
                    *$field = x;
                }
            })
        });
    };
}

/// Descriptor for `perspectiveCamera`
pub struct PerspectiveCameraDescriptor {
    props: PropertySet,
}

impl PerspectiveCameraDescriptor {
    /// Create the descriptor
    pub fn new() -> Self {
        let mut props = PropertySet::new(NodeKind::PerspectiveCamera);
        declare_object_props(&mut props);
        projection_prop!(props, Perspective, "fov", fov, 50.0_f32);
        projection_prop!(props, Perspective, "aspect", aspect, 1.0_f32);
        projection_prop!(props, Perspective, "near", near, 0.1_f32);
        projection_prop!(props, Perspective, "far", far, 2000.0_f32);
        Self { props }
    }
}

impl Default for PerspectiveCameraDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDescriptor for PerspectiveCameraDescriptor {
    fn kind(&self) -> NodeKind {
        NodeKind::PerspectiveCamera
    }

    fn properties(&self) -> &PropertySet {
        &self.props
    }

    fn create_instance(&self, graph: &mut ObjectGraph, props: &Props) -> HostResult<ObjectId> {
        let kind = NodeKind::PerspectiveCamera;
        let camera = CameraData::perspective(
            constructor_f32(props, kind, "fov", 50.0)?,
            constructor_f32(props, kind, "aspect", 1.0)?,
            constructor_f32(props, kind, "near", 0.1)?,
            constructor_f32(props, kind, "far", 2000.0)?,
        );
        Ok(graph.insert(NativeObject::new(ObjectBody::Camera(camera))))
    }
}

/// Descriptor for `orthographicCamera`
pub struct OrthographicCameraDescriptor {
    props: PropertySet,
}

impl OrthographicCameraDescriptor {
    /// Create the descriptor
    pub fn new() -> Self {
        let mut props = PropertySet::new(NodeKind::OrthographicCamera);
        declare_object_props(&mut props);
        projection_prop!(props, Orthographic, "left", left, -1.0_f32);
        projection_prop!(props, Orthographic, "right", right, 1.0_f32);
        projection_prop!(props, Orthographic, "top", top, 1.0_f32);
        projection_prop!(props, Orthographic, "bottom", bottom, -1.0_f32);
        projection_prop!(props, Orthographic, "near", near, 0.1_f32);
        projection_prop!(props, Orthographic, "far", far, 2000.0_f32);
        Self { props }
    }
}

impl Default for OrthographicCameraDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDescriptor for OrthographicCameraDescriptor {
    fn kind(&self) -> NodeKind {
        NodeKind::OrthographicCamera
    }

    fn properties(&self) -> &PropertySet {
        &self.props
    }

    fn create_instance(&self, graph: &mut ObjectGraph, props: &Props) -> HostResult<ObjectId> {
        let kind = NodeKind::OrthographicCamera;
        let camera = CameraData::orthographic(
            constructor_f32(props, kind, "left", -1.0)?,
            constructor_f32(props, kind, "right", 1.0)?,
            constructor_f32(props, kind, "top", 1.0)?,
            constructor_f32(props, kind, "bottom", -1.0)?,
            constructor_f32(props, kind, "near", 0.1)?,
            constructor_f32(props, kind, "far", 2000.0)?,
        );
        Ok(graph.insert(NativeObject::new(ObjectBody::Camera(camera))))
    }
}
