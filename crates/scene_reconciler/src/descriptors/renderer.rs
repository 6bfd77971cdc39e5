use super::TypeDescriptor;
use crate::error::{HostError, HostResult};
use crate::foundation::math::Color;
use crate::kind::NodeKind;
use crate::native::{NativeObject, ObjectBody, ObjectClass, ObjectGraph, ObjectId, RenderActionData, RendererData};
use crate::props::{GroupValues, PropContext, PropValue, PropertySet, Props};

const DEFAULT_WIDTH: u32 = 300;
const DEFAULT_HEIGHT: u32 = 150;

/// Apply `width` and `height` with one resize. A member that did not change
/// keeps the current size; a removed member falls back to the default.
fn update_size(ctx: &mut PropContext<'_>, id: ObjectId, values: &GroupValues) -> HostResult<()> {
    let read = |key: &str, default: u32| -> HostResult<Option<u32>> {
        if !values.contains(key) {
            return Ok(None);
        }
        match values.get(key) {
            Some(value) => value.expect_u32("webGLRenderer", key).map(Some),
            None => Ok(Some(default)),
        }
    };
    let width = read("width", DEFAULT_WIDTH)?;
    let height = read("height", DEFAULT_HEIGHT)?;

    let renderer = ctx.graph.renderer_mut(id)?;
    let width = width.unwrap_or(renderer.width);
    let height = height.unwrap_or(renderer.height);
    renderer.set_size(width, height);
    log::trace!("Renderer {:?} resized to {}x{}", id, width, height);
    Ok(())
}

fn bound_object(value: Option<&PropValue>, prop: &str, expected: &'static str) -> HostResult<Option<ObjectId>> {
    match value {
        None | Some(PropValue::Null) => Ok(None),
        Some(value) => value
            .as_object()
            .map(Some)
            .ok_or_else(|| HostError::invalid_value("render", prop, expected)),
    }
}

/// Descriptor for `webGLRenderer`
pub struct WebGLRendererDescriptor {
    props: PropertySet,
}

impl WebGLRendererDescriptor {
    /// Create the descriptor
    pub fn new() -> Self {
        let mut props = PropertySet::new(NodeKind::WebGLRenderer);
        props
            .has_prop_group(&["width", "height"], update_size)
            .has_prop_with_default("pixelRatio", 1.0_f32, |ctx, id, value| {
                let ratio = value.map_or(Ok(1.0), |value| value.expect_f32("webGLRenderer", "pixelRatio"))?;
                ctx.graph.renderer_mut(id)?.pixel_ratio = ratio;
                Ok(())
            })
            .has_prop_with_default("clearColor", Color::BLACK, |ctx, id, value| {
                let color = value.map_or(Ok(Color::BLACK), |value| value.expect_color("webGLRenderer", "clearColor"))?;
                ctx.graph.renderer_mut(id)?.clear_color = color;
                Ok(())
            });
        Self { props }
    }
}

impl Default for WebGLRendererDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDescriptor for WebGLRendererDescriptor {
    fn kind(&self) -> NodeKind {
        NodeKind::WebGLRenderer
    }

    fn properties(&self) -> &PropertySet {
        &self.props
    }

    fn create_instance(&self, graph: &mut ObjectGraph, _props: &Props) -> HostResult<ObjectId> {
        let renderer = RendererData::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        Ok(graph.insert(NativeObject::new(ObjectBody::Renderer(renderer))))
    }

    fn will_be_added_to_parent(
        &self,
        graph: &mut ObjectGraph,
        instance: ObjectId,
        parent: ObjectId,
        _before: Option<ObjectId>,
    ) -> HostResult<()> {
        match graph.class(parent)? {
            ObjectClass::Surface => graph.add_child(parent, instance),
            other => Err(HostError::InvalidParent {
                child: NodeKind::WebGLRenderer.name(),
                parent: other.label(),
            }),
        }
    }
}

/// Descriptor for `render`: pairs a scene with a camera under a renderer
pub struct RenderActionDescriptor {
    props: PropertySet,
}

impl RenderActionDescriptor {
    /// Create the descriptor
    pub fn new() -> Self {
        let mut props = PropertySet::new(NodeKind::Render);
        props
            .has_simple_prop("camera", |ctx, id, value| {
                let camera = bound_object(value, "camera", "a camera")?;
                ctx.graph.render_action_mut(id)?.camera = camera;
                Ok(())
            })
            .has_simple_prop("scene", |ctx, id, value| {
                let scene = bound_object(value, "scene", "a scene")?;
                ctx.graph.render_action_mut(id)?.scene = scene;
                Ok(())
            })
            .wraps("camera", ObjectClass::Camera)
            .wraps("scene", ObjectClass::Scene);
        Self { props }
    }
}

impl Default for RenderActionDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDescriptor for RenderActionDescriptor {
    fn kind(&self) -> NodeKind {
        NodeKind::Render
    }

    fn properties(&self) -> &PropertySet {
        &self.props
    }

    fn create_instance(&self, graph: &mut ObjectGraph, _props: &Props) -> HostResult<ObjectId> {
        Ok(graph.insert(NativeObject::new(ObjectBody::RenderAction(RenderActionData::default()))))
    }

    fn will_be_added_to_parent(
        &self,
        graph: &mut ObjectGraph,
        instance: ObjectId,
        parent: ObjectId,
        before: Option<ObjectId>,
    ) -> HostResult<()> {
        match (graph.class(parent)?, before) {
            (ObjectClass::Renderer, Some(before)) => graph.insert_child_before(parent, instance, before),
            (ObjectClass::Renderer, None) => graph.add_child(parent, instance),
            (other, _) => Err(HostError::InvalidParent {
                child: NodeKind::Render.name(),
                parent: other.label(),
            }),
        }
    }
}
