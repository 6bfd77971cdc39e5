use super::object3d::declare_object_props;
use super::{constructor_f32, TypeDescriptor};
use crate::error::{HostError, HostResult};
use crate::foundation::math::Color;
use crate::kind::NodeKind;
use crate::native::{
    CameraData, LightData, LightVariant, NativeObject, ObjectBody, ObjectClass, ObjectGraph, ObjectId,
    ShadowData,
};
use crate::props::{GroupValues, PropContext, PropValue, PropertySet, Props};

/// Advisory emitted when a light gets both `intensity` and `power`
pub const INTENSITY_AND_POWER_WARNING: &str = "A light has both `intensity` and `power` parameters. \
This is not allowed, only the `power` parameter will be used.";

fn point_light_shape(light: &mut LightData, apply: impl FnOnce(&mut f32, &mut f32)) {
    if let LightVariant::Point { distance, decay } = &mut light.variant {
        apply(distance, decay);
    }
}

/// `power` wins over `intensity`; with neither, intensity falls back to 1
fn update_intensity_and_power(ctx: &mut PropContext<'_>, id: ObjectId, values: &GroupValues) -> HostResult<()> {
    let kind = ctx.kind.name();
    let intensity = values.get("intensity").map(|value| value.expect_f32(kind, "intensity")).transpose()?;
    let power = values.get("power").map(|value| value.expect_f32(kind, "power")).transpose()?;

    if power.is_some() && intensity.is_some() {
        ctx.advise(INTENSITY_AND_POWER_WARNING);
    }

    let light = ctx.graph.light_mut(id)?;
    match (power, intensity) {
        (Some(power), _) => light.set_power(power),
        (None, Some(intensity)) => light.intensity = intensity,
        (None, None) => light.intensity = 1.0,
    }
    Ok(())
}

/// Descriptor for `ambientLight`, `directionalLight` and `pointLight`
pub struct LightDescriptor {
    kind: NodeKind,
    props: PropertySet,
}

impl LightDescriptor {
    /// Descriptor for one light kind
    pub fn new(kind: NodeKind) -> Self {
        let mut props = PropertySet::new(kind);
        declare_object_props(&mut props);
        props
            .has_prop_with_default("color", Color::WHITE, |ctx, id, value| {
                let color = value.map_or(Ok(Color::WHITE), |value| value.expect_color(ctx.kind.name(), "color"))?;
                ctx.graph.light_mut(id)?.color = color;
                Ok(())
            })
            .has_prop_with_default("intensity", 1.0_f32, |ctx, id, value| {
                let intensity = value.map_or(Ok(1.0), |value| value.expect_f32(ctx.kind.name(), "intensity"))?;
                ctx.graph.light_mut(id)?.intensity = intensity;
                Ok(())
            });

        if kind == NodeKind::PointLight {
            props
                .remove_prop("intensity")
                .has_prop_group(&["intensity", "power"], update_intensity_and_power)
                .has_constructor_prop("distance", 0.0_f32, |ctx, id, value| {
                    let distance = value.map_or(Ok(0.0), |value| value.expect_f32("pointLight", "distance"))?;
                    point_light_shape(ctx.graph.light_mut(id)?, |current, _| *current = distance);
                    Ok(())
                })
                .has_constructor_prop("decay", 1.0_f32, |ctx, id, value| {
                    let decay = value.map_or(Ok(1.0), |value| value.expect_f32("pointLight", "decay"))?;
                    point_light_shape(ctx.graph.light_mut(id)?, |_, current| *current = decay);
                    Ok(())
                })
                .has_simple_prop("shadow", |ctx, id, value| {
                    let shadow = match value {
                        None | Some(PropValue::Null) => None,
                        Some(value) => Some(
                            value
                                .as_object()
                                .ok_or_else(|| HostError::invalid_value("pointLight", "shadow", "a shadow object"))?,
                        ),
                    };
                    ctx.graph.light_mut(id)?.shadow = shadow;
                    Ok(())
                })
                .wraps("shadow", ObjectClass::Shadow);
        }

        Self { kind, props }
    }
}

impl TypeDescriptor for LightDescriptor {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn properties(&self) -> &PropertySet {
        &self.props
    }

    fn create_instance(&self, graph: &mut ObjectGraph, props: &Props) -> HostResult<ObjectId> {
        let variant = match self.kind {
            NodeKind::AmbientLight => LightVariant::Ambient,
            NodeKind::DirectionalLight => LightVariant::Directional,
            _ => LightVariant::Point {
                distance: constructor_f32(props, self.kind, "distance", 0.0)?,
                decay: constructor_f32(props, self.kind, "decay", 1.0)?,
            },
        };
        let light = LightData::new(variant, Color::WHITE, 1.0);
        Ok(graph.insert(NativeObject::new(ObjectBody::Light(light))))
    }
}

/// Descriptor for `pointLightShadow`, usually passed as a light's `shadow` prop
pub struct PointLightShadowDescriptor {
    props: PropertySet,
}

impl PointLightShadowDescriptor {
    /// Create the descriptor
    pub fn new() -> Self {
        let mut props = PropertySet::new(NodeKind::PointLightShadow);
        props
            .has_prop_with_default("bias", 0.0_f32, |ctx, id, value| {
                let bias = value.map_or(Ok(0.0), |value| value.expect_f32("pointLightShadow", "bias"))?;
                ctx.graph.shadow_mut(id)?.bias = bias;
                Ok(())
            })
            .has_prop_with_default("radius", 1.0_f32, |ctx, id, value| {
                let radius = value.map_or(Ok(1.0), |value| value.expect_f32("pointLightShadow", "radius"))?;
                ctx.graph.shadow_mut(id)?.radius = radius;
                Ok(())
            })
            .has_prop_with_default("mapWidth", 512_u32, |ctx, id, value| {
                let width = value.map_or(Ok(512), |value| value.expect_u32("pointLightShadow", "mapWidth"))?;
                ctx.graph.shadow_mut(id)?.map_size[0] = width;
                Ok(())
            })
            .has_prop_with_default("mapHeight", 512_u32, |ctx, id, value| {
                let height = value.map_or(Ok(512), |value| value.expect_u32("pointLightShadow", "mapHeight"))?;
                ctx.graph.shadow_mut(id)?.map_size[1] = height;
                Ok(())
            })
            .has_prop_with_default("cameraNear", 0.5_f32, |ctx, id, value| {
                let near = value.map_or(Ok(0.5), |value| value.expect_f32("pointLightShadow", "cameraNear"))?;
                let shadow = ctx.graph.shadow_mut(id)?;
                shadow.camera_near = near;
                shadow.camera = CameraData::perspective(90.0, 1.0, near, shadow.camera_far);
                Ok(())
            })
            .has_prop_with_default("cameraFar", 500.0_f32, |ctx, id, value| {
                let far = value.map_or(Ok(500.0), |value| value.expect_f32("pointLightShadow", "cameraFar"))?;
                let shadow = ctx.graph.shadow_mut(id)?;
                shadow.camera_far = far;
                shadow.camera = CameraData::perspective(90.0, 1.0, shadow.camera_near, far);
                Ok(())
            });
        Self { props }
    }
}

impl Default for PointLightShadowDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDescriptor for PointLightShadowDescriptor {
    fn kind(&self) -> NodeKind {
        NodeKind::PointLightShadow
    }

    fn properties(&self) -> &PropertySet {
        &self.props
    }

    fn create_instance(&self, graph: &mut ObjectGraph, _props: &Props) -> HostResult<ObjectId> {
        Ok(graph.insert(NativeObject::new(ObjectBody::Shadow(ShadowData::default()))))
    }

    /// Shadows belong to a light but are bound through its `shadow` prop,
    /// not linked as a child.
    fn will_be_added_to_parent(
        &self,
        graph: &mut ObjectGraph,
        _instance: ObjectId,
        parent: ObjectId,
        _before: Option<ObjectId>,
    ) -> HostResult<()> {
        match graph.class(parent)? {
            ObjectClass::Light => Ok(()),
            other => Err(HostError::InvalidParent {
                child: NodeKind::PointLightShadow.name(),
                parent: other.label(),
            }),
        }
    }

    fn will_be_removed_from_parent(
        &self,
        graph: &mut ObjectGraph,
        instance: ObjectId,
        parent: ObjectId,
    ) -> HostResult<()> {
        let light = graph.light_mut(parent)?;
        if light.shadow == Some(instance) {
            light.shadow = None;
        }
        Ok(())
    }
}
