//! Type descriptors
//!
//! One [`TypeDescriptor`] per element kind defines how the kind is
//! constructed, which props it accepts and how they reach the native object,
//! and how it attaches to and detaches from a parent. The
//! [`DescriptorRegistry`] maps kinds to descriptors and is built once, then
//! shared read-only with the host.

mod camera;
mod geometry;
mod light;
mod material;
mod mesh;
mod object3d;
mod renderer;
mod resources;
mod scene;

pub use camera::{OrthographicCameraDescriptor, PerspectiveCameraDescriptor};
pub use geometry::GeometryDescriptor;
pub use light::{LightDescriptor, PointLightShadowDescriptor, INTENSITY_AND_POWER_WARNING};
pub use material::MaterialDescriptor;
pub use mesh::MeshDescriptor;
pub use object3d::Object3DDescriptor;
pub use renderer::{RenderActionDescriptor, WebGLRendererDescriptor};
pub use resources::ResourcesDescriptor;
pub use scene::SceneDescriptor;

use crate::error::{HostError, HostResult};
use crate::kind::NodeKind;
use crate::native::{ObjectGraph, ObjectId};
use crate::props::{PropContext, PropertyGroupCoordinator, PropertySet, Props};
use std::collections::HashMap;

/// Per-kind construction, prop and attachment behavior.
///
/// The provided methods implement the plain scene-node behavior: props go
/// through the kind's [`PropertySet`], attaching adds the instance to the
/// parent's child list, and disposal releases native resources.
pub trait TypeDescriptor {
    /// Kind this descriptor handles
    fn kind(&self) -> NodeKind;

    /// Declared props
    fn properties(&self) -> &PropertySet;

    /// Construct a detached native object from the constructor props
    fn create_instance(&self, graph: &mut ObjectGraph, props: &Props) -> HostResult<ObjectId>;

    /// Apply the props of a freshly created instance
    fn apply_initial_props(&self, ctx: &mut PropContext<'_>, instance: ObjectId, props: &Props) -> HostResult<()> {
        self.properties().apply_initial(ctx, instance, props)
    }

    /// Apply changed props and collect changed group members.
    ///
    /// Returns the number of simple props applied.
    fn update_props(
        &self,
        ctx: &mut PropContext<'_>,
        instance: ObjectId,
        old: &Props,
        new: &Props,
        groups: &mut PropertyGroupCoordinator,
    ) -> HostResult<usize> {
        self.properties().apply_update(ctx, instance, old, new, groups)
    }

    /// Link the instance to `parent`, before `before` when given
    fn will_be_added_to_parent(
        &self,
        graph: &mut ObjectGraph,
        instance: ObjectId,
        parent: ObjectId,
        before: Option<ObjectId>,
    ) -> HostResult<()> {
        object3d::attach_to_parent(graph, self.kind(), instance, parent, before)
    }

    /// Runs once the instance is recorded as a child of `parent`
    fn did_add_to_parent(&self, _graph: &mut ObjectGraph, _instance: ObjectId, _parent: ObjectId) -> HostResult<()> {
        Ok(())
    }

    /// Unlink the instance from `parent`
    fn will_be_removed_from_parent(
        &self,
        graph: &mut ObjectGraph,
        instance: ObjectId,
        parent: ObjectId,
    ) -> HostResult<()> {
        graph.remove_child(parent, instance)?;
        Ok(())
    }

    /// Release native resources of a detached instance
    fn dispose(&self, graph: &mut ObjectGraph, instance: ObjectId) -> HostResult<()> {
        graph.dispose(instance)
    }
}

/// Kind to descriptor lookup
#[derive(Default)]
pub struct DescriptorRegistry {
    descriptors: HashMap<NodeKind, Box<dyn TypeDescriptor>>,
}

impl DescriptorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding a descriptor for every [`NodeKind`]
    pub fn with_defaults() -> HostResult<Self> {
        let mut registry = Self::new();
        for kind in NodeKind::ALL {
            registry.register(default_descriptor(kind))?;
        }
        Ok(registry)
    }

    /// Add a descriptor, replacing any previous one for the same kind.
    ///
    /// Fails when the descriptor declares a prop twice.
    pub fn register(&mut self, descriptor: Box<dyn TypeDescriptor>) -> HostResult<()> {
        descriptor.properties().validate()?;
        let kind = descriptor.kind();
        if self.descriptors.insert(kind, descriptor).is_some() {
            log::debug!("Replaced descriptor for `{}`", kind);
        }
        Ok(())
    }

    /// Descriptor for `kind`
    pub fn get(&self, kind: NodeKind) -> HostResult<&dyn TypeDescriptor> {
        self.descriptors
            .get(&kind)
            .map(|descriptor| &**descriptor)
            .ok_or_else(|| HostError::UnknownKind(kind.name().to_string()))
    }

    /// Resolve an element kind name to its descriptor
    pub fn resolve(&self, name: &str) -> HostResult<&dyn TypeDescriptor> {
        let kind = NodeKind::from_name(name).ok_or_else(|| HostError::UnknownKind(name.to_string()))?;
        self.get(kind)
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no kind is registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl std::fmt::Debug for DescriptorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.descriptors.keys().collect();
        kinds.sort();
        f.debug_struct("DescriptorRegistry").field("kinds", &kinds).finish()
    }
}

/// Numeric constructor prop, or `default` when absent
pub(crate) fn constructor_f32(props: &Props, kind: NodeKind, name: &str, default: f32) -> HostResult<f32> {
    props
        .get(name)
        .map_or(Ok(default), |value| value.expect_f32(kind.name(), name))
}

/// Integral constructor prop, or `default` when absent
pub(crate) fn constructor_u32(props: &Props, kind: NodeKind, name: &str, default: u32) -> HostResult<u32> {
    props
        .get(name)
        .map_or(Ok(default), |value| value.expect_u32(kind.name(), name))
}

fn default_descriptor(kind: NodeKind) -> Box<dyn TypeDescriptor> {
    match kind {
        NodeKind::Object3D | NodeKind::Group => Box::new(Object3DDescriptor::new(kind)),
        NodeKind::Scene => Box::new(SceneDescriptor::new()),
        NodeKind::Mesh => Box::new(MeshDescriptor::new()),
        NodeKind::PerspectiveCamera => Box::new(PerspectiveCameraDescriptor::new()),
        NodeKind::OrthographicCamera => Box::new(OrthographicCameraDescriptor::new()),
        NodeKind::AmbientLight | NodeKind::DirectionalLight | NodeKind::PointLight => {
            Box::new(LightDescriptor::new(kind))
        }
        NodeKind::PointLightShadow => Box::new(PointLightShadowDescriptor::new()),
        NodeKind::BoxGeometry | NodeKind::SphereGeometry | NodeKind::PlaneGeometry => {
            Box::new(GeometryDescriptor::new(kind))
        }
        NodeKind::MeshBasicMaterial | NodeKind::MeshLambertMaterial | NodeKind::MeshPhongMaterial => {
            Box::new(MaterialDescriptor::new(kind))
        }
        NodeKind::WebGLRenderer => Box::new(WebGLRendererDescriptor::new()),
        NodeKind::Render => Box::new(RenderActionDescriptor::new()),
        NodeKind::Resources => Box::new(ResourcesDescriptor::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_kind() {
        let registry = DescriptorRegistry::with_defaults().unwrap();
        assert_eq!(registry.len(), NodeKind::ALL.len());
        for kind in NodeKind::ALL {
            assert_eq!(registry.get(kind).unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_fatal() {
        let registry = DescriptorRegistry::with_defaults().unwrap();
        let error = registry.resolve("teapot").err().unwrap();
        assert!(error.is_fatal());
    }

    #[test]
    fn test_missing_registration_is_unknown_kind() {
        let registry = DescriptorRegistry::new();
        assert!(matches!(registry.get(NodeKind::Mesh), Err(HostError::UnknownKind(_))));
    }
}
