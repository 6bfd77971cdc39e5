use super::{constructor_f32, constructor_u32, TypeDescriptor};
use crate::error::{HostError, HostResult};
use crate::kind::NodeKind;
use crate::native::{GeometryData, GeometryShape, NativeObject, ObjectBody, ObjectClass, ObjectGraph, ObjectId};
use crate::props::{PropertySet, Props};

/// Descriptor for `boxGeometry`, `sphereGeometry` and `planeGeometry`.
///
/// Every dimension is constructor-only: changing one rebuilds the geometry.
pub struct GeometryDescriptor {
    kind: NodeKind,
    props: PropertySet,
}

impl GeometryDescriptor {
    /// Descriptor for one geometry kind
    pub fn new(kind: NodeKind) -> Self {
        let mut props = PropertySet::new(kind);
        let dimensions: &[&'static str] = match kind {
            NodeKind::BoxGeometry => &[
                "width",
                "height",
                "depth",
                "widthSegments",
                "heightSegments",
                "depthSegments",
            ],
            NodeKind::SphereGeometry => &["radius", "widthSegments", "heightSegments"],
            _ => &["width", "height", "widthSegments", "heightSegments"],
        };
        for &name in dimensions {
            props.has_constructor_only_prop(name);
        }
        Self { kind, props }
    }

    fn shape(&self, props: &Props) -> HostResult<GeometryShape> {
        let kind = self.kind;
        let shape = match kind {
            NodeKind::BoxGeometry => GeometryShape::Box {
                width: constructor_f32(props, kind, "width", 1.0)?,
                height: constructor_f32(props, kind, "height", 1.0)?,
                depth: constructor_f32(props, kind, "depth", 1.0)?,
                width_segments: constructor_u32(props, kind, "widthSegments", 1)?,
                height_segments: constructor_u32(props, kind, "heightSegments", 1)?,
                depth_segments: constructor_u32(props, kind, "depthSegments", 1)?,
            },
            NodeKind::SphereGeometry => GeometryShape::Sphere {
                radius: constructor_f32(props, kind, "radius", 1.0)?,
                width_segments: constructor_u32(props, kind, "widthSegments", 8)?,
                height_segments: constructor_u32(props, kind, "heightSegments", 6)?,
            },
            _ => GeometryShape::Plane {
                width: constructor_f32(props, kind, "width", 1.0)?,
                height: constructor_f32(props, kind, "height", 1.0)?,
                width_segments: constructor_u32(props, kind, "widthSegments", 1)?,
                height_segments: constructor_u32(props, kind, "heightSegments", 1)?,
            },
        };
        Ok(shape)
    }
}

impl TypeDescriptor for GeometryDescriptor {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn properties(&self) -> &PropertySet {
        &self.props
    }

    fn create_instance(&self, graph: &mut ObjectGraph, props: &Props) -> HostResult<ObjectId> {
        let geometry = GeometryData::new(self.shape(props)?);
        log::trace!("Built {} with {} vertices", self.kind, geometry.vertex_count());
        Ok(graph.insert(NativeObject::new(ObjectBody::Geometry(geometry))))
    }

    fn will_be_added_to_parent(
        &self,
        graph: &mut ObjectGraph,
        instance: ObjectId,
        parent: ObjectId,
        _before: Option<ObjectId>,
    ) -> HostResult<()> {
        match graph.class(parent)? {
            ObjectClass::Mesh => {
                graph.mesh_mut(parent)?.geometry = Some(instance);
                Ok(())
            }
            other => Err(HostError::InvalidParent {
                child: self.kind.name(),
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
        let mesh = graph.mesh_mut(parent)?;
        if mesh.geometry == Some(instance) {
            mesh.geometry = None;
        }
        Ok(())
    }
}
