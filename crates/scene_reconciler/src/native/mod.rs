//! Native object graph
//!
//! The retained-mode object graph the host-config core mutates. It stands in
//! for the external 3D engine: objects live in a slot map, hold a single
//! parent and an ordered child list, and release their GPU-side resources when
//! disposed. Disposed objects stay readable until [`ObjectGraph::purge_disposed`]
//! so callers holding an id can still inspect what they had.

mod object;

pub use object::{
    CameraData, FrameSubmission, GeometryData, GeometryShape, LightData, LightVariant,
    MaterialData, MaterialModel, MeshData, NativeObject, ObjectBody, ObjectClass, Projection,
    RenderActionData, RendererData, SceneData, ShadowData, SurfaceData,
};

use crate::error::{HostError, HostResult};
use crate::foundation::math::Mat4;
use crate::resources::ResourceContainer;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a native object
    pub struct ObjectId;
}

/// Generates typed accessors for one [`ObjectBody`] variant
macro_rules! body_accessors {
    ($($get:ident, $get_mut:ident => $variant:ident($data:ty), $expected:literal;)*) => {
        $(
            #[doc = concat!("Borrow the ", $expected, " data of an object")]
            pub fn $get(&self, id: ObjectId) -> HostResult<&$data> {
                match &self.object(id)?.body {
                    ObjectBody::$variant(data) => Ok(data),
                    other => Err(HostError::WrongClass {
                        id,
                        expected: $expected,
                        found: other.class().label(),
                    }),
                }
            }

            #[doc = concat!("Mutably borrow the ", $expected, " data of an object")]
            pub fn $get_mut(&mut self, id: ObjectId) -> HostResult<&mut $data> {
                match &mut self.object_mut(id)?.body {
                    ObjectBody::$variant(data) => Ok(data),
                    other => Err(HostError::WrongClass {
                        id,
                        expected: $expected,
                        found: other.class().label(),
                    }),
                }
            }
        )*
    };
}

/// Arena of native objects
#[derive(Debug, Default)]
pub struct ObjectGraph {
    objects: SlotMap<ObjectId, NativeObject>,
}

impl ObjectGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a detached object
    pub fn insert(&mut self, object: NativeObject) -> ObjectId {
        self.objects.insert(object)
    }

    /// Look up an object
    pub fn get(&self, id: ObjectId) -> Option<&NativeObject> {
        self.objects.get(id)
    }

    /// Look up an object, failing on stale ids
    pub fn object(&self, id: ObjectId) -> HostResult<&NativeObject> {
        self.objects.get(id).ok_or(HostError::MissingObject(id))
    }

    /// Mutably look up an object, failing on stale ids
    pub fn object_mut(&mut self, id: ObjectId) -> HostResult<&mut NativeObject> {
        self.objects.get_mut(id).ok_or(HostError::MissingObject(id))
    }

    /// Class of an object
    pub fn class(&self, id: ObjectId) -> HostResult<ObjectClass> {
        Ok(self.object(id)?.class())
    }

    /// Scene-graph parent of an object
    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.objects.get(id).and_then(|object| object.parent)
    }

    /// Scene-graph children of an object
    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.objects
            .get(id)
            .map(|object| object.children.as_slice())
            .unwrap_or(&[])
    }

    /// Number of objects held, disposed ones included
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the graph holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Append `child` to `parent`, detaching it from any previous parent first
    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> HostResult<()> {
        self.place_child(parent, child, None)
    }

    /// Insert `child` into `parent` right before `before`.
    ///
    /// Falls back to appending when `before` is not a child of `parent`.
    pub fn insert_child_before(
        &mut self,
        parent: ObjectId,
        child: ObjectId,
        before: ObjectId,
    ) -> HostResult<()> {
        self.place_child(parent, child, Some(before))
    }

    fn place_child(
        &mut self,
        parent: ObjectId,
        child: ObjectId,
        before: Option<ObjectId>,
    ) -> HostResult<()> {
        self.object(parent)?;
        if let Some(previous) = self.object(child)?.parent {
            self.remove_child(previous, child)?;
        }

        let siblings = &mut self.object_mut(parent)?.children;
        let index = before
            .and_then(|before| siblings.iter().position(|&sibling| sibling == before))
            .unwrap_or(siblings.len());
        siblings.insert(index, child);

        self.object_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Remove `child` from `parent`'s child list and clear its parent.
    ///
    /// Returns `false` when `child` was not a child of `parent`.
    pub fn remove_child(&mut self, parent: ObjectId, child: ObjectId) -> HostResult<bool> {
        let siblings = &mut self.object_mut(parent)?.children;
        let Some(index) = siblings.iter().position(|&sibling| sibling == child) else {
            return Ok(false);
        };
        siblings.remove(index);

        let child = self.object_mut(child)?;
        if child.parent == Some(parent) {
            child.parent = None;
        }
        Ok(true)
    }

    /// Release the GPU-side resources of a detached object
    pub fn dispose(&mut self, id: ObjectId) -> HostResult<()> {
        let object = self.object_mut(id)?;
        if object.parent.is_some() {
            return Err(HostError::DisposeWhileAttached(id));
        }
        object.mark_disposed();
        log::trace!("Disposed native {} {:?}", object.class().label(), id);
        Ok(())
    }

    /// Whether an object was disposed (stale ids count as disposed)
    pub fn is_disposed(&self, id: ObjectId) -> bool {
        self.objects.get(id).map_or(true, NativeObject::is_disposed)
    }

    /// Drop every disposed object, returning how many were removed
    pub fn purge_disposed(&mut self) -> usize {
        let before = self.objects.len();
        self.objects.retain(|_, object| !object.disposed);
        before - self.objects.len()
    }

    /// Depth-first pre-order walk of the scene graph below `root`, `root` included
    pub fn traverse(&self, root: ObjectId) -> Vec<ObjectId> {
        let mut visited = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(object) = self.objects.get(id) else {
                continue;
            };
            visited.push(id);
            stack.extend(object.children.iter().rev().copied());
        }
        visited
    }

    /// World matrix of an object, composed through its scene-graph ancestors
    pub fn world_matrix(&self, id: ObjectId) -> HostResult<Mat4> {
        let mut matrix = self.object(id)?.transform.to_matrix();
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            let object = self.object(ancestor)?;
            if object.class().is_scene_node() {
                matrix = object.transform.to_matrix() * matrix;
            }
            current = object.parent;
        }
        Ok(matrix)
    }

    /// Live renderers, in insertion order
    pub fn renderers(&self) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, object)| !object.disposed && matches!(object.body, ObjectBody::Renderer(_)))
            .map(|(id, _)| id)
            .collect()
    }

    /// Hand one frame of `scene` seen through `camera` to `renderer`
    pub fn submit_frame(
        &mut self,
        renderer: ObjectId,
        scene: ObjectId,
        camera: ObjectId,
    ) -> HostResult<FrameSubmission> {
        self.camera(camera)?;
        let draw_count = self
            .traverse(scene)
            .into_iter()
            .filter(|&id| self.is_drawable(id))
            .count();

        let frame = FrameSubmission { scene, camera, draw_count };
        self.renderer_mut(renderer)?.frames.push(frame);
        log::trace!("Renderer {:?} submitted frame with {} draws", renderer, draw_count);
        Ok(frame)
    }

    fn is_drawable(&self, id: ObjectId) -> bool {
        let Some(object) = self.objects.get(id) else {
            return false;
        };
        match &object.body {
            ObjectBody::Mesh(mesh) => {
                object.visible && mesh.geometry.is_some() && mesh.material.is_some()
            }
            _ => false,
        }
    }

    body_accessors! {
        scene, scene_mut => Scene(SceneData), "scene";
        mesh, mesh_mut => Mesh(MeshData), "mesh";
        camera, camera_mut => Camera(CameraData), "camera";
        light, light_mut => Light(LightData), "light";
        geometry, geometry_mut => Geometry(GeometryData), "geometry";
        material, material_mut => Material(MaterialData), "material";
        shadow, shadow_mut => Shadow(ShadowData), "shadow";
        renderer, renderer_mut => Renderer(RendererData), "renderer";
        render_action, render_action_mut => RenderAction(RenderActionData), "render action";
        resources, resources_mut => Resources(ResourceContainer), "resource container";
    }
}
