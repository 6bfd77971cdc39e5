//! Native object model
//!
//! Plain data for every object class the descriptors construct. Behavior that
//! touches more than one object lives on [`super::ObjectGraph`].

use super::ObjectId;
use crate::foundation::math::{utils, Color, Fog, Mat4, Transform};
use crate::resources::ResourceContainer;
use nalgebra::{Orthographic3, Perspective3};

/// Broad class of a native object, used for attachment rules and resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    /// Transform node or group
    Object3D,
    /// Scene root
    Scene,
    /// Drawable mesh
    Mesh,
    /// Camera
    Camera,
    /// Light
    Light,
    /// Vertex data
    Geometry,
    /// Surface shading
    Material,
    /// Light shadow settings
    Shadow,
    /// Renderer
    Renderer,
    /// Scene + camera pairing submitted by a renderer
    RenderAction,
    /// Keyed resource container
    Resources,
    /// Top-level drawing surface (canvas)
    Surface,
}

impl ObjectClass {
    /// Lower-case label used in messages
    pub fn label(self) -> &'static str {
        match self {
            Self::Object3D => "object",
            Self::Scene => "scene",
            Self::Mesh => "mesh",
            Self::Camera => "camera",
            Self::Light => "light",
            Self::Geometry => "geometry",
            Self::Material => "material",
            Self::Shadow => "shadow",
            Self::Renderer => "renderer",
            Self::RenderAction => "render action",
            Self::Resources => "resource container",
            Self::Surface => "surface",
        }
    }

    /// Whether objects of this class take part in the scene graph hierarchy
    pub fn is_scene_node(self) -> bool {
        matches!(
            self,
            Self::Object3D | Self::Scene | Self::Mesh | Self::Camera | Self::Light
        )
    }
}

/// Scene settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneData {
    /// Clear color drawn behind the scene
    pub background: Option<Color>,
    /// Distance fog
    pub fog: Option<Fog>,
}

/// Mesh bindings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshData {
    /// Bound geometry
    pub geometry: Option<ObjectId>,
    /// Bound material
    pub material: Option<ObjectId>,
}

/// Camera projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in degrees
        fov: f32,
        /// Width / height
        aspect: f32,
        /// Near clip distance
        near: f32,
        /// Far clip distance
        far: f32,
    },
    /// Orthographic projection
    Orthographic {
        /// Left plane
        left: f32,
        /// Right plane
        right: f32,
        /// Top plane
        top: f32,
        /// Bottom plane
        bottom: f32,
        /// Near clip distance
        near: f32,
        /// Far clip distance
        far: f32,
    },
}

/// Camera state
#[derive(Debug, Clone, PartialEq)]
pub struct CameraData {
    /// Projection parameters
    pub projection: Projection,
    projection_matrix: Mat4,
}

impl CameraData {
    /// Perspective camera with its projection matrix computed
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::with_projection(Projection::Perspective { fov, aspect, near, far })
    }

    /// Orthographic camera with its projection matrix computed
    pub fn orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        Self::with_projection(Projection::Orthographic { left, right, top, bottom, near, far })
    }

    fn with_projection(projection: Projection) -> Self {
        let mut camera = Self {
            projection,
            projection_matrix: Mat4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// Current projection matrix
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Recompute the projection matrix from the parameters.
    ///
    /// Degenerate parameters (zero aspect, empty depth range) keep the previous
    /// matrix and return `false`.
    pub fn update_projection_matrix(&mut self) -> bool {
        match self.projection {
            Projection::Perspective { fov, aspect, near, far } => {
                if aspect.abs() <= f32::EPSILON || (far - near).abs() <= f32::EPSILON {
                    return false;
                }
                self.projection_matrix =
                    Perspective3::new(aspect, utils::deg_to_rad(fov), near, far).to_homogeneous();
            }
            Projection::Orthographic { left, right, top, bottom, near, far } => {
                if (right - left).abs() <= f32::EPSILON
                    || (top - bottom).abs() <= f32::EPSILON
                    || (far - near).abs() <= f32::EPSILON
                {
                    return false;
                }
                self.projection_matrix =
                    Orthographic3::new(left, right, bottom, top, near, far).to_homogeneous();
            }
        }
        true
    }
}

/// Light-specific parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightVariant {
    /// Ambient light
    Ambient,
    /// Directional light
    Directional,
    /// Point light with falloff
    Point {
        /// Maximum range, 0 for unlimited
        distance: f32,
        /// Falloff exponent
        decay: f32,
    },
}

/// Light state
#[derive(Debug, Clone, PartialEq)]
pub struct LightData {
    /// Light-specific parameters
    pub variant: LightVariant,
    /// Light color
    pub color: Color,
    /// Intensity multiplier
    pub intensity: f32,
    /// Shadow settings object
    pub shadow: Option<ObjectId>,
}

impl LightData {
    /// Create light data
    pub fn new(variant: LightVariant, color: Color, intensity: f32) -> Self {
        Self {
            variant,
            color,
            intensity,
            shadow: None,
        }
    }

    /// Luminous power, defined for point lights as `intensity * 4π`
    pub fn power(&self) -> Option<f32> {
        match self.variant {
            LightVariant::Point { .. } => Some(self.intensity * 4.0 * std::f32::consts::PI),
            _ => None,
        }
    }

    /// Set luminous power by rescaling intensity. Ignored for non-point lights.
    pub fn set_power(&mut self, power: f32) {
        if let LightVariant::Point { .. } = self.variant {
            self.intensity = power / (4.0 * std::f32::consts::PI);
        }
    }
}

/// Shadow map settings
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowData {
    /// Depth bias
    pub bias: f32,
    /// Blur radius
    pub radius: f32,
    /// Shadow map resolution
    pub map_size: [u32; 2],
    /// Shadow camera near plane
    pub camera_near: f32,
    /// Shadow camera far plane
    pub camera_far: f32,
    /// Shadow camera projection, rebuilt when the near/far planes change
    pub camera: CameraData,
    /// Whether the shadow map texture is allocated
    pub map_allocated: bool,
}

impl Default for ShadowData {
    fn default() -> Self {
        Self {
            bias: 0.0,
            radius: 1.0,
            map_size: [512, 512],
            camera_near: 0.5,
            camera_far: 500.0,
            camera: CameraData::perspective(90.0, 1.0, 0.5, 500.0),
            map_allocated: true,
        }
    }
}

/// Geometry shape parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryShape {
    /// Box
    Box {
        /// Size along X
        width: f32,
        /// Size along Y
        height: f32,
        /// Size along Z
        depth: f32,
        /// Segments along X
        width_segments: u32,
        /// Segments along Y
        height_segments: u32,
        /// Segments along Z
        depth_segments: u32,
    },
    /// UV sphere
    Sphere {
        /// Radius
        radius: f32,
        /// Horizontal segments
        width_segments: u32,
        /// Vertical segments
        height_segments: u32,
    },
    /// Plane in XY
    Plane {
        /// Size along X
        width: f32,
        /// Size along Y
        height: f32,
        /// Segments along X
        width_segments: u32,
        /// Segments along Y
        height_segments: u32,
    },
}

/// Geometry state
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Shape parameters
    pub shape: GeometryShape,
    /// Whether vertex buffers are resident on the GPU
    pub buffers_resident: bool,
}

impl GeometryData {
    /// Create geometry with resident buffers
    pub fn new(shape: GeometryShape) -> Self {
        Self {
            shape,
            buffers_resident: true,
        }
    }

    /// Number of vertices the shape generates
    pub fn vertex_count(&self) -> usize {
        let grid = |a: u32, b: u32| (a as usize + 1) * (b as usize + 1);
        match self.shape {
            GeometryShape::Box { width_segments, height_segments, depth_segments, .. } => {
                2 * (grid(width_segments, height_segments)
                    + grid(depth_segments, height_segments)
                    + grid(width_segments, depth_segments))
            }
            GeometryShape::Sphere { width_segments, height_segments, .. }
            | GeometryShape::Plane { width_segments, height_segments, .. } => {
                grid(width_segments, height_segments)
            }
        }
    }
}

/// Shading model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialModel {
    /// Unlit
    Basic,
    /// Diffuse only
    Lambert {
        /// Self-illumination color
        emissive: Color,
    },
    /// Diffuse + specular
    Phong {
        /// Self-illumination color
        emissive: Color,
        /// Highlight color
        specular: Color,
        /// Highlight exponent
        shininess: f32,
    },
}

/// Material state
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialData {
    /// Shading model
    pub model: MaterialModel,
    /// Base color
    pub color: Color,
    /// Opacity, used when transparent
    pub opacity: f32,
    /// Enables alpha blending; changing it requires a program rebuild
    pub transparent: bool,
    /// Render as wireframe
    pub wireframe: bool,
    /// Set when the shader program must be rebuilt before the next draw
    pub needs_update: bool,
    /// Bumped every time `needs_update` is raised
    pub version: u32,
    /// Whether the compiled program is resident
    pub program_resident: bool,
}

impl MaterialData {
    /// Create a white, opaque material
    pub fn new(model: MaterialModel) -> Self {
        Self {
            model,
            color: Color::WHITE,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            needs_update: false,
            version: 0,
            program_resident: true,
        }
    }

    /// Flag the program for a rebuild
    pub fn mark_needs_update(&mut self) {
        self.needs_update = true;
        self.version += 1;
    }
}

/// One frame handed to the rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSubmission {
    /// Scene drawn
    pub scene: ObjectId,
    /// Camera used
    pub camera: ObjectId,
    /// Visible meshes with both geometry and material
    pub draw_count: usize,
}

/// Renderer state
#[derive(Debug, Clone, PartialEq)]
pub struct RendererData {
    /// Drawing buffer width
    pub width: u32,
    /// Drawing buffer height
    pub height: u32,
    /// Device pixel ratio
    pub pixel_ratio: f32,
    /// Clear color
    pub clear_color: Color,
    /// Frames submitted so far
    pub frames: Vec<FrameSubmission>,
    /// Whether the GPU context is alive
    pub context_resident: bool,
}

impl RendererData {
    /// Create a renderer with the given buffer size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
            clear_color: Color::BLACK,
            frames: Vec::new(),
            context_resident: true,
        }
    }

    /// Resize the drawing buffer
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

/// Scene + camera pairing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderActionData {
    /// Camera to draw with
    pub camera: Option<ObjectId>,
    /// Scene to draw
    pub scene: Option<ObjectId>,
}

/// Top-level drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceData {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Class-specific part of a native object
#[derive(Debug, Clone)]
pub enum ObjectBody {
    /// Transform node or group
    Group,
    /// Scene root
    Scene(SceneData),
    /// Drawable mesh
    Mesh(MeshData),
    /// Camera
    Camera(CameraData),
    /// Light
    Light(LightData),
    /// Geometry
    Geometry(GeometryData),
    /// Material
    Material(MaterialData),
    /// Shadow settings
    Shadow(ShadowData),
    /// Renderer
    Renderer(RendererData),
    /// Render action
    RenderAction(RenderActionData),
    /// Resource container
    Resources(ResourceContainer),
    /// Drawing surface
    Surface(SurfaceData),
}

impl ObjectBody {
    /// Class of this body
    pub fn class(&self) -> ObjectClass {
        match self {
            Self::Group => ObjectClass::Object3D,
            Self::Scene(_) => ObjectClass::Scene,
            Self::Mesh(_) => ObjectClass::Mesh,
            Self::Camera(_) => ObjectClass::Camera,
            Self::Light(_) => ObjectClass::Light,
            Self::Geometry(_) => ObjectClass::Geometry,
            Self::Material(_) => ObjectClass::Material,
            Self::Shadow(_) => ObjectClass::Shadow,
            Self::Renderer(_) => ObjectClass::Renderer,
            Self::RenderAction(_) => ObjectClass::RenderAction,
            Self::Resources(_) => ObjectClass::Resources,
            Self::Surface(_) => ObjectClass::Surface,
        }
    }

    /// Release GPU-side resources held by this body
    fn release_resources(&mut self) {
        match self {
            Self::Geometry(geometry) => geometry.buffers_resident = false,
            Self::Material(material) => material.program_resident = false,
            Self::Shadow(shadow) => shadow.map_allocated = false,
            Self::Renderer(renderer) => renderer.context_resident = false,
            _ => {}
        }
    }
}

/// One object in the native graph
#[derive(Debug, Clone)]
pub struct NativeObject {
    /// Debug name
    pub name: String,
    /// Local transform
    pub transform: Transform,
    /// Whether the object and its children are drawn
    pub visible: bool,
    /// Casts shadows
    pub cast_shadow: bool,
    /// Receives shadows
    pub receive_shadow: bool,
    /// Class-specific data
    pub body: ObjectBody,
    pub(super) parent: Option<ObjectId>,
    pub(super) children: Vec<ObjectId>,
    pub(super) disposed: bool,
}

impl NativeObject {
    /// Create a detached object
    pub fn new(body: ObjectBody) -> Self {
        Self {
            name: String::new(),
            transform: Transform::identity(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            body,
            parent: None,
            children: Vec::new(),
            disposed: false,
        }
    }

    /// Set the debug name (builder pattern)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Class of this object
    pub fn class(&self) -> ObjectClass {
        self.body.class()
    }

    /// Scene-graph parent
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Scene-graph children in draw order
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Whether `dispose` has run for this object
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub(super) fn mark_disposed(&mut self) {
        self.body.release_resources();
        self.disposed = true;
    }
}
