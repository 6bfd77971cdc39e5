//! Element kinds understood by the default descriptor set

use crate::native::ObjectClass;

/// Tag naming one declarative element kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// Plain transform node
    Object3D,
    /// Grouping node
    Group,
    /// Scene root
    Scene,
    /// Geometry + material drawable
    Mesh,
    /// Perspective projection camera
    PerspectiveCamera,
    /// Orthographic projection camera
    OrthographicCamera,
    /// Uniform ambient light
    AmbientLight,
    /// Parallel-ray light
    DirectionalLight,
    /// Omnidirectional light with falloff
    PointLight,
    /// Shadow settings for a point light
    PointLightShadow,
    /// Axis-aligned box geometry
    BoxGeometry,
    /// UV sphere geometry
    SphereGeometry,
    /// Flat plane geometry
    PlaneGeometry,
    /// Unlit material
    MeshBasicMaterial,
    /// Diffuse-only lit material
    MeshLambertMaterial,
    /// Specular lit material
    MeshPhongMaterial,
    /// Renderer bound to a surface
    WebGLRenderer,
    /// Render action pairing a scene with a camera
    Render,
    /// Keyed resource container
    Resources,
}

impl NodeKind {
    /// Every kind, in registration order
    pub const ALL: [Self; 19] = [
        Self::Object3D,
        Self::Group,
        Self::Scene,
        Self::Mesh,
        Self::PerspectiveCamera,
        Self::OrthographicCamera,
        Self::AmbientLight,
        Self::DirectionalLight,
        Self::PointLight,
        Self::PointLightShadow,
        Self::BoxGeometry,
        Self::SphereGeometry,
        Self::PlaneGeometry,
        Self::MeshBasicMaterial,
        Self::MeshLambertMaterial,
        Self::MeshPhongMaterial,
        Self::WebGLRenderer,
        Self::Render,
        Self::Resources,
    ];

    /// Element name as written in a declarative tree
    pub fn name(self) -> &'static str {
        match self {
            Self::Object3D => "object3D",
            Self::Group => "group",
            Self::Scene => "scene",
            Self::Mesh => "mesh",
            Self::PerspectiveCamera => "perspectiveCamera",
            Self::OrthographicCamera => "orthographicCamera",
            Self::AmbientLight => "ambientLight",
            Self::DirectionalLight => "directionalLight",
            Self::PointLight => "pointLight",
            Self::PointLightShadow => "pointLightShadow",
            Self::BoxGeometry => "boxGeometry",
            Self::SphereGeometry => "sphereGeometry",
            Self::PlaneGeometry => "planeGeometry",
            Self::MeshBasicMaterial => "meshBasicMaterial",
            Self::MeshLambertMaterial => "meshLambertMaterial",
            Self::MeshPhongMaterial => "meshPhongMaterial",
            Self::WebGLRenderer => "webGLRenderer",
            Self::Render => "render",
            Self::Resources => "resources",
        }
    }

    /// Look up a kind by its element name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Class of native object this kind constructs
    pub fn class(self) -> ObjectClass {
        match self {
            Self::Object3D | Self::Group => ObjectClass::Object3D,
            Self::Scene => ObjectClass::Scene,
            Self::Mesh => ObjectClass::Mesh,
            Self::PerspectiveCamera | Self::OrthographicCamera => ObjectClass::Camera,
            Self::AmbientLight | Self::DirectionalLight | Self::PointLight => ObjectClass::Light,
            Self::PointLightShadow => ObjectClass::Shadow,
            Self::BoxGeometry | Self::SphereGeometry | Self::PlaneGeometry => ObjectClass::Geometry,
            Self::MeshBasicMaterial | Self::MeshLambertMaterial | Self::MeshPhongMaterial => {
                ObjectClass::Material
            }
            Self::WebGLRenderer => ObjectClass::Renderer,
            Self::Render => ObjectClass::RenderAction,
            Self::Resources => ObjectClass::Resources,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(NodeKind::from_name("teapot"), None);
    }
}
