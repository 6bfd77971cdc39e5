//! Math utilities and types
//!
//! Provides the vector, matrix and color types used by the native object graph
//! and by vector- or color-valued element props.

pub use nalgebra::{
    Vector3,
    Matrix4,
    Quaternion,
    Unit,
    UnitQuaternion,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position relative to the parent
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Set the rotation from XYZ euler angles in radians
    pub fn set_euler(&mut self, euler: Vec3) {
        self.rotation = UnitQuaternion::from_euler_angles(euler.x, euler.y, euler.z);
    }

    /// Rotation as XYZ euler angles in radians
    pub fn euler(&self) -> Vec3 {
        let (roll, pitch, yaw) = self.rotation.euler_angles();
        Vec3::new(roll, pitch, yaw)
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Linear RGB color with components in the 0.0 to 1.0 range
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Color {
    /// White, the default color of lights and materials
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a color from float channels
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Pack the color into a `0xRRGGBB` value
    pub fn to_hex(self) -> u32 {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Scene fog settings
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Fog {
    /// Fog that grows linearly between `near` and `far`
    Linear {
        /// Fog color
        color: Color,
        /// Distance where fog starts
        near: f32,
        /// Distance where fog is fully opaque
        far: f32,
    },
    /// Exponential squared fog
    Exponential {
        /// Fog color
        color: Color,
        /// Fog density
        density: f32,
    },
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_color_hex_round_trip() {
        let color = Color::from_hex(0xff8000);
        assert_relative_eq!(color.r, 1.0);
        assert_relative_eq!(color.g, 128.0 / 255.0);
        assert_relative_eq!(color.b, 0.0);
        assert_eq!(color.to_hex(), 0xff8000);
    }

    #[test]
    fn test_transform_matrix_applies_translation_last() {
        let mut transform = Transform::identity();
        transform.position = Vec3::new(1.0, 2.0, 3.0);
        transform.scale = Vec3::new(2.0, 2.0, 2.0);

        let point = transform.to_matrix().transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point.x, 3.0);
        assert_relative_eq!(point.y, 2.0);
        assert_relative_eq!(point.z, 3.0);
    }
}
