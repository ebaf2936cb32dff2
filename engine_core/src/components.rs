//! Core components for the scene world

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Transform component - position, rotation, and scale of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self::from_position(Vec3::new(x, y, z))
    }

    /// Builds a transform from an XYZ Euler rotation (radians) and a uniform scale.
    pub fn from_euler_xyz(position: Vec3, euler: Vec3, scale: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z),
            scale: Vec3::splat(scale),
        }
    }

    /// Inverse of `to_mat4`. Shear introduced by non-uniform parents is dropped.
    pub fn from_mat4(matrix: Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Get the model matrix (local transform)
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Handle to a mesh asset - used instead of direct mesh storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle {
    pub id: u64,
}

impl MeshHandle {
    pub fn invalid() -> Self {
        Self { id: 0 }
    }

    pub fn is_valid(&self) -> bool {
        self.id != 0
    }
}

impl Default for MeshHandle {
    fn default() -> Self {
        Self::invalid()
    }
}

/// Handle to a material asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle {
    pub id: u64,
}

impl MaterialHandle {
    pub fn invalid() -> Self {
        Self { id: 0 }
    }

    pub fn is_valid(&self) -> bool {
        self.id != 0
    }
}

impl Default for MaterialHandle {
    fn default() -> Self {
        Self::invalid()
    }
}

/// Mesh renderer component - references mesh and material assets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshRenderer {
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
}

impl MeshRenderer {
    pub fn new(mesh: MeshHandle) -> Self {
        Self {
            mesh,
            material: MaterialHandle::invalid(),
        }
    }

    pub fn with_material(mesh: MeshHandle, material: MaterialHandle) -> Self {
        Self { mesh, material }
    }

    pub fn is_valid(&self) -> bool {
        self.mesh.is_valid()
    }
}

/// Unique scene name of an entity. Selection refers to objects by this name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(pub String);

impl Name {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Marks an entity that pointer picking may hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pickable;

/// Transient pointer-over flag, owned by the object it is attached to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hover(pub bool);

/// Scene light
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Point {
        position: Vec3,
        color: Vec3,
        intensity: f32,
    },
    /// Sky colour from above blending to ground colour from below.
    Hemisphere {
        sky: Vec3,
        ground: Vec3,
        intensity: f32,
    },
}

impl Light {
    pub fn point(position: Vec3, intensity: f32) -> Self {
        Self::Point {
            position,
            color: Vec3::ONE,
            intensity,
        }
    }

    pub fn hemisphere(sky: Vec3, ground: Vec3, intensity: f32) -> Self {
        Self::Hemisphere {
            sky,
            ground,
            intensity,
        }
    }

    /// Diffuse contribution for a surface at `position` facing `normal` (world space).
    pub fn irradiance(&self, position: Vec3, normal: Vec3) -> Vec3 {
        match *self {
            Light::Point {
                position: light_pos,
                color,
                intensity,
            } => {
                let to_light = (light_pos - position).normalize_or_zero();
                color * intensity * normal.dot(to_light).max(0.0)
            }
            Light::Hemisphere {
                sky,
                ground,
                intensity,
            } => {
                let w = 0.5 * normal.y + 0.5;
                ground.lerp(sky, w) * intensity
            }
        }
    }
}
