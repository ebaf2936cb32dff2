//! Static scene layout: object placements, lights and ground shadow

use glam::Vec3;

use crate::components::{Light, Transform};

/// A named asset mesh placed in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub name: &'static str,
    pub position: [f32; 3],
    /// XYZ Euler angles in radians
    pub rotation: [f32; 3],
    pub scale: f32,
}

impl Placement {
    pub const fn new(name: &'static str, position: [f32; 3], rotation: [f32; 3]) -> Self {
        Self {
            name,
            position,
            rotation,
            scale: 1.0,
        }
    }

    pub const fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn transform(&self) -> Transform {
        Transform::from_euler_xyz(
            Vec3::from_array(self.position),
            Vec3::from_array(self.rotation),
            self.scale,
        )
    }
}

pub const SHOWROOM_PLACEMENTS: [Placement; 9] = [
    Placement::new("Curly", [1.0, -11.0, -20.0], [2.0, 0.0, 0.0]),
    Placement::new("DNA", [20.0, 0.0, -17.0], [1.0, 1.0, -2.0]),
    Placement::new("Headphones", [20.0, 2.0, 4.0], [1.0, 0.0, -1.0]),
    Placement::new("Notebook", [-21.0, -15.0, -13.0], [2.0, 0.0, 1.0]),
    Placement::new("Rocket003", [18.0, 15.0, -25.0], [1.0, 1.0, 0.0]),
    Placement::new("Roundcube001", [-25.0, -4.0, 5.0], [1.0, 0.0, 0.0]).scaled(0.5),
    Placement::new("Table", [1.0, -4.0, -28.0], [1.0, 0.0, -1.0]).scaled(0.5),
    Placement::new("VR_Headset", [7.0, -15.0, 28.0], [1.0, 0.0, -1.0]).scaled(5.0),
    Placement::new("Zeppelin", [-20.0, 10.0, 10.0], [3.0, -1.0, 3.0]).scaled(0.005),
];

/// Soft shadow catcher on a horizontal plane below the objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactShadow {
    /// Plane height in group space
    pub height: f32,
    pub opacity: f32,
    pub width: f32,
    pub depth: f32,
    /// Objects this far above the plane cast no shadow
    pub far: f32,
    /// Softness of the shadow's outer border; 0 gives a hard edge
    pub blur: f32,
}

impl Default for ContactShadow {
    fn default() -> Self {
        Self {
            height: -35.0,
            opacity: 0.25,
            width: 200.0,
            depth: 200.0,
            far: 50.0,
            blur: 1.0,
        }
    }
}

/// Everything about the scene that is fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    /// Transform of the group every placement is parented to
    pub group: Transform,
    pub placements: Vec<Placement>,
    pub lights: Vec<Light>,
    pub shadow: Option<ContactShadow>,
}

impl SceneLayout {
    pub fn showroom() -> Self {
        Self {
            group: Transform::from_translation(0.0, 10.0, 0.0),
            placements: SHOWROOM_PLACEMENTS.to_vec(),
            lights: vec![
                Light::point(Vec3::new(100.0, 100.0, 100.0), 0.8),
                Light::hemisphere(Vec3::ONE, Vec3::ZERO, 1.0),
            ],
            shadow: Some(ContactShadow::default()),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.placements.iter().map(|p| p.name)
    }
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self::showroom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_names_are_unique() {
        let layout = SceneLayout::showroom();
        let mut names: Vec<_> = layout.names().collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), layout.placements.len());
    }

    #[test]
    fn scale_defaults_to_one() {
        let dna = SHOWROOM_PLACEMENTS[1];
        assert_eq!(dna.name, "DNA");
        assert_eq!(dna.transform().scale, Vec3::ONE);
        let zeppelin = SHOWROOM_PLACEMENTS[8];
        assert_eq!(zeppelin.transform().scale, Vec3::splat(0.005));
    }
}
