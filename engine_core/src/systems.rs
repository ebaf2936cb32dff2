//! Core systems: orbit camera and renderable collection

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Mat4, Vec2, Vec3, Vec4};
use hecs::Entity;

use crate::components::*;
use crate::ecs::*;
use crate::selection::SelectionState;

const POLAR_EPSILON: f32 = 1e-6;

/// Renderable data for the renderer
#[derive(Debug, Clone)]
pub struct Renderable {
    pub entity: Entity,
    pub name: String,
    pub world_matrix: Mat4,
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    pub selected: bool,
    /// Carries the `Pickable` marker, so pointer rays may hit it
    pub pickable: bool,
}

/// Render system - collects renderable entities
pub struct RenderSystem;

impl RenderSystem {
    /// Snapshot of everything drawable this frame, with selection highlight
    /// derived from `selection`.
    pub fn collect(world: &EngineWorld, selection: &SelectionState) -> Vec<Renderable> {
        let root = world.root_transform().to_mat4();
        let mut renderables = Vec::new();

        for (entity, name, transform, mesh_renderer, pickable) in &mut world
            .world()
            .query::<(Entity, &Name, &Transform, &MeshRenderer, Option<&Pickable>)>()
        {
            if !mesh_renderer.is_valid() {
                continue;
            }
            renderables.push(Renderable {
                entity,
                name: name.0.clone(),
                world_matrix: root * transform.to_mat4(),
                mesh: mesh_renderer.mesh,
                material: mesh_renderer.material,
                selected: selection.is_selected(name.as_str()),
                pickable: pickable.is_some(),
            });
        }

        renderables
    }
}

/// Half-line used for picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Moves the ray into another space. The direction is not renormalised so
    /// parameters stay comparable across spaces.
    pub fn transformed(&self, matrix: Mat4) -> Ray {
        Ray {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }
}

/// Camera system - perspective camera orbiting a target
///
/// The polar angle is measured from +Y and kept inside
/// `[min_polar, max_polar]`; the azimuth is unconstrained.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSystem {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraSystem {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -10.0, 80.0), 50.0)
    }
}

impl CameraSystem {
    pub fn new(position: Vec3, fov: f32) -> Self {
        let mut camera = Self {
            position,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov,
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 2000.0,
            min_polar: 0.0,
            max_polar: FRAC_PI_2,
            min_distance: 1.0,
            max_distance: 1000.0,
        };
        camera.apply_constraints();
        camera
    }

    /// Get view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get projection matrix (perspective)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    /// Get view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update aspect ratio (e.g., on window resize)
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
        }
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    /// Angle between the view offset and +Y.
    pub fn polar_angle(&self) -> f32 {
        let offset = self.position - self.target;
        let r = offset.length();
        if r <= f32::EPSILON {
            return 0.0;
        }
        (offset.y / r).clamp(-1.0, 1.0).acos()
    }

    pub fn azimuth(&self) -> f32 {
        let offset = self.position - self.target;
        offset.x.atan2(offset.z)
    }

    fn set_spherical(&mut self, radius: f32, polar: f32, azimuth: f32) {
        let sin_polar = polar.sin();
        self.position = self.target
            + Vec3::new(
                radius * sin_polar * azimuth.sin(),
                radius * polar.cos(),
                radius * sin_polar * azimuth.cos(),
            );
    }

    fn clamp_polar(&self, polar: f32) -> f32 {
        let min = self.min_polar.max(POLAR_EPSILON);
        let max = self.max_polar.min(PI - POLAR_EPSILON);
        polar.clamp(min, max)
    }

    /// Re-clamps polar angle and distance.
    pub fn apply_constraints(&mut self) {
        let polar = self.clamp_polar(self.polar_angle());
        let radius = self.distance().clamp(self.min_distance, self.max_distance);
        let azimuth = self.azimuth();
        self.set_spherical(radius, polar, azimuth);
    }

    /// Orbit by raw angles (radians).
    pub fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32) {
        let radius = self.distance();
        let azimuth = self.azimuth() + delta_azimuth;
        let polar = self.clamp_polar(self.polar_angle() + delta_polar);
        self.set_spherical(radius, polar, azimuth);
    }

    /// Orbit from a pointer drag; one viewport height is a full turn.
    pub fn orbit_drag(&mut self, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.orbit(
            -TAU * delta.x / viewport_height,
            -TAU * delta.y / viewport_height,
        );
    }

    /// Screen-space pan from a pointer drag (pixels).
    pub fn pan(&mut self, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let cam_up = right.cross(forward);
        let extent = self.distance() * (self.fov.to_radians() * 0.5).tan();
        let offset = right * (-2.0 * delta.x * extent / viewport_height)
            + cam_up * (2.0 * delta.y * extent / viewport_height);
        self.position += offset;
        self.target += offset;
    }

    /// Multiplies the orbit radius by `scale`.
    pub fn dolly(&mut self, scale: f32) {
        if !(scale.is_finite() && scale > 0.0) {
            return;
        }
        let radius = (self.distance() * scale).clamp(self.min_distance, self.max_distance);
        let (polar, azimuth) = (self.polar_angle(), self.azimuth());
        self.set_spherical(radius, polar, azimuth);
    }

    /// Zoom from a scroll delta (points); positive scrolls in.
    pub fn zoom_scroll(&mut self, scroll: f32) {
        self.dolly((-scroll * 0.002).exp());
    }

    /// Ray from the eye through a point in normalised device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let near = inv * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        Ray::new(near, far - near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::ManipulationMode;

    #[test]
    fn initial_position_is_lifted_to_horizon() {
        let camera = CameraSystem::default();
        assert!(camera.polar_angle() <= FRAC_PI_2 + 1e-5);
        assert!((camera.distance() - Vec3::new(0.0, -10.0, 80.0).length()).abs() < 1e-3);
    }

    #[test]
    fn polar_angle_stays_in_range() {
        let mut camera = CameraSystem::new(Vec3::new(0.0, 20.0, 60.0), 50.0);
        camera.orbit(0.0, 10.0);
        assert!(camera.polar_angle() <= FRAC_PI_2 + 1e-5);
        camera.orbit(0.0, -10.0);
        assert!(camera.polar_angle() >= 0.0);
        assert!(camera.position.x.is_finite());
    }

    #[test]
    fn drag_rotates_around_target() {
        let mut camera = CameraSystem::new(Vec3::new(0.0, 20.0, 60.0), 50.0);
        let d = camera.distance();
        camera.orbit_drag(Vec2::new(100.0, 0.0), 800.0);
        assert!((camera.distance() - d).abs() < 1e-3);
        assert!(camera.azimuth() < 0.0);
    }

    #[test]
    fn pan_moves_target_with_camera() {
        let mut camera = CameraSystem::new(Vec3::new(0.0, 0.0, 50.0), 50.0);
        let offset = camera.position - camera.target;
        camera.pan(Vec2::new(40.0, 0.0), 800.0);
        assert!(camera.target.x < 0.0);
        assert!((camera.position - camera.target).abs_diff_eq(offset, 1e-4));
    }

    #[test]
    fn dolly_is_clamped() {
        let mut camera = CameraSystem::default();
        camera.dolly(1e-6);
        assert!((camera.distance() - camera.min_distance).abs() < 1e-3);
        camera.zoom_scroll(-5000.0);
        assert!((camera.distance() - camera.max_distance).abs() < 1e-1);
    }

    #[test]
    fn center_ray_points_at_target() {
        let camera = CameraSystem::new(Vec3::new(0.0, 0.0, 50.0), 50.0);
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        assert!(ray.direction.abs_diff_eq(-Vec3::Z, 1e-4));
    }

    #[test]
    fn collect_marks_selected_object() {
        let mut world = EngineWorld::with_root(Transform::from_translation(0.0, 10.0, 0.0));
        world.spawn_object("DNA", Transform::default(), MeshRenderer::new(MeshHandle { id: 1 }));
        world.spawn_object("Curly", Transform::default(), MeshRenderer::new(MeshHandle { id: 2 }));
        world.spawn_object("Broken", Transform::default(), MeshRenderer::default());

        let selection = SelectionState::selected("DNA", ManipulationMode::Translate);
        let renderables = RenderSystem::collect(&world, &selection);
        assert_eq!(renderables.len(), 2);
        for r in &renderables {
            assert_eq!(r.selected, r.name == "DNA");
            assert!(r.pickable);
            let origin = r.world_matrix.transform_point3(Vec3::ZERO);
            assert!(origin.abs_diff_eq(Vec3::new(0.0, 10.0, 0.0), 1e-6));
        }
    }
}
