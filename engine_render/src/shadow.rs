//! Contact shadows: objects flattened onto a ground plane below the group

use engine_core::scene::ContactShadow;
use glam::{Mat4, Vec3};

use crate::mesh::MeshData;
use crate::renderer::{Projector, ScreenTriangle};

/// World units of edge feathering per unit of `blur`.
const FEATHER_PER_BLUR: f32 = 10.0;

/// Ground plane at `settings.height` in the group's local space.
pub(crate) struct ShadowPlane {
    group: Mat4,
    group_inv: Mat4,
    settings: ContactShadow,
}

impl ShadowPlane {
    pub fn new(group: Mat4, settings: ContactShadow) -> Self {
        Self {
            group,
            group_inv: group.inverse(),
            settings,
        }
    }

    /// Shadow strength for a point `height` above the plane.
    pub fn alpha_at(&self, height: f32) -> f32 {
        if height < 0.0 || height > self.settings.far || self.settings.far <= 0.0 {
            return 0.0;
        }
        self.settings.opacity * (1.0 - height / self.settings.far)
    }

    fn inside(&self, local: Vec3) -> bool {
        local.x.abs() <= self.settings.width * 0.5 && local.z.abs() <= self.settings.depth * 0.5
    }

    /// Softens the shadow towards the border of the plane; 1 in the interior.
    pub fn edge_fade(&self, local: Vec3) -> f32 {
        let band = self.settings.blur * FEATHER_PER_BLUR;
        if band <= 0.0 {
            return 1.0;
        }
        let to_edge = (self.settings.width * 0.5 - local.x.abs())
            .min(self.settings.depth * 0.5 - local.z.abs());
        (to_edge / band).clamp(0.0, 1.0)
    }

    /// Flattens the downward-facing triangles of `mesh` onto the plane.
    ///
    /// Only faces looking down are used so a closed mesh covers its
    /// footprint roughly once instead of stacking translucent layers.
    pub fn cast(
        &self,
        mesh: &MeshData,
        model: Mat4,
        projector: Projector,
        out: &mut Vec<ScreenTriangle>,
    ) {
        let to_local = self.group_inv * model;
        for [a, b, c] in mesh.triangles() {
            let local = [
                to_local.transform_point3(a.position),
                to_local.transform_point3(b.position),
                to_local.transform_point3(c.position),
            ];
            let normal = (local[1] - local[0]).cross(local[2] - local[0]);
            if normal.y >= 0.0 {
                continue;
            }
            if !local.iter().all(|p| self.inside(*p)) {
                continue;
            }
            let height = local.iter().map(|p| p.y - self.settings.height).sum::<f32>() / 3.0;
            let alpha = self.alpha_at(height);
            if alpha <= 0.0 {
                continue;
            }

            let flat = local.map(|p| {
                self.group
                    .transform_point3(Vec3::new(p.x, self.settings.height, p.z))
            });
            let (Some((pa, za)), Some((pb, zb)), Some((pc, zc))) = (
                projector.project(flat[0]),
                projector.project(flat[1]),
                projector.project(flat[2]),
            ) else {
                continue;
            };
            out.push(ScreenTriangle {
                points: [pa, pb, pc],
                depth: (za + zb + zc) / 3.0,
                colors: local.map(|p| [0.0, 0.0, 0.0, alpha * self.edge_fade(p)]),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::systems::CameraSystem;
    use glam::Vec2;

    fn projector() -> Projector {
        let mut camera = CameraSystem::new(Vec3::new(0.0, 60.0, 80.0), 50.0);
        camera.set_aspect_ratio(1.0);
        Projector {
            matrix: camera.view_projection(),
            size: Vec2::new(500.0, 500.0),
        }
    }

    #[test]
    fn shadow_fades_with_height() {
        let plane = ShadowPlane::new(Mat4::IDENTITY, ContactShadow::default());
        assert!((plane.alpha_at(0.0) - 0.25).abs() < 1e-6);
        assert!(plane.alpha_at(25.0) < plane.alpha_at(5.0));
        assert_eq!(plane.alpha_at(60.0), 0.0);
        assert_eq!(plane.alpha_at(-1.0), 0.0);
    }

    fn cast_cube_at(plane: &ShadowPlane, group: Mat4, x: f32) -> Vec<ScreenTriangle> {
        let model = group
            * Mat4::from_translation(Vec3::new(x, -30.0, 0.0))
            * Mat4::from_scale(Vec3::splat(4.0));
        let mut out = Vec::new();
        plane.cast(&MeshData::cube(), model, projector(), &mut out);
        out
    }

    fn max_alpha(triangles: &[ScreenTriangle]) -> f32 {
        triangles
            .iter()
            .flat_map(|t| t.colors)
            .map(|c| c[3])
            .fold(0.0, f32::max)
    }

    #[test]
    fn cube_above_plane_casts_its_bottom() {
        let group = Mat4::from_translation(Vec3::new(0.0, 10.0, 0.0));
        let plane = ShadowPlane::new(group, ContactShadow::default());
        let out = cast_cube_at(&plane, group, 0.0);
        assert_eq!(out.len(), 2);
        assert!(out.iter().flat_map(|t| t.colors).all(|c| c[3] > 0.0 && c[3] < 0.25));
    }

    #[test]
    fn blur_feathers_shadow_near_the_border() {
        let group = Mat4::from_translation(Vec3::new(0.0, 10.0, 0.0));
        let soft = ShadowPlane::new(group, ContactShadow::default());
        let centre = max_alpha(&cast_cube_at(&soft, group, 0.0));
        let border = max_alpha(&cast_cube_at(&soft, group, 95.0));
        assert!(border > 0.0 && border < centre * 0.8);

        let hard = ShadowPlane::new(
            group,
            ContactShadow {
                blur: 0.0,
                ..ContactShadow::default()
            },
        );
        let hard_border = max_alpha(&cast_cube_at(&hard, group, 95.0));
        assert!((hard_border - centre).abs() < 1e-6);
    }

    #[test]
    fn far_objects_cast_nothing() {
        let plane = ShadowPlane::new(Mat4::IDENTITY, ContactShadow::default());
        let model = Mat4::from_translation(Vec3::new(0.0, 40.0, 0.0));
        let mut out = Vec::new();
        plane.cast(&MeshData::cube(), model, projector(), &mut out);
        assert!(out.is_empty());
    }
}
