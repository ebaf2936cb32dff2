//! Renderer - projects the world into shaded screen-space triangles
//!
//! Output is plain geometry (pixel positions, depth, colour) so the editor
//! can paint it with whatever 2D backend it has.

use engine_core::components::Light;
use engine_core::ecs::EngineWorld;
use engine_core::scene::{ContactShadow, SceneLayout};
use engine_core::selection::SelectionState;
use engine_core::systems::{CameraSystem, RenderSystem, Renderable};
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::asset_manager::AssetBundle;
use crate::shadow;

/// Tint of the selected object ("hotpink")
pub const HIGHLIGHT_COLOR: Vec3 = Vec3::new(1.0, 105.0 / 255.0, 180.0 / 255.0);
/// Tint of every other object
pub const BASE_COLOR: Vec3 = Vec3::ONE;

/// Material tint for an object in the current selection.
pub fn tint_for(name: &str, selection: &SelectionState) -> Vec3 {
    if selection.is_selected(name) {
        HIGHLIGHT_COLOR
    } else {
        BASE_COLOR
    }
}

/// Render pass configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub clear_color: [f32; 4],
    pub backface_culling: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.96, 0.96, 0.96, 1.0],
            backface_culling: true,
        }
    }
}

/// A projected triangle in viewport pixels (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub points: [Vec2; 3],
    /// Normalised device depth, larger is further
    pub depth: f32,
    /// Linear RGBA per corner
    pub colors: [[f32; 4]; 3],
}

/// Output from render call - painter-ordered triangles
#[derive(Debug, Default)]
pub struct RenderOutput {
    /// Ground shadow, painted first
    pub shadows: Vec<ScreenTriangle>,
    /// Scene triangles sorted back to front
    pub triangles: Vec<ScreenTriangle>,
    pub view_projection: Mat4,
    pub camera_position: Vec3,
}

/// Clip-space to pixel mapping for one viewport.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Projector {
    pub matrix: Mat4,
    pub size: Vec2,
}

impl Projector {
    /// Returns pixel position and NDC depth, or None when behind the eye.
    pub fn project(&self, point: Vec3) -> Option<(Vec2, f32)> {
        let clip: Vec4 = self.matrix * point.extend(1.0);
        if clip.w <= 1e-5 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let x = (ndc.x * 0.5 + 0.5) * self.size.x;
        let y = (1.0 - (ndc.y * 0.5 + 0.5)) * self.size.y;
        Some((Vec2::new(x, y), ndc.z))
    }
}

/// Converts a pixel position inside the viewport to NDC.
pub fn screen_to_ndc(position: Vec2, viewport_size: Vec2) -> Vec2 {
    Vec2::new(
        position.x / viewport_size.x * 2.0 - 1.0,
        1.0 - position.y / viewport_size.y * 2.0,
    )
}

/// Lambert colour of a surface point, clamped to displayable range.
fn shade(lights: &[Light], tint: Vec3, position: Vec3, normal: Vec3) -> Vec3 {
    let light = lights
        .iter()
        .fold(Vec3::ZERO, |acc, l| acc + l.irradiance(position, normal));
    (tint * light).min(Vec3::ONE)
}

/// Renderer - owns the camera and, once loaded, the asset bundle
pub struct Renderer {
    config: RenderConfig,
    camera: CameraSystem,
    assets: Option<AssetBundle>,
    viewport_size: Vec2,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default(), CameraSystem::default())
    }
}

impl Renderer {
    pub fn new(config: RenderConfig, camera: CameraSystem) -> Self {
        Self {
            config,
            camera,
            assets: None,
            viewport_size: Vec2::new(1280.0, 720.0),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraSystem {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraSystem {
        &mut self.camera
    }

    pub fn set_assets(&mut self, assets: AssetBundle) {
        self.assets = Some(assets);
    }

    /// `None` while the bundle is still loading.
    pub fn assets(&self) -> Option<&AssetBundle> {
        self.assets.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.assets.is_some()
    }

    /// Update camera aspect ratio (call on resize)
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport_size = Vec2::new(width, height);
            self.camera.set_aspect_ratio(width / height);
        }
    }

    pub fn viewport_size(&self) -> Vec2 {
        self.viewport_size
    }

    /// Projects every renderable. Returns an empty frame until assets exist.
    pub fn render(
        &self,
        world: &EngineWorld,
        layout: &SceneLayout,
        selection: &SelectionState,
    ) -> RenderOutput {
        let view_projection = self.camera.view_projection();
        let mut output = RenderOutput {
            view_projection,
            camera_position: self.camera.position,
            ..Default::default()
        };
        let Some(assets) = &self.assets else {
            return output;
        };

        let projector = Projector {
            matrix: view_projection,
            size: self.viewport_size,
        };
        let renderables = RenderSystem::collect(world, selection);

        for renderable in &renderables {
            self.project_renderable(
                assets,
                renderable,
                tint_for(&renderable.name, selection),
                &layout.lights,
                projector,
                &mut output.triangles,
            );
        }
        output
            .triangles
            .sort_by(|a, b| b.depth.total_cmp(&a.depth));

        if let Some(settings) = layout.shadow {
            output.shadows =
                self.shadow_triangles(assets, &renderables, layout, settings, projector);
        }
        output
    }

    fn project_renderable(
        &self,
        assets: &AssetBundle,
        renderable: &Renderable,
        tint: Vec3,
        lights: &[Light],
        projector: Projector,
        out: &mut Vec<ScreenTriangle>,
    ) {
        let Some(mesh) = assets.get_mesh(renderable.mesh) else {
            return;
        };
        let alpha = assets
            .get_material(renderable.material)
            .map_or(1.0, |m| m.albedo[3]);
        let model = renderable.world_matrix;
        let normal_matrix = model.inverse().transpose();
        // Mirrored transforms flip winding
        let mirrored = model.determinant() < 0.0;

        for tri in mesh.triangles() {
            let world = tri.map(|v| model.transform_point3(v.position));
            let (Some((pa, za)), Some((pb, zb)), Some((pc, zc))) = (
                projector.project(world[0]),
                projector.project(world[1]),
                projector.project(world[2]),
            ) else {
                continue;
            };

            let signed_area = (pb - pa).perp_dot(pc - pa);
            // Screen y points down, so front faces have negative area
            let front = (signed_area < 0.0) != mirrored;
            if self.config.backface_culling && !front {
                continue;
            }

            let colors = [0, 1, 2].map(|i| {
                let mut normal = normal_matrix
                    .transform_vector3(tri[i].normal)
                    .normalize_or_zero();
                if !front {
                    normal = -normal;
                }
                let rgb = shade(lights, tint, world[i], normal);
                [rgb.x, rgb.y, rgb.z, alpha]
            });

            out.push(ScreenTriangle {
                points: [pa, pb, pc],
                depth: (za + zb + zc) / 3.0,
                colors,
            });
        }
    }

    fn shadow_triangles(
        &self,
        assets: &AssetBundle,
        renderables: &[Renderable],
        layout: &SceneLayout,
        settings: ContactShadow,
        projector: Projector,
    ) -> Vec<ScreenTriangle> {
        let plane = shadow::ShadowPlane::new(layout.group.to_mat4(), settings);
        let mut out = Vec::new();
        for renderable in renderables {
            if let Some(mesh) = assets.get_mesh(renderable.mesh) {
                plane.cast(mesh, renderable.world_matrix, projector, &mut out);
            }
        }
        out
    }
}
