//! Gizmo binding - attaches a transform gizmo to the selected object
//!
//! The selection is resolved by name against the live world every frame, so
//! a stale name simply shows no gizmo until the object comes back.

use egui::{Rect, Ui};
use egui_gizmo::{Gizmo, GizmoMode, GizmoOrientation};
use glam::Mat4;
use hecs::Entity;
use tracing::warn;

use engine_core::ecs::EngineWorld;
use engine_core::selection::{ManipulationMode, SelectionState};
use engine_core::systems::CameraSystem;

pub fn gizmo_mode(mode: ManipulationMode) -> GizmoMode {
    match mode {
        ManipulationMode::Translate => GizmoMode::Translate,
        ManipulationMode::Rotate => GizmoMode::Rotate,
        ManipulationMode::Scale => GizmoMode::Scale,
    }
}

/// The object a gizmo should be drawn for this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GizmoTarget {
    pub entity: Entity,
    pub name: String,
    pub mode: ManipulationMode,
}

#[derive(Debug, Default)]
pub struct GizmoBinding {
    stale_reported: Option<String>,
}

impl GizmoBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        &mut self,
        world: &EngineWorld,
        selection: &SelectionState,
    ) -> Option<GizmoTarget> {
        let Some(name) = selection.current.as_deref() else {
            self.stale_reported = None;
            return None;
        };
        match world.find_by_name(name) {
            Some(entity) => {
                self.stale_reported = None;
                Some(GizmoTarget {
                    entity,
                    name: name.to_string(),
                    mode: selection.mode,
                })
            }
            None => {
                if self.stale_reported.as_deref() != Some(name) {
                    warn!(object = name, "selected object is not in the scene; hiding gizmo");
                    self.stale_reported = Some(name.to_string());
                }
                None
            }
        }
    }

    /// Draws and runs the gizmo. Returns true while the user is dragging it.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        viewport: Rect,
        world: &mut EngineWorld,
        camera: &CameraSystem,
        selection: &SelectionState,
    ) -> bool {
        let Some(target) = self.resolve(world, selection) else {
            return false;
        };
        let Some(model) = world.world_matrix(target.entity) else {
            return false;
        };

        let gizmo = Gizmo::new("showroom_transform_gizmo")
            .view_matrix(camera.view_matrix().to_cols_array_2d().into())
            .projection_matrix(camera.projection_matrix().to_cols_array_2d().into())
            .model_matrix(model.to_cols_array_2d().into())
            .mode(gizmo_mode(target.mode))
            .orientation(GizmoOrientation::Global)
            .viewport(viewport);

        match gizmo.interact(ui) {
            Some(result) => {
                world.set_world_matrix(target.entity, Mat4::from(result.transform()));
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::components::{MeshHandle, MeshRenderer, Transform};

    #[test]
    fn resolves_selected_object_with_mode() {
        let mut world = EngineWorld::new();
        let mesh = MeshRenderer::new(MeshHandle { id: 1 });
        let dna = world.spawn_object("DNA", Transform::default(), mesh);
        let mut binding = GizmoBinding::new();

        let selection = SelectionState::selected("DNA", ManipulationMode::Scale);
        let target = binding.resolve(&world, &selection).unwrap();
        assert_eq!(target.entity, dna);
        assert_eq!(gizmo_mode(target.mode), GizmoMode::Scale);

        assert_eq!(binding.resolve(&world, &SelectionState::default()), None);
    }

    #[test]
    fn stale_selection_hides_gizmo_and_recovers() {
        let mut world = EngineWorld::new();
        let renderer = MeshRenderer::new(MeshHandle { id: 1 });
        let dna = world.spawn_object("DNA", Transform::default(), renderer);
        let selection = SelectionState::selected("DNA", ManipulationMode::Rotate);
        let mut binding = GizmoBinding::new();

        world.despawn(dna);
        assert_eq!(binding.resolve(&world, &selection), None);
        assert_eq!(selection.current.as_deref(), Some("DNA"));

        let again = world.spawn_object("DNA", Transform::default(), renderer);
        assert_eq!(binding.resolve(&world, &selection).map(|t| t.entity), Some(again));
    }
}
