//! Viewport - displays the rendered scene
//!
//! Turns pointer input into selection events and camera motion, paints the
//! projected scene and hosts the transform gizmo.

use egui::{
    Align2, Color32, FontId, Mesh, PointerButton, Pos2, Rect, Response, Rgba, Sense, Shape,
    Stroke, StrokeKind, Ui,
};
use glam::Vec2;

use engine_core::ecs::EngineWorld;
use engine_core::input::{HoverTracker, PointerAction, PointerHit, dispatch_pointer};
use engine_core::scene::SceneLayout;
use engine_core::store::SelectionStore;
use engine_render::{RenderOutput, Renderer, ScreenTriangle, pick, screen_to_ndc};

use crate::cursor::apply_cursor;
use crate::gizmo::GizmoBinding;

/// Pointer input sampled once per frame.
#[derive(Debug, Clone, Copy, Default)]
struct PointerFrame {
    position: Option<Pos2>,
    primary_clicked: bool,
    secondary_clicked: bool,
    drag_released: bool,
    primary_down: bool,
    secondary_down: bool,
    delta: egui::Vec2,
    scroll: f32,
}

impl PointerFrame {
    fn sample(ui: &Ui, response: &Response) -> Self {
        ui.input(|i| Self {
            position: i.pointer.hover_pos(),
            primary_clicked: i.pointer.button_clicked(PointerButton::Primary),
            secondary_clicked: i.pointer.button_clicked(PointerButton::Secondary),
            drag_released: response.drag_stopped(),
            primary_down: i.pointer.primary_down(),
            secondary_down: i.pointer.secondary_down(),
            delta: i.pointer.delta(),
            scroll: i.smooth_scroll_delta.y,
        })
    }
}

/// Viewport state for the editor
#[derive(Default)]
pub struct ViewportEditor {
    hover: HoverTracker,
    gizmo: GizmoBinding,
    gizmo_dragging: bool,
}

impl ViewportEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the viewport UI. `world` is `None` until the scene is composed.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        renderer: &mut Renderer,
        world: Option<&mut EngineWorld>,
        layout: &SceneLayout,
        selection: &mut SelectionStore,
    ) {
        let viewport_rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(viewport_rect, Sense::click_and_drag());
        renderer.set_viewport_size(viewport_rect.width(), viewport_rect.height());

        ui.painter()
            .rect_filled(viewport_rect, 0.0, to_color(renderer.config().clear_color));

        let Some(world) = world.filter(|_| renderer.is_ready()) else {
            self.draw_loading(ui, &viewport_rect);
            return;
        };

        let pointer = PointerFrame::sample(ui, &response);
        let local_pointer = pointer
            .position
            .filter(|p| viewport_rect.contains(*p))
            .map(|p| Vec2::new(p.x - viewport_rect.left(), p.y - viewport_rect.top()));

        let hits = self.pick_under_pointer(renderer, world, local_pointer);
        if local_pointer.is_some() {
            self.handle_selection(&pointer, &hits, selection);
            self.handle_camera(ui, renderer, &pointer, viewport_rect);
        }

        let frame = renderer.render(world, layout, selection.state());
        paint_frame(ui, viewport_rect, &frame);

        self.gizmo_dragging = self.gizmo.show(
            ui,
            viewport_rect,
            world,
            renderer.camera(),
            selection.state(),
        );

        let hover_changed = if local_pointer.is_some() {
            self.hover.update(world, selection, hits.first())
        } else {
            self.hover.clear(world, selection)
        };
        if hover_changed {
            ui.ctx().request_repaint();
        }
        apply_cursor(ui, world);
        self.draw_overlay(ui, &viewport_rect, selection);
    }

    fn pick_under_pointer(
        &self,
        renderer: &Renderer,
        world: &EngineWorld,
        local_pointer: Option<Vec2>,
    ) -> Vec<PointerHit> {
        let (Some(position), Some(assets)) = (local_pointer, renderer.assets()) else {
            return Vec::new();
        };
        let ndc = screen_to_ndc(position, renderer.viewport_size());
        pick(world, assets, &renderer.camera().ray_from_ndc(ndc))
    }

    fn handle_selection(
        &self,
        pointer: &PointerFrame,
        hits: &[PointerHit],
        selection: &mut SelectionStore,
    ) {
        // A release that ends a gizmo drag is not a scene click
        if self.gizmo_dragging {
            return;
        }
        if pointer.primary_clicked {
            dispatch_pointer(selection, PointerAction::Click, hits);
        }
        if pointer.secondary_clicked {
            dispatch_pointer(selection, PointerAction::ContextMenu, hits);
        }
        if pointer.drag_released {
            dispatch_pointer(selection, PointerAction::DragEnd, hits);
        }
    }

    fn handle_camera(
        &self,
        ui: &Ui,
        renderer: &mut Renderer,
        pointer: &PointerFrame,
        viewport_rect: Rect,
    ) {
        if self.gizmo_dragging {
            return;
        }
        let delta = Vec2::new(pointer.delta.x, pointer.delta.y);
        let height = viewport_rect.height();
        let camera = renderer.camera_mut();

        if pointer.primary_down && delta != Vec2::ZERO {
            camera.orbit_drag(delta, height);
            ui.ctx().request_repaint();
        } else if pointer.secondary_down && delta != Vec2::ZERO {
            camera.pan(delta, height);
            ui.ctx().request_repaint();
        }
        if pointer.scroll.abs() > 0.0 {
            camera.zoom_scroll(pointer.scroll);
            ui.ctx().request_repaint();
        }
    }

    fn draw_loading(&self, ui: &Ui, rect: &Rect) {
        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            "Loading…",
            FontId::proportional(18.0),
            Color32::from_gray(120),
        );
        ui.ctx().request_repaint();
    }

    fn draw_overlay(&self, ui: &Ui, rect: &Rect, selection: &SelectionStore) {
        let label = match selection.current() {
            Some(name) => format!("{} - {}", name, selection.mode()),
            None => "Nothing selected".to_string(),
        };
        ui.painter().text(
            Pos2::new(rect.left() + 12.0, rect.top() + 10.0),
            Align2::LEFT_TOP,
            label,
            FontId::proportional(13.0),
            Color32::from_gray(60),
        );
        ui.painter().text(
            Pos2::new(rect.left() + 12.0, rect.bottom() - 10.0),
            Align2::LEFT_BOTTOM,
            "LMB: select / orbit | RMB: cycle mode / pan | Scroll: zoom",
            FontId::proportional(11.0),
            Color32::from_gray(110),
        );
    }
}

fn to_color(color: [f32; 4]) -> Color32 {
    Color32::from(Rgba::from_rgba_unmultiplied(color[0], color[1], color[2], color[3]))
}

fn push_triangle(mesh: &mut Mesh, origin: Pos2, triangle: &ScreenTriangle) {
    let base = mesh.vertices.len() as u32;
    for (p, color) in triangle.points.iter().zip(triangle.colors) {
        mesh.colored_vertex(origin + egui::vec2(p.x, p.y), to_color(color));
    }
    mesh.add_triangle(base, base + 1, base + 2);
}

/// Paints shadows then scene triangles, clipped to the viewport.
fn paint_frame(ui: &Ui, rect: Rect, frame: &RenderOutput) {
    let mut mesh = Mesh::default();
    for triangle in frame.shadows.iter().chain(&frame.triangles) {
        push_triangle(&mut mesh, rect.min, triangle);
    }
    let painter = ui.painter().with_clip_rect(rect);
    painter.add(Shape::mesh(mesh));
    painter.rect_stroke(
        rect,
        0.0,
        Stroke::new(1.0, Color32::from_gray(200)),
        StrokeKind::Inside,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::selection::SelectionEvent;

    #[test]
    fn triangles_are_offset_into_viewport() {
        let mut mesh = Mesh::default();
        let tri = ScreenTriangle {
            points: [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)],
            depth: 0.5,
            colors: [[1.0, 1.0, 1.0, 1.0], [0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0, 1.0]],
        };
        push_triangle(&mut mesh, Pos2::new(100.0, 50.0), &tri);
        push_triangle(&mut mesh, Pos2::new(100.0, 50.0), &tri);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.vertices[1].pos, Pos2::new(110.0, 50.0));
        assert_eq!(mesh.vertices[0].color, Color32::WHITE);
        assert_eq!(mesh.vertices[1].color, Color32::BLACK);
    }

    fn selected_store() -> SelectionStore {
        let mut store = SelectionStore::new();
        store.dispatch(SelectionEvent::Click("DNA"));
        store
    }

    #[test]
    fn drag_release_over_empty_space_keeps_selection() {
        let viewport = ViewportEditor::new();
        let mut store = selected_store();
        let pointer = PointerFrame { drag_released: true, ..Default::default() };
        viewport.handle_selection(&pointer, &[], &mut store);
        assert_eq!(store.current(), Some("DNA"));

        let click = PointerFrame { primary_clicked: true, ..Default::default() };
        viewport.handle_selection(&click, &[], &mut store);
        assert_eq!(store.current(), None);
    }

    #[test]
    fn gizmo_drag_suppresses_scene_clicks() {
        let viewport = ViewportEditor { gizmo_dragging: true, ..Default::default() };
        let mut store = selected_store();
        let click = PointerFrame { primary_clicked: true, ..Default::default() };
        viewport.handle_selection(&click, &[], &mut store);
        assert_eq!(store.current(), Some("DNA"));
    }

    #[test]
    fn translucent_shadow_keeps_alpha() {
        let c = to_color([0.0, 0.0, 0.0, 0.25]);
        assert!(c.a() > 0 && c.a() < 255);
    }
}
