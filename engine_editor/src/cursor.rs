//! Cursor controller - pointing hand while any object is hovered

use egui::{CursorIcon, Ui};

use engine_core::ecs::EngineWorld;

pub fn cursor_for(any_hovered: bool) -> CursorIcon {
    if any_hovered {
        CursorIcon::PointingHand
    } else {
        CursorIcon::Default
    }
}

/// Sets the platform cursor from the world's hover flags.
pub fn apply_cursor(ui: &Ui, world: &EngineWorld) {
    let icon = cursor_for(world.any_hovered());
    if icon != CursorIcon::Default {
        ui.output_mut(|o| o.cursor_icon = icon);
    }
}
