//! Pointer dispatch
//!
//! Delivers pointer actions to the objects under the pointer, nearest first,
//! until one of them stops propagation. An action that hits nothing becomes a
//! single "pointer missed" for the whole scene.

use hecs::Entity;

use crate::ecs::EngineWorld;
use crate::selection::{MissKind, SelectionEvent};
use crate::store::SelectionStore;

/// Button-level pointer action on the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Click,
    ContextMenu,
    /// Release at the end of a drag gesture
    DragEnd,
}

impl PointerAction {
    fn miss_kind(self) -> MissKind {
        match self {
            PointerAction::Click => MissKind::Click,
            PointerAction::ContextMenu => MissKind::ContextMenu,
            PointerAction::DragEnd => MissKind::Drag,
        }
    }

    /// The per-object event, or None for actions objects do not react to.
    fn object_event(self, name: &str) -> Option<SelectionEvent<'_>> {
        match self {
            PointerAction::Click => Some(SelectionEvent::Click(name)),
            PointerAction::ContextMenu => Some(SelectionEvent::ContextMenu(name)),
            PointerAction::DragEnd => None,
        }
    }
}

/// An object intersected by the pointer ray.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerHit {
    pub entity: Entity,
    pub name: String,
    pub distance: f32,
}

/// Sorts hits nearest first.
pub fn sort_hits(hits: &mut [PointerHit]) {
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

/// Dispatches `action` over `hits` (nearest first).
///
/// Returns the index of the hit that stopped propagation, if any.
pub fn dispatch_pointer(
    store: &mut SelectionStore,
    action: PointerAction,
    hits: &[PointerHit],
) -> Option<usize> {
    if hits.is_empty() {
        store.dispatch(SelectionEvent::PointerMissed(action.miss_kind()));
        return None;
    }
    hits.iter().position(|hit| {
        action
            .object_event(&hit.name)
            .is_some_and(|event| store.dispatch(event).is_stopped())
    })
}

/// Keeps each object's hover flag in step with the front-most hit.
#[derive(Debug, Default)]
pub struct HoverTracker {
    hovered: Option<Entity>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the hovered object changed.
    pub fn update(
        &mut self,
        world: &mut EngineWorld,
        store: &mut SelectionStore,
        front: Option<&PointerHit>,
    ) -> bool {
        let next = front.map(|hit| hit.entity);
        if next == self.hovered {
            return false;
        }
        if let Some(prev) = self.hovered.take() {
            if let Some(name) = world.name_of(prev) {
                store.dispatch(SelectionEvent::PointerLeave(&name));
            }
            world.set_hover(prev, false);
        }
        if let Some(hit) = front {
            store.dispatch(SelectionEvent::PointerEnter(&hit.name));
            world.set_hover(hit.entity, true);
            self.hovered = Some(hit.entity);
        }
        true
    }

    /// Clears hover when the pointer leaves the viewport.
    pub fn clear(&mut self, world: &mut EngineWorld, store: &mut SelectionStore) -> bool {
        self.update(world, store, None)
    }
}
