//! Selection state machine
//!
//! Tracks which single object is selected and which manipulation mode applies
//! to it. Transitions are a pure function of the current state and one
//! pointer event; the observable wrapper lives in [`crate::store`].

use std::fmt;

/// Gizmo manipulation mode, cycled by context-menu clicks on the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ManipulationMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl ManipulationMode {
    pub const ALL: [ManipulationMode; 3] = [Self::Translate, Self::Rotate, Self::Scale];

    pub fn index(self) -> usize {
        match self {
            Self::Translate => 0,
            Self::Rotate => 1,
            Self::Scale => 2,
        }
    }

    /// Wraps out-of-range indices.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Rotate => "rotate",
            Self::Scale => "scale",
        }
    }
}

impl fmt::Display for ManipulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the selection: the selected object (if any) and the active mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub current: Option<String>,
    pub mode: ManipulationMode,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(name: &str, mode: ManipulationMode) -> Self {
        Self {
            current: Some(name.to_string()),
            mode,
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.current.as_deref() == Some(name)
    }

    pub fn mode_index(&self) -> usize {
        self.mode.index()
    }
}

/// Kind of pointer interaction that landed on no object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissKind {
    Click,
    ContextMenu,
    Drag,
}

/// A pointer event as seen by one object, or a miss seen by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent<'a> {
    Click(&'a str),
    ContextMenu(&'a str),
    PointerMissed(MissKind),
    PointerEnter(&'a str),
    PointerLeave(&'a str),
}

/// Whether an object consumed the event or lets it reach the next object behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

impl Propagation {
    pub fn is_stopped(self) -> bool {
        self == Propagation::Stop
    }
}

/// Applies one event to a state.
///
/// Hover events never change selection; they are accepted here so callers can
/// route every pointer event through one place.
pub fn transition(
    state: &SelectionState,
    event: SelectionEvent<'_>,
) -> (SelectionState, Propagation) {
    match event {
        SelectionEvent::Click(name) => (
            SelectionState {
                current: Some(name.to_string()),
                mode: state.mode,
            },
            Propagation::Stop,
        ),
        SelectionEvent::PointerMissed(MissKind::Click) => (
            SelectionState {
                current: None,
                mode: state.mode,
            },
            Propagation::Continue,
        ),
        SelectionEvent::PointerMissed(_) => (state.clone(), Propagation::Continue),
        SelectionEvent::ContextMenu(name) if state.is_selected(name) => (
            SelectionState {
                current: state.current.clone(),
                mode: state.mode.next(),
            },
            Propagation::Stop,
        ),
        SelectionEvent::ContextMenu(_) => (state.clone(), Propagation::Continue),
        SelectionEvent::PointerEnter(_) => (state.clone(), Propagation::Stop),
        SelectionEvent::PointerLeave(_) => (state.clone(), Propagation::Continue),
    }
}
