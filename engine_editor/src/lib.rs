//! Engine Editor - Egui-based viewer interface
//!
//! This module provides the viewport UI using egui.
//! It does NOT contain projection logic - it only paints what the renderer produces.

pub mod cursor;
pub mod gizmo;
pub mod viewport;

pub use cursor::*;
pub use gizmo::*;
pub use viewport::*;
