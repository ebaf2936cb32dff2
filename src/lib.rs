//! Showroom - a 3D viewer for selecting and transforming scene objects
//!
//! Built from three engine crates:
//! - `engine_core`: ECS world, selection state machine, camera
//! - `engine_render`: asset bundle, projection, picking, contact shadows
//! - `engine_editor`: egui viewport, transform gizmo, cursor

pub mod app;
pub mod config;
pub mod logging;

pub use engine_core;
pub use engine_editor;
pub use engine_render;
