//! Engine Render - asset bundle, projection, picking and shadows
//!
//! This module loads the scene's assets and turns the world into
//! screen-space geometry; it has no GUI dependency.

pub mod asset_manager;
pub mod loader;
pub mod mesh;
pub mod picking;
pub mod renderer;
pub mod scene;
mod shadow;

pub use asset_manager::*;
pub use loader::*;
pub use mesh::*;
pub use picking::*;
pub use renderer::*;
pub use scene::*;
