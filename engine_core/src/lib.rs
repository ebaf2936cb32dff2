//! Engine Core - scene world, selection and camera
//!
//! This module provides the core functionality without any GUI dependencies.

pub mod components;
pub mod ecs;
pub mod input;
pub mod scene;
pub mod selection;
pub mod store;
pub mod systems;

pub use components::*;
pub use ecs::*;
pub use input::*;
pub use scene::*;
pub use selection::*;
pub use store::*;
pub use systems::*;
