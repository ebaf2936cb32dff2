//! Ray picking against the live world

use engine_core::ecs::EngineWorld;
use engine_core::input::{PointerHit, sort_hits};
use engine_core::selection::SelectionState;
use engine_core::systems::{Ray, RenderSystem};

use crate::asset_manager::AssetBundle;

/// Every pickable object hit by `ray`, nearest first.
///
/// Distances are in world units along the (normalised) world ray.
pub fn pick(world: &EngineWorld, assets: &AssetBundle, ray: &Ray) -> Vec<PointerHit> {
    let mut hits: Vec<PointerHit> = RenderSystem::collect(world, &SelectionState::default())
        .into_iter()
        .filter(|renderable| renderable.pickable)
        .filter_map(|renderable| {
            let mesh = assets.get_mesh(renderable.mesh)?;
            let inverse = renderable.world_matrix.inverse();
            if !inverse.is_finite() {
                return None;
            }
            let local = ray.transformed(inverse);
            let distance = mesh.intersect_ray(&local)?;
            Some(PointerHit {
                entity: renderable.entity,
                name: renderable.name,
                distance,
            })
        })
        .collect();
    sort_hits(&mut hits);
    hits
}
