//! Scene composition: binds static placements to bundle assets

use engine_core::ecs::EngineWorld;
use engine_core::scene::SceneLayout;
use hecs::Entity;
use tracing::info;

use crate::asset_manager::{AssetBundle, AssetError};

/// Spawns one pickable object per placement into `world`.
///
/// Every name is resolved before anything is spawned, so a missing node
/// leaves the world untouched.
pub fn spawn_scene(
    world: &mut EngineWorld,
    bundle: &AssetBundle,
    layout: &SceneLayout,
) -> Result<Vec<Entity>, AssetError> {
    let resolved = layout
        .placements
        .iter()
        .map(|p| bundle.lookup(p.name).map(|r| (p, r)))
        .collect::<Result<Vec<_>, _>>()?;

    let entities = resolved
        .into_iter()
        .map(|(placement, renderer)| {
            world.spawn_object(placement.name, placement.transform(), renderer)
        })
        .collect::<Vec<_>>();

    info!(objects = entities.len(), "scene composed");
    Ok(entities)
}

/// Builds a fresh world rooted at the layout's group transform.
pub fn build_world(bundle: &AssetBundle, layout: &SceneLayout) -> Result<EngineWorld, AssetError> {
    let mut world = EngineWorld::with_root(layout.group);
    spawn_scene(&mut world, bundle, layout)?;
    Ok(world)
}

/// Bundle where every showroom name is a unit cube.
#[cfg(test)]
pub(crate) fn showroom_bundle() -> AssetBundle {
    let mut bundle = AssetBundle::new();
    let cube = bundle.insert(crate::mesh::MeshData::cube(), Default::default());
    for name in SceneLayout::showroom().names() {
        bundle.insert_node(name, cube);
    }
    bundle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_manager::MaterialData;
    use crate::mesh::MeshData;

    #[test]
    fn every_placement_becomes_a_named_object() {
        let layout = SceneLayout::showroom();
        let world = build_world(&showroom_bundle(), &layout).unwrap();
        for name in layout.names() {
            assert!(world.find_by_name(name).is_some(), "{name} missing");
        }
        assert_eq!(world.root_transform(), layout.group);
    }

    #[test]
    fn missing_node_spawns_nothing() {
        let mut bundle = AssetBundle::new();
        let cube = bundle.insert(MeshData::cube(), MaterialData::default());
        bundle.insert_node("DNA", cube);

        let mut world = EngineWorld::new();
        let err = spawn_scene(&mut world, &bundle, &SceneLayout::showroom()).unwrap_err();
        assert!(matches!(err, AssetError::MissingNode(_)));
        assert_eq!(world.entity_count(), 0);
    }
}
