//! ECS World wrapper for the scene graph

use std::collections::HashMap;

use glam::Mat4;
use hecs::{Entity, World as HecsWorld};

use crate::components::*;

/// ECS World wrapper with a name index over the live entities.
///
/// All placed objects sit under a single root group whose transform is
/// applied on top of each object's local transform.
#[derive(Default)]
pub struct EngineWorld {
    world: HecsWorld,
    names: HashMap<String, Entity>,
    root: Transform,
}

impl EngineWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: Transform) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    /// Spawn a named, pickable mesh object.
    ///
    /// Names are unique: spawning a second object under an existing name
    /// makes the name resolve to the new instance.
    pub fn spawn_object(
        &mut self,
        name: &str,
        transform: Transform,
        renderer: MeshRenderer,
    ) -> Entity {
        let entity = self.world.spawn((
            Name(name.to_string()),
            transform,
            renderer,
            Pickable,
            Hover::default(),
        ));
        self.names.insert(name.to_string(), entity);
        entity
    }

    pub fn despawn(&mut self, entity: Entity) -> bool {
        let Ok(name) = self.world.get::<&Name>(entity).map(|n| n.0.clone()) else {
            return self.world.despawn(entity).is_ok();
        };
        if self.names.get(&name) == Some(&entity) {
            self.names.remove(&name);
        }
        self.world.despawn(entity).is_ok()
    }

    /// Resolves a name against the live world. Never returns a despawned entity.
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        let entity = *self.names.get(name)?;
        self.world.contains(entity).then_some(entity)
    }

    pub fn name_of(&self, entity: Entity) -> Option<String> {
        self.world.get::<&Name>(entity).ok().map(|n| n.0.clone())
    }


    pub fn entity_count(&self) -> usize {
        self.world.len() as usize
    }

    pub fn transform(&self, entity: Entity) -> Option<Transform> {
        self.world.get::<&Transform>(entity).ok().map(|t| *t)
    }

    pub fn set_transform(&mut self, entity: Entity, transform: Transform) -> bool {
        match self.world.get::<&mut Transform>(entity) {
            Ok(mut t) => {
                *t = transform;
                true
            }
            Err(_) => false,
        }
    }

    pub fn root_transform(&self) -> Transform {
        self.root
    }

    /// World-space matrix of an entity: root group times local transform.
    pub fn world_matrix(&self, entity: Entity) -> Option<Mat4> {
        self.transform(entity)
            .map(|t| self.root.to_mat4() * t.to_mat4())
    }

    /// Writes a world-space matrix back as the entity's local transform.
    pub fn set_world_matrix(&mut self, entity: Entity, world: Mat4) -> bool {
        let local = self.root.to_mat4().inverse() * world;
        self.set_transform(entity, Transform::from_mat4(local))
    }

    pub fn set_hover(&mut self, entity: Entity, hovered: bool) -> bool {
        match self.world.get::<&mut Hover>(entity) {
            Ok(mut h) => {
                h.0 = hovered;
                true
            }
            Err(_) => false,
        }
    }

    pub fn is_hovered(&self, entity: Entity) -> bool {
        self.world
            .get::<&Hover>(entity)
            .map(|h| h.0)
            .unwrap_or(false)
    }

    pub fn any_hovered(&self) -> bool {
        for hover in &mut self.world.query::<&Hover>() {
            if hover.0 {
                return true;
            }
        }
        false
    }

    /// Get underlying hecs world reference
    pub fn world(&self) -> &HecsWorld {
        &self.world
    }

    /// Get mutable underlying hecs world
    pub fn world_mut(&mut self) -> &mut HecsWorld {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn mesh(id: u64) -> MeshRenderer {
        MeshRenderer::new(MeshHandle { id })
    }

    #[test]
    fn find_by_name_tracks_live_entities() {
        let mut world = EngineWorld::new();
        let dna = world.spawn_object("DNA", Transform::default(), mesh(1));
        assert_eq!(world.find_by_name("DNA"), Some(dna));
        assert_eq!(world.find_by_name("Curly"), None);

        assert!(world.despawn(dna));
        assert_eq!(world.find_by_name("DNA"), None);
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn respawned_name_resolves_to_latest_instance() {
        let mut world = EngineWorld::new();
        let first = world.spawn_object("Table", Transform::default(), mesh(1));
        world.despawn(first);
        let second = world.spawn_object("Table", Transform::default(), mesh(1));
        assert_eq!(world.find_by_name("Table"), Some(second));
    }

    #[test]
    fn world_matrix_includes_root_group() {
        let mut world = EngineWorld::with_root(Transform::from_translation(0.0, 10.0, 0.0));
        let e = world.spawn_object("DNA", Transform::from_translation(20.0, 0.0, -17.0), mesh(1));
        let m = world.world_matrix(e).unwrap();
        assert!(m.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::new(20.0, 10.0, -17.0), 1e-5));

        let target = Mat4::from_translation(Vec3::new(0.0, 10.0, 0.0));
        assert!(world.set_world_matrix(e, target));
        assert!(world.transform(e).unwrap().position.abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn hover_flags_are_per_entity() {
        let mut world = EngineWorld::new();
        let a = world.spawn_object("A", Transform::default(), mesh(1));
        let b = world.spawn_object("B", Transform::default(), mesh(2));
        assert!(!world.any_hovered());
        world.set_hover(a, true);
        assert!(world.is_hovered(a));
        assert!(!world.is_hovered(b));
        assert!(world.any_hovered());
        world.set_hover(a, false);
        assert!(!world.any_hovered());
    }
}
