//! World wrapper around hecs

use glam::Vec3;
use hecs::Entity;

use crate::ecs::ActionSite;

/// Resolves action targets to world positions.
///
/// Gameplay owns the targets; navigation only asks where they are and
/// whether they still exist.
pub trait TargetLookup {
    /// Position of a live target, `None` once it has been removed
    fn target_position(&self, target: Entity) -> Option<Vec3>;
}

/// Gameplay world holding the objects agents act on
pub struct World {
    /// The underlying hecs world
    pub inner: hecs::World,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn an entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Spawn an action site at a position
    pub fn spawn_site(&mut self, position: Vec3) -> Entity {
        self.inner.spawn((ActionSite::new(position),))
    }

    /// Despawn an entity
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(entity)
    }

    /// Get a reference to a component
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Check if an entity exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }

    /// Get the number of entities
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetLookup for World {
    fn target_position(&self, target: Entity) -> Option<Vec3> {
        self.get::<ActionSite>(target).ok().map(|site| site.position)
    }
}

impl TargetLookup for hecs::World {
    fn target_position(&self, target: Entity) -> Option<Vec3> {
        self.get::<&ActionSite>(target).ok().map(|site| site.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Name;

    #[test]
    fn test_site_lookup() {
        let mut world = World::new();
        let rock = world.spawn_site(Vec3::new(2.0, 0.0, 3.0));

        assert_eq!(world.target_position(rock), Some(Vec3::new(2.0, 0.0, 3.0)));
    }

    #[test]
    fn test_despawned_site_is_gone() {
        let mut world = World::new();
        let rock = world.spawn_site(Vec3::ZERO);
        world.despawn(rock).unwrap();

        assert!(!world.contains(rock));
        assert_eq!(world.target_position(rock), None);
    }

    #[test]
    fn test_entity_without_site_is_not_a_target() {
        let mut world = World::new();
        let sign = world.spawn((Name::new("sign"),));

        assert!(world.contains(sign));
        assert_eq!(world.target_position(sign), None);
    }

    #[test]
    fn test_raw_hecs_world_lookup() {
        let mut world = hecs::World::new();
        let tree = world.spawn((ActionSite::new(Vec3::Z),));

        assert_eq!(world.target_position(tree), Some(Vec3::Z));
    }
}
