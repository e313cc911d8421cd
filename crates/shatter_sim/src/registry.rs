//! Body registry
//!
//! Owns every tracked entity. Lookups go both ways: entity id to entity, and
//! engine body handle back to entity id, so contact manifolds never need a
//! pointer stored inside the engine.

use crate::entity::{BodyKind, EntityId, SimEntity};
use shatter_physics::BodyHandle;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct BodyRegistry {
    entities: HashMap<EntityId, SimEntity>,
    /// Dynamic entities in registration order
    dynamic: Vec<EntityId>,
    by_body: HashMap<BodyHandle, EntityId>,
    next_id: u64,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Track an entity; dynamic ones join the sync set
    pub fn register(&mut self, entity: SimEntity) -> EntityId {
        let id = entity.id;
        self.by_body.insert(entity.body, id);
        if entity.kind == BodyKind::Dynamic {
            self.dynamic.push(id);
        }
        self.entities.insert(id, entity);
        id
    }

    /// Stop tracking an entity
    pub fn unregister(&mut self, id: EntityId) -> Option<SimEntity> {
        let entity = self.entities.remove(&id)?;
        self.by_body.remove(&entity.body);
        if entity.kind == BodyKind::Dynamic {
            self.dynamic.retain(|d| *d != id);
        }
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&SimEntity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut SimEntity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Entity owning an engine body; `None` for untracked colliders
    pub fn is_tracked(&self, body: BodyHandle) -> Option<&SimEntity> {
        self.by_body.get(&body).and_then(|id| self.entities.get(id))
    }

    pub fn for_each_dynamic_mut(&mut self, mut f: impl FnMut(&mut SimEntity)) {
        for id in &self.dynamic {
            if let Some(entity) = self.entities.get_mut(id) {
                f(entity);
            }
        }
    }

    /// Dynamic entity ids in registration order
    pub fn dynamic_ids(&self) -> &[EntityId] {
        &self.dynamic
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEntity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn dynamic_count(&self) -> usize {
        self.dynamic.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Pose;
    use glam::Vec3;
    use shatter_physics::ShapeDesc;

    fn entity(registry: &mut BodyRegistry, index: u32, mass: f32) -> SimEntity {
        SimEntity {
            id: registry.allocate_id(),
            body: BodyHandle::from_raw_parts(index, 0),
            kind: BodyKind::from_mass(mass),
            pose: Pose::IDENTITY,
            mass,
            shape: ShapeDesc::ball(0.5),
            local_inertia: Vec3::ZERO,
            breakable: true,
            collided_this_pass: false,
            initial_velocity: None,
            initial_angular_velocity: None,
            color: 0,
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = BodyRegistry::new();
        let ground = entity(&mut registry, 0, 0.0);
        let cup = entity(&mut registry, 1, 5.0);
        let ground = registry.register(ground);
        let cup = registry.register(cup);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.dynamic_ids(), &[cup]);
        assert_eq!(registry.is_tracked(BodyHandle::from_raw_parts(0, 0)).map(SimEntity::id), Some(ground));
        assert!(registry.is_tracked(BodyHandle::from_raw_parts(7, 0)).is_none());
        assert_eq!(registry.is_tracked(BodyHandle::from_raw_parts(1, 0)).map(SimEntity::id), Some(cup));
    }

    #[test]
    fn test_unregister_keeps_order() {
        let mut registry = BodyRegistry::new();
        let ids: Vec<_> = (0..4)
            .map(|i| {
                let e = entity(&mut registry, i, 1.0);
                registry.register(e)
            })
            .collect();

        let removed = registry.unregister(ids[1]).unwrap();
        assert!(registry.is_tracked(removed.body()).is_none());
        assert_eq!(registry.dynamic_ids(), &[ids[0], ids[2], ids[3]]);
        assert!(registry.unregister(ids[1]).is_none());
    }

    #[test]
    fn test_static_entities_are_not_iterated() {
        let mut registry = BodyRegistry::new();
        let ground = entity(&mut registry, 0, 0.0);
        registry.register(ground);

        let mut visited = 0;
        registry.for_each_dynamic_mut(|_| visited += 1);
        assert_eq!(visited, 0);
        assert_eq!(registry.dynamic_count(), 0);
        assert!(!registry.iter().any(SimEntity::is_breakable));
    }
}
