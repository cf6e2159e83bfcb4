#![cfg(test)]

use std::panic::{self, AssertUnwindSafe};

use crate::{component_id, ComponentSet, Entity, RegistryError, System};

use super::*;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
}

#[derive(Debug, PartialEq)]
struct Name(&'static str);

struct MovementSystem {
    signature: Signature,
    added: usize,
    removed: usize,
}

impl MovementSystem {
    fn new() -> Self {
        Self {
            signature: <(Position, Velocity)>::signature().unwrap(),
            added: 0,
            removed: 0,
        }
    }

    fn update(&mut self, entities: &[Entity], registry: &mut Registry, delta_time: f32) {
        for &entity in entities {
            let velocity = *registry.get_component::<Velocity>(entity).unwrap();
            let position = registry.get_component_mut::<Position>(entity).unwrap();
            position.x += velocity.x * delta_time;
            position.y += velocity.y * delta_time;
        }
    }
}

impl System for MovementSystem {
    fn signature(&self) -> Signature {
        self.signature
    }

    fn on_entity_added(&mut self, _entity: Entity) {
        self.added += 1;
    }

    fn on_entity_removed(&mut self, _entity: Entity) {
        self.removed += 1;
    }
}

struct NamingSystem;

impl System for NamingSystem {
    fn signature(&self) -> Signature {
        <(Name,)>::signature().unwrap()
    }
}

fn moving_entity(registry: &mut Registry) -> Entity {
    let entity = registry.create_entity();
    registry.add_component(entity, Position { x: 0.0, y: 0.0 }).unwrap();
    registry.add_component(entity, Velocity { x: 5.0, y: 0.0 }).unwrap();
    entity
}

#[test]
fn test_entity_ids_are_reused_in_free_order() {
    let mut registry = Registry::new();
    let entities: Vec<_> = (0..4).map(|_| registry.create_entity()).collect();
    let ids: Vec<_> = entities.iter().map(Entity::id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);

    registry.kill_entity(entities[2]).unwrap();
    registry.kill_entity(entities[0]).unwrap();
    assert_eq!(registry.entity_count(), 4);
    registry.update().unwrap();
    assert_eq!(registry.entity_count(), 2);

    let first = registry.create_entity();
    let second = registry.create_entity();
    let third = registry.create_entity();
    assert_eq!(first.id(), 2);
    assert_eq!(second.id(), 0);
    assert_eq!(third.id(), 4);
    assert_eq!(first.generation(), entities[2].generation() + 1);
}

#[test]
fn test_stale_handle_is_rejected() {
    let mut registry = Registry::new();
    let entity = moving_entity(&mut registry);
    registry.update().unwrap();

    registry.kill_entity(entity).unwrap();
    assert!(registry.is_alive(entity));
    assert!(registry.has_component::<Position>(entity));
    registry.update().unwrap();

    assert!(!registry.is_alive(entity));
    assert!(!registry.has_component::<Position>(entity));
    assert_eq!(
        registry.get_component::<Position>(entity),
        Err(RegistryError::StaleEntity(entity)),
    );
    assert_eq!(
        registry.kill_entity(entity),
        Err(RegistryError::StaleEntity(entity)),
    );

    let reused = registry.create_entity();
    assert_eq!(reused.id(), entity.id());
    assert!(!registry.has_component::<Position>(reused));
    assert_eq!(registry.signature(reused), Ok(Signature::EMPTY));
    assert_eq!(
        registry.add_component(entity, Name("ghost")),
        Err(RegistryError::StaleEntity(entity)),
    );
}

#[test]
fn test_foreign_entity_is_rejected() {
    let mut registry = Registry::new();
    let mut other = Registry::new();
    let entity = registry.create_entity();
    let foreign = other.create_entity();
    assert_eq!(entity.id(), foreign.id());

    assert!(!registry.is_alive(foreign));
    assert_eq!(
        registry.add_component(foreign, Name("foreign")),
        Err(RegistryError::StaleEntity(foreign)),
    );
}

#[test]
fn test_signature_follows_components() {
    let mut registry = Registry::new();
    let entity = registry.create_entity();
    let position = component_id::<Position>().unwrap();
    let velocity = component_id::<Velocity>().unwrap();

    registry.add_component(entity, Position { x: 1.0, y: 2.0 }).unwrap();
    let signature = registry.signature(entity).unwrap();
    assert!(signature.test(position));
    assert!(!signature.test(velocity));

    let previous = registry.add_component(entity, Position { x: 3.0, y: 4.0 }).unwrap();
    assert_eq!(previous, Some(Position { x: 1.0, y: 2.0 }));
    assert_eq!(
        registry.get_component::<Position>(entity),
        Ok(&Position { x: 3.0, y: 4.0 }),
    );

    let removed = registry.remove_component::<Position>(entity).unwrap();
    assert_eq!(removed, Some(Position { x: 3.0, y: 4.0 }));
    assert!(registry.signature(entity).unwrap().is_empty());
    assert_eq!(registry.remove_component::<Position>(entity), Ok(None));
    assert_eq!(registry.remove_component::<Velocity>(entity), Ok(None));
}

#[test]
fn test_missing_component() {
    struct NeverAttached;

    let mut registry = Registry::new();
    let entity = registry.create_entity();
    registry.add_component(entity, Name("lonely")).unwrap();

    assert!(!registry.has_component::<NeverAttached>(entity));
    assert!(matches!(
        registry.get_component::<Position>(entity),
        Err(RegistryError::ComponentNotFound { entity: found, .. }) if found == entity
    ));
    assert!(registry.get_component_mut::<NeverAttached>(entity).is_err());
    assert_eq!(registry.get_component::<Name>(entity), Ok(&Name("lonely")));
}

#[test]
fn test_membership_is_deferred() {
    let mut registry = Registry::new();
    registry.add_system(MovementSystem::new()).unwrap();

    let entity = moving_entity(&mut registry);
    assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());
    assert_eq!(registry.pending_count(), (1, 0));

    registry.update().unwrap();
    assert_eq!(registry.system_entities::<MovementSystem>().unwrap(), &[entity]);
    assert_eq!(registry.get_system::<MovementSystem>().unwrap().added, 1);
    assert_eq!(registry.pending_count(), (0, 0));

    registry.kill_entity(entity).unwrap();
    registry.kill_entity(entity).unwrap();
    assert_eq!(registry.pending_count(), (0, 1));
    assert_eq!(
        registry.system_entities::<MovementSystem>().unwrap(),
        &[entity],
    );

    registry.update().unwrap();
    assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());
    assert_eq!(registry.get_system::<MovementSystem>().unwrap().removed, 1);
}

#[test]
fn test_only_matching_entities_join() {
    let mut registry = Registry::new();
    registry.add_system(MovementSystem::new()).unwrap();
    registry.add_system(NamingSystem).unwrap();

    let moving = moving_entity(&mut registry);
    let still = registry.create_entity();
    registry.add_component(still, Position { x: 0.0, y: 0.0 }).unwrap();
    registry.add_component(still, Name("still")).unwrap();
    registry.update().unwrap();

    assert_eq!(
        registry.system_entities::<MovementSystem>().unwrap(),
        &[moving],
    );
    assert_eq!(
        registry.system_entities::<NamingSystem>().unwrap(),
        &[still],
    );
}

#[test]
fn test_created_and_killed_in_same_frame() {
    let mut registry = Registry::new();
    registry.add_system(MovementSystem::new()).unwrap();

    let entity = moving_entity(&mut registry);
    registry.kill_entity(entity).unwrap();
    registry.update().unwrap();

    assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());
    let system = registry.get_system::<MovementSystem>().unwrap();
    assert_eq!((system.added, system.removed), (1, 1));
    assert!(!registry.is_alive(entity));
    assert_eq!(registry.entity_count(), 0);
}

#[test]
fn test_component_change_moves_entity_between_systems() {
    let mut registry = Registry::new();
    registry.add_system(MovementSystem::new()).unwrap();
    let entity = moving_entity(&mut registry);
    registry.update().unwrap();

    registry.remove_component::<Velocity>(entity).unwrap();
    assert_eq!(
        registry.system_entities::<MovementSystem>().unwrap(),
        &[entity],
    );
    registry.update().unwrap();
    assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());

    registry.add_component(entity, Velocity { x: 1.0, y: 1.0 }).unwrap();
    registry.add_component(entity, Velocity { x: 2.0, y: 2.0 }).unwrap();
    registry.update().unwrap();
    assert_eq!(registry.system_entities::<MovementSystem>().unwrap(), &[entity]);
    let system = registry.get_system::<MovementSystem>().unwrap();
    assert_eq!((system.added, system.removed), (2, 1));
}

#[test]
fn test_late_system_receives_committed_entities() {
    let mut registry = Registry::new();
    let committed = moving_entity(&mut registry);
    registry.update().unwrap();
    let pending = moving_entity(&mut registry);

    registry.add_system(MovementSystem::new()).unwrap();
    assert_eq!(
        registry.system_entities::<MovementSystem>().unwrap(),
        &[committed],
    );

    registry.update().unwrap();
    assert_eq!(
        registry.system_entities::<MovementSystem>().unwrap(),
        &[committed, pending],
    );
}

#[test]
fn test_system_lifecycle() {
    let mut registry = Registry::new();
    assert!(!registry.has_system::<MovementSystem>());
    assert!(matches!(
        registry.get_system::<MovementSystem>(),
        Err(RegistryError::SystemNotFound(_))
    ));

    registry.add_system(MovementSystem::new()).unwrap();
    assert!(registry.has_system::<MovementSystem>());
    assert!(matches!(
        registry.add_system(MovementSystem::new()),
        Err(RegistryError::SystemAlreadyRegistered(_))
    ));
    assert_eq!(registry.system_count(), 1);

    registry.get_system_mut::<MovementSystem>().unwrap().added = 7;
    let removed = registry.remove_system::<MovementSystem>().unwrap();
    assert_eq!(removed.added, 7);
    assert!(!registry.has_system::<MovementSystem>());
    assert_eq!(registry.system_count(), 0);
    assert!(registry.remove_system::<MovementSystem>().is_err());
}

#[test]
fn test_system_in_use() {
    let mut registry = Registry::new();
    registry.add_system(MovementSystem::new()).unwrap();
    registry.add_system(NamingSystem).unwrap();
    let entity = moving_entity(&mut registry);

    let result = registry
        .with_system(|_: &mut MovementSystem, _, registry| {
            assert!(matches!(
                registry.get_system::<MovementSystem>(),
                Err(RegistryError::SystemInUse(_))
            ));
            assert!(matches!(
                registry.system_entities::<MovementSystem>(),
                Err(RegistryError::SystemInUse(_))
            ));
            assert!(matches!(
                registry.remove_system::<MovementSystem>(),
                Err(RegistryError::SystemInUse(_))
            ));
            assert!(registry.get_system::<NamingSystem>().is_ok());
            registry.update()
        })
        .unwrap();
    assert!(matches!(result, Err(RegistryError::SystemInUse(_))));
    assert_eq!(registry.pending_count(), (1, 0));

    registry.update().unwrap();
    assert_eq!(
        registry.system_entities::<MovementSystem>().unwrap(),
        &[entity],
    );
}

#[test]
fn test_movement_frame() {
    let mut registry = Registry::new();
    registry.add_system(MovementSystem::new()).unwrap();
    let entity = moving_entity(&mut registry);
    registry.update().unwrap();

    registry
        .with_system(|system: &mut MovementSystem, entities, registry| {
            system.update(entities, registry, 1.0)
        })
        .unwrap();
    assert_eq!(
        registry.get_component::<Position>(entity),
        Ok(&Position { x: 5.0, y: 0.0 }),
    );

    registry.kill_entity(entity).unwrap();
    registry.update().unwrap();
    assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());
    assert_eq!(registry.create_entity().id(), entity.id());
}

#[test]
fn test_entity_view() {
    let mut registry = Registry::new();
    let entity = registry
        .spawn()
        .with(Position { x: 1.0, y: 1.0 })
        .and_then(|view| view.with(Name("view")))
        .unwrap()
        .id();

    let mut view = registry.entity_mut(entity).unwrap();
    assert!(view.has::<Position>());
    assert!(!view.has::<Velocity>());
    view.get_mut::<Position>().unwrap().x = 10.0;
    assert_eq!(view.get::<Position>().unwrap().x, 10.0);
    assert_eq!(view.remove::<Name>(), Ok(Some(Name("view"))));
    assert_eq!(view.signature().unwrap().len(), 1);
    view.kill().unwrap();

    registry.update().unwrap();
    assert!(registry.entity_mut(entity).is_err());
}

#[test]
fn test_system_signature_is_fixed_on_add() {
    let mut registry = Registry::new();
    registry.add_system(MovementSystem::new()).unwrap();
    let moving = moving_entity(&mut registry);
    registry.update().unwrap();

    let required = registry.system_base::<MovementSystem>().unwrap().signature();
    registry.get_system_mut::<MovementSystem>().unwrap().signature = <(Name,)>::signature().unwrap();
    assert_eq!(
        registry.system_base::<MovementSystem>().unwrap().signature(),
        required,
    );

    let named = registry.spawn().with(Name("named")).unwrap().id();
    registry.update().unwrap();
    assert_eq!(registry.system_entities::<MovementSystem>().unwrap(), &[moving]);
    assert!(registry.is_alive(named));

    registry.kill_entity(moving).unwrap();
    registry.update().unwrap();
    assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());
    assert_eq!(registry.get_system::<MovementSystem>().unwrap().removed, 1);
}

#[test]
fn test_members_are_passed_to_borrowed_system() {
    let mut registry = Registry::new();
    registry.add_system(MovementSystem::new()).unwrap();
    let first = moving_entity(&mut registry);
    let second = moving_entity(&mut registry);
    registry.update().unwrap();

    let members = registry
        .with_system(|_: &mut MovementSystem, entities, _| entities.to_vec())
        .unwrap();
    assert_eq!(members, vec![first, second]);
    assert_eq!(
        registry.system_entities::<MovementSystem>().unwrap(),
        &[first, second],
    );
}

#[test]
fn test_system_is_restored_after_panic() {
    let mut registry = Registry::new();
    registry.add_system(MovementSystem::new()).unwrap();
    let entity = moving_entity(&mut registry);
    registry.update().unwrap();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        registry.with_system(|_: &mut MovementSystem, _, _| panic!("system failed"))
    }));
    assert!(result.is_err());

    assert!(registry.get_system::<MovementSystem>().is_ok());
    assert_eq!(registry.system_entities::<MovementSystem>().unwrap(), &[entity]);
    registry.kill_entity(entity).unwrap();
    assert_eq!(registry.update(), Ok(()));
}

#[test]
fn test_exhausted_id_is_retired() {
    let mut registry = Registry::new();
    let old = registry.create_entity();
    registry.kill_entity(old).unwrap();
    registry.update().unwrap();

    let entity = registry.create_entity();
    assert_eq!(entity.id(), old.id());
    registry.generations[entity.index()] = u32::MAX - 1;
    let last = Entity::new(entity.id(), u32::MAX - 1, registry.id());
    assert!(registry.is_alive(last));

    registry.kill_entity(last).unwrap();
    registry.update().unwrap();
    assert!(!registry.is_alive(last));

    let fresh = registry.create_entity();
    assert_ne!(fresh.id(), entity.id());
    assert_eq!(registry.entity_count(), 1);
}
