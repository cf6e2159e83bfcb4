#![cfg(test)]

use std::cell::RefCell;
use std::rc::Rc;

use crate::{Entity, Signature};

use super::*;

struct Hit {
    target: Entity,
    damage: u32,
}

struct Ping;

struct Health(u32);

#[derive(Default)]
struct DamageSystem {
    received: Vec<u32>,
}

impl DamageSystem {
    fn on_hit(&mut self, _: &[Entity], event: &Hit, registry: &mut Registry) {
        self.received.push(event.damage);
        let health = registry.get_component_mut::<Health>(event.target).unwrap();
        health.0 = health.0.saturating_sub(event.damage);
        if health.0 == 0 {
            registry.kill_entity(event.target).unwrap();
        }
    }
}

impl System for DamageSystem {
    fn signature(&self) -> Signature {
        Signature::EMPTY
    }
}

#[test]
fn test_delivery_order() {
    let mut registry = Registry::new();
    let mut bus = EventBus::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&log);
    bus.subscribe(move |_: &Ping, _| first.borrow_mut().push("first"));
    let second = Rc::clone(&log);
    bus.subscribe(move |_: &Ping, _| second.borrow_mut().push("second"));
    assert_eq!(bus.subscriber_count::<Ping>(), 2);
    assert_eq!(bus.subscriber_count::<Hit>(), 0);

    assert_eq!(bus.emit(&mut registry, Ping), 2);
    assert_eq!(*log.borrow(), vec!["first", "second"]);
}

#[test]
fn test_reset_drops_subscribers() {
    let mut registry = Registry::new();
    let mut bus = EventBus::new();
    let calls = Rc::new(RefCell::new(0));

    let counter = Rc::clone(&calls);
    bus.subscribe(move |_: &Ping, _| *counter.borrow_mut() += 1);
    bus.reset();
    assert_eq!(bus.emit(&mut registry, Ping), 0);
    assert_eq!(*calls.borrow(), 0);

    let counter = Rc::clone(&calls);
    bus.subscribe(move |_: &Ping, _| *counter.borrow_mut() += 1);
    bus.unsubscribe_all::<Hit>();
    assert_eq!(bus.emit(&mut registry, Ping), 1);
    bus.unsubscribe_all::<Ping>();
    assert_eq!(bus.subscriber_count::<Ping>(), 0);
}

#[test]
fn test_system_handler_mutates_registry() {
    let mut registry = Registry::new();
    let mut bus = EventBus::new();
    registry.add_system(DamageSystem::default()).unwrap();
    let target = registry.create_entity();
    registry.add_component(target, Health(10)).unwrap();

    bus.subscribe_system(&registry, DamageSystem::on_hit).unwrap();
    bus.emit(&mut registry, Hit { target, damage: 4 });
    bus.emit(&mut registry, Hit { target, damage: 6 });

    assert_eq!(registry.get_system::<DamageSystem>().unwrap().received, vec![4, 6]);
    assert_eq!(registry.get_component::<Health>(target).unwrap().0, 0);
    registry.update().unwrap();
    assert!(!registry.is_alive(target));
}

#[test]
fn test_removed_system_is_unsubscribed() {
    let mut registry = Registry::new();
    let mut bus = EventBus::new();
    registry.add_system(DamageSystem::default()).unwrap();
    let target = registry.create_entity();
    registry.add_component(target, Health(10)).unwrap();

    bus.subscribe_system(&registry, DamageSystem::on_hit).unwrap();
    registry.remove_system::<DamageSystem>().unwrap();
    registry.add_system(DamageSystem::default()).unwrap();

    assert_eq!(bus.emit(&mut registry, Hit { target, damage: 1 }), 0);
    assert_eq!(bus.subscriber_count::<Hit>(), 0);
    assert!(registry.get_system::<DamageSystem>().unwrap().received.is_empty());
    assert_eq!(registry.get_component::<Health>(target).unwrap().0, 10);
}

#[test]
fn test_system_subscription_requires_system() {
    let registry = Registry::new();
    let mut bus = EventBus::new();

    let result = bus.subscribe_system(&registry, DamageSystem::on_hit);
    assert!(matches!(result, Err(RegistryError::SystemNotFound(_))));
    assert_eq!(bus.subscriber_count::<Hit>(), 0);
}

#[test]
fn test_system_in_use_is_skipped() {
    let mut registry = Registry::new();
    let mut bus = EventBus::new();
    registry.add_system(DamageSystem::default()).unwrap();
    let target = registry.create_entity();
    registry.add_component(target, Health(10)).unwrap();
    bus.subscribe_system(&registry, DamageSystem::on_hit).unwrap();

    let delivered = registry
        .with_system(|_: &mut DamageSystem, _, registry| bus.emit(registry, Hit { target, damage: 3 }))
        .unwrap();
    assert_eq!(delivered, 0);
    assert_eq!(bus.subscriber_count::<Hit>(), 1);

    assert_eq!(bus.emit(&mut registry, Hit { target, damage: 3 }), 1);
    assert_eq!(registry.get_component::<Health>(target).unwrap().0, 7);
}

#[test]
fn test_system_handler_receives_members() {
    let mut registry = Registry::new();
    let mut bus = EventBus::new();
    registry.add_system(DamageSystem::default()).unwrap();
    let first = registry.create_entity();
    let second = registry.create_entity();
    registry.update().unwrap();

    let members = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&members);
    bus.subscribe_system(&registry, move |_: &mut DamageSystem, entities, _: &Ping, _| {
        sink.borrow_mut().extend_from_slice(entities)
    })
    .unwrap();

    assert_eq!(bus.emit(&mut registry, Ping), 1);
    assert_eq!(*members.borrow(), vec![first, second]);
}
