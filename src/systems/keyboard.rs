use ember_ecs::{ComponentSet, Entity, EventBus, Registry, Result, Signature};
use ultraviolet::Vec2;

use crate::components::{KeyboardControlled, RigidBody};
use crate::events::{Key, KeyPressedEvent};

/// Steers keyboard controlled entities: arrows set the direction, space stops them.
pub struct KeyboardControlSystem {
    signature: Signature,
}

impl KeyboardControlSystem {
    pub fn new() -> Result<Self> {
        Ok(Self {
            signature: <(KeyboardControlled, RigidBody)>::signature()?,
        })
    }

    pub fn subscribe_to_events(bus: &mut EventBus, registry: &Registry) -> Result<()> {
        bus.subscribe_system(registry, Self::on_key_pressed)
    }

    fn on_key_pressed(
        &mut self,
        entities: &[Entity],
        event: &KeyPressedEvent,
        registry: &mut Registry,
    ) {
        log::debug!("key pressed: {}", event.key);

        let direction = match event.key {
            Key::Up => Vec2::new(0.0, -1.0),
            Key::Right => Vec2::new(1.0, 0.0),
            Key::Down => Vec2::new(0.0, 1.0),
            Key::Left => Vec2::new(-1.0, 0.0),
            Key::Space => Vec2::zero(),
        };
        for &entity in entities {
            let speed = match registry.get_component::<KeyboardControlled>(entity) {
                Ok(controlled) => controlled.speed,
                Err(error) => {
                    log::error!("keyboard control of entity {} failed: {}", entity, error);
                    continue;
                }
            };
            if let Ok(body) = registry.get_component_mut::<RigidBody>(entity) {
                body.velocity = direction * speed;
            }
        }
    }
}

impl_system!(KeyboardControlSystem);
