use ember_ecs::{ComponentSet, Entity, Registry, Result, Signature};

use crate::components::{RigidBody, Transform};

/// Moves entities along their velocity.
pub struct MovementSystem {
    signature: Signature,
}

impl MovementSystem {
    pub fn new() -> Result<Self> {
        Ok(Self {
            signature: <(Transform, RigidBody)>::signature()?,
        })
    }

    pub fn update(&mut self, entities: &[Entity], registry: &mut Registry, delta_time: f32) -> Result<()> {
        for &entity in entities {
            let velocity = registry.get_component::<RigidBody>(entity)?.velocity;
            let transform = registry.get_component_mut::<Transform>(entity)?;
            transform.position += velocity * delta_time;
        }
        Ok(())
    }
}

impl_system!(MovementSystem);
