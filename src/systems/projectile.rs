use ember_ecs::{ComponentSet, Entity, Registry, Result, Signature};
use ultraviolet::Vec2;

use crate::components::{BoxCollider, Projectile, ProjectileEmitter, RigidBody, Sprite, Transform};

/// Side of the square projectile sprite and collider.
const PROJECTILE_SIZE: f32 = 4.0;

/// Layer of projectile sprites.
const PROJECTILE_Z_INDEX: i32 = 4;

/// Spawns projectiles from every emitter whose interval has passed.
pub struct ProjectileEmitSystem {
    signature: Signature,
}

impl ProjectileEmitSystem {
    pub fn new() -> Result<Self> {
        Ok(Self {
            signature: <(ProjectileEmitter, Transform)>::signature()?,
        })
    }

    /// Returns how many projectiles were spawned.
    pub fn update(&mut self, entities: &[Entity], registry: &mut Registry, delta_time: f32) -> Result<usize> {
        let mut spawned = 0;
        for &entity in entities {
            let emitter = registry.get_component_mut::<ProjectileEmitter>(entity)?;
            emitter.cooldown += delta_time;
            if emitter.cooldown < emitter.interval {
                continue;
            }
            emitter.cooldown = 0.0;
            let emitter = *emitter;

            // Projectiles start from the center of the sprite, if there is one.
            let transform = *registry.get_component::<Transform>(entity)?;
            let mut position = transform.position;
            if let Ok(sprite) = registry.get_component::<Sprite>(entity) {
                position += Vec2::new(
                    sprite.width * transform.scale.x / 2.0,
                    sprite.height * transform.scale.y / 2.0,
                );
            }

            let projectile = registry
                .spawn()
                .with(Transform::new(position, Vec2::one(), 0.0))?
                .with(RigidBody {
                    velocity: emitter.velocity,
                })?
                .with(Sprite::new("bullet", PROJECTILE_SIZE, PROJECTILE_SIZE, PROJECTILE_Z_INDEX))?
                .with(BoxCollider::new(PROJECTILE_SIZE, PROJECTILE_SIZE))?
                .with(Projectile::new(emitter.friendly, emitter.damage, emitter.duration))?
                .id();
            log::debug!("entity {} emitted projectile {}", entity, projectile);
            spawned += 1;
        }
        Ok(spawned)
    }
}

impl_system!(ProjectileEmitSystem);

/// Kills projectiles which outlived their duration.
pub struct ProjectileLifecycleSystem {
    signature: Signature,
}

impl ProjectileLifecycleSystem {
    pub fn new() -> Result<Self> {
        Ok(Self {
            signature: <(Projectile,)>::signature()?,
        })
    }

    pub fn update(&mut self, entities: &[Entity], registry: &mut Registry, delta_time: f32) -> Result<()> {
        for &entity in entities {
            // Spent projectiles lose the component before they leave the system.
            let projectile = match registry.get_component_mut::<Projectile>(entity) {
                Ok(projectile) => projectile,
                Err(_) => continue,
            };
            projectile.elapsed += delta_time;
            if projectile.is_expired() {
                registry.kill_entity(entity)?;
            }
        }
        Ok(())
    }
}

impl_system!(ProjectileLifecycleSystem);
