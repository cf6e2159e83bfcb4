use ember_ecs::{ComponentSet, Entity, EventBus, Registry, Result, Signature};

use crate::components::{BoxCollider, Health, KeyboardControlled, Projectile};
use crate::events::CollisionEvent;

/// Applies damage of projectiles to the entities they collide with.
///
/// Friendly projectiles hit everything but the player, hostile ones hit the player only.
/// A projectile is spent on its first hit, and an entity without health left is killed.
///
pub struct DamageSystem {
    signature: Signature,
    hits: usize,
}

impl DamageSystem {
    pub fn new() -> Result<Self> {
        Ok(Self {
            signature: <(BoxCollider,)>::signature()?,
            hits: 0,
        })
    }

    /// Number of projectile hits since the system was created.
    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn subscribe_to_events(bus: &mut EventBus, registry: &Registry) -> Result<()> {
        bus.subscribe_system(registry, Self::on_collision)
    }

    fn on_collision(&mut self, _: &[Entity], event: &CollisionEvent, registry: &mut Registry) {
        log::debug!(
            "damage system received a collision between entities {} and {}",
            event.a,
            event.b,
        );
        for (projectile, target) in [(event.a, event.b), (event.b, event.a)] {
            if let Err(error) = self.hit(registry, projectile, target) {
                log::error!("projectile {} failed to hit entity {}: {}", projectile, target, error);
            }
        }
    }

    fn hit(&mut self, registry: &mut Registry, projectile: Entity, target: Entity) -> Result<()> {
        let Projectile {
            friendly, damage, ..
        } = match registry.get_component::<Projectile>(projectile) {
            Ok(&component) => component,
            Err(_) => return Ok(()),
        };
        let is_player = registry.has_component::<KeyboardControlled>(target);
        if !registry.has_component::<Health>(target) || friendly == is_player {
            return Ok(());
        }

        registry.remove_component::<Projectile>(projectile)?;
        registry.kill_entity(projectile)?;
        self.hits += 1;

        let health = registry.get_component_mut::<Health>(target)?;
        health.percentage = health.percentage.saturating_sub(damage);
        log::info!("entity {} was hit, health left: {}%", target, health.percentage);
        if health.is_depleted() {
            registry.kill_entity(target)?;
        }
        Ok(())
    }
}

impl_system!(DamageSystem);
