use ember_ecs::{ComponentSet, Entity, EventBus, Registry, Result, Signature};
use ultraviolet::Vec2;

use crate::components::{BoxCollider, Transform};
use crate::events::CollisionEvent;

/// World-space rectangle of a collider.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Aabb {
    min: Vec2,
    max: Vec2,
}

impl Aabb {
    fn new(transform: &Transform, collider: &BoxCollider) -> Self {
        let min = transform.position + collider.offset;
        let size = Vec2::new(
            collider.width * transform.scale.x,
            collider.height * transform.scale.y,
        );
        Self {
            min,
            max: min + size,
        }
    }

    /// Boxes which only touch by an edge do not overlap.
    fn overlaps(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Detects overlapping colliders and reports them through the event bus.
pub struct CollisionSystem {
    signature: Signature,
}

impl CollisionSystem {
    pub fn new() -> Result<Self> {
        Ok(Self {
            signature: <(Transform, BoxCollider)>::signature()?,
        })
    }

    /// Marks colliding boxes and emits one [`CollisionEvent`] per overlapping pair.
    ///
    /// Returns how many pairs overlap.
    ///
    pub fn update(
        &mut self,
        entities: &[Entity],
        registry: &mut Registry,
        bus: &mut EventBus,
    ) -> Result<usize> {
        let mut boxes = Vec::with_capacity(entities.len());
        for &entity in entities {
            let transform = registry.get_component::<Transform>(entity)?;
            let collider = registry.get_component::<BoxCollider>(entity)?;
            boxes.push((entity, Aabb::new(transform, collider)));
        }

        let mut collisions = Vec::new();
        for (index, &(a, box_a)) in boxes.iter().enumerate() {
            for &(b, box_b) in &boxes[index + 1..] {
                if box_a.overlaps(&box_b) {
                    collisions.push(CollisionEvent { a, b });
                }
            }
        }

        for &(entity, _) in &boxes {
            registry.get_component_mut::<BoxCollider>(entity)?.colliding = false;
        }
        for event in &collisions {
            set_colliding(registry, event.a)?;
            set_colliding(registry, event.b)?;
        }

        for &event in &collisions {
            log::trace!("collision between entities {} and {}", event.a, event.b);
            bus.emit(registry, event);
        }
        Ok(collisions.len())
    }
}

fn set_colliding(registry: &mut Registry, entity: Entity) -> Result<()> {
    registry.get_component_mut::<BoxCollider>(entity)?.colliding = true;
    Ok(())
}

impl_system!(CollisionSystem);
