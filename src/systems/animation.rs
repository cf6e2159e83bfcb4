use ember_ecs::{ComponentSet, Entity, Registry, Result, Signature};

use crate::components::{Animation, Sprite};

/// Advances animations and shows their current frame through the sprite.
pub struct AnimationSystem {
    signature: Signature,
}

impl AnimationSystem {
    pub fn new() -> Result<Self> {
        Ok(Self {
            signature: <(Animation, Sprite)>::signature()?,
        })
    }

    pub fn update(&mut self, entities: &[Entity], registry: &mut Registry, delta_time: f32) -> Result<()> {
        for &entity in entities {
            let animation = registry.get_component_mut::<Animation>(entity)?;
            animation.advance(delta_time);
            let frame = animation.current_frame;

            let sprite = registry.get_component_mut::<Sprite>(entity)?;
            sprite.source.x = frame as f32 * sprite.width;
        }
        Ok(())
    }
}

impl_system!(AnimationSystem);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_move_source() {
        let mut registry = Registry::new();
        registry.add_system(AnimationSystem::new().unwrap()).unwrap();
        let chopper = registry
            .spawn()
            .with(Sprite::new("chopper", 32.0, 32.0, 1).with_source(0.0, 64.0))
            .and_then(|entity| entity.with(Animation::new(2, 4.0, true)))
            .unwrap()
            .id();
        registry.update().unwrap();

        let animate = |registry: &mut Registry| {
            registry
                .with_system(|system: &mut AnimationSystem, entities, registry| {
                    system.update(entities, registry, 0.25)
                })
                .unwrap()
                .unwrap();
            registry.get_component::<Sprite>(chopper).unwrap().source
        };
        assert_eq!(animate(&mut registry).x, 32.0);
        let source = animate(&mut registry);
        assert_eq!((source.x, source.y), (0.0, 64.0));
        assert_eq!(registry.get_component::<Animation>(chopper).unwrap().current_frame, 0);
    }
}
