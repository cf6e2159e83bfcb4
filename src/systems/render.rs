use ember_ecs::{ComponentSet, Entity, Registry, Result, Signature};
use ultraviolet::Vec2;

use crate::camera::Camera;
use crate::components::{BoxCollider, Sprite, Transform};

/// One sprite to be drawn, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub entity: Entity,
    pub asset_id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub z_index: i32,
    /// Top left corner of the drawn part of the image.
    pub source: Vec2,
}

/// Builds the list of sprites to draw, from the bottom layer to the top one.
pub struct RenderSystem {
    signature: Signature,
}

impl RenderSystem {
    pub fn new() -> Result<Self> {
        Ok(Self {
            signature: <(Transform, Sprite)>::signature()?,
        })
    }

    /// Sprites of the same layer keep the order in which their entities joined the system.
    pub fn render(&self, entities: &[Entity], registry: &Registry, camera: &Camera) -> Result<Vec<DrawCommand>> {
        let mut commands = entities
            .iter()
            .map(|&entity| -> Result<DrawCommand> {
                let transform = registry.get_component::<Transform>(entity)?;
                let sprite = registry.get_component::<Sprite>(entity)?;
                let position = camera.to_screen(transform.position);
                Ok(DrawCommand {
                    entity,
                    asset_id: sprite.asset_id.clone(),
                    x: position.x,
                    y: position.y,
                    width: sprite.width * transform.scale.x,
                    height: sprite.height * transform.scale.y,
                    z_index: sprite.z_index,
                    source: sprite.source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        commands.sort_by_key(|command| command.z_index);
        Ok(commands)
    }
}

impl_system!(RenderSystem);

/// Outline of a collider, in screen coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColliderOutline {
    pub entity: Entity,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Colliding boxes are highlighted.
    pub colliding: bool,
}

/// Builds outlines of all colliders for debugging.
pub struct RenderColliderSystem {
    signature: Signature,
}

impl RenderColliderSystem {
    pub fn new() -> Result<Self> {
        Ok(Self {
            signature: <(Transform, BoxCollider)>::signature()?,
        })
    }

    pub fn render(&self, entities: &[Entity], registry: &Registry, camera: &Camera) -> Result<Vec<ColliderOutline>> {
        entities
            .iter()
            .map(|&entity| -> Result<ColliderOutline> {
                let transform = registry.get_component::<Transform>(entity)?;
                let collider = registry.get_component::<BoxCollider>(entity)?;
                let position = camera.to_screen(transform.position + collider.offset);
                Ok(ColliderOutline {
                    entity,
                    x: position.x,
                    y: position.y,
                    width: collider.width * transform.scale.x,
                    height: collider.height * transform.scale.y,
                    colliding: collider.colliding,
                })
            })
            .collect()
    }
}

impl_system!(RenderColliderSystem);
