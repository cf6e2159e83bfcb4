use ember_ecs::{ComponentSet, Entity, Registry, Result, Signature};

use crate::camera::Camera;
use crate::components::{CameraFollow, Transform};

/// Moves the camera after the followed entity.
pub struct CameraMovementSystem {
    signature: Signature,
}

impl CameraMovementSystem {
    pub fn new() -> Result<Self> {
        Ok(Self {
            signature: <(CameraFollow, Transform)>::signature()?,
        })
    }

    /// If several entities are followed, the camera ends up on the last one.
    pub fn update(&mut self, entities: &[Entity], registry: &Registry, camera: &mut Camera) -> Result<()> {
        for &entity in entities {
            let transform = registry.get_component::<Transform>(entity)?;
            camera.center_on(transform.position);
        }
        Ok(())
    }
}

impl_system!(CameraMovementSystem);
