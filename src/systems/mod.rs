//! Systems of the demo game.

pub use animation::AnimationSystem;
pub use camera::CameraMovementSystem;
pub use collision::CollisionSystem;
pub use damage::DamageSystem;
pub use keyboard::KeyboardControlSystem;
pub use movement::MovementSystem;
pub use projectile::{ProjectileEmitSystem, ProjectileLifecycleSystem};
pub use render::{ColliderOutline, DrawCommand, RenderColliderSystem, RenderSystem};

// Implements `System` for a struct which keeps its required components in the `signature` field.
macro_rules! impl_system {
    ($system:ty) => {
        impl ember_ecs::System for $system {
            fn signature(&self) -> ember_ecs::Signature {
                self.signature
            }
        }
    };
}

mod animation;
mod camera;
mod collision;
mod damage;
mod keyboard;
mod movement;
mod projectile;
mod render;
