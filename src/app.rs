//! Frame loop of the demo game.

use ember_ecs::{EventBus, Registry};
use ultraviolet::Vec2;

use crate::camera::Camera;
use crate::components::{
    Animation, BoxCollider, CameraFollow, Health, KeyboardControlled, ProjectileEmitter, RigidBody,
    Sprite, Transform,
};
use crate::config::{Config, ENGINE_NAME, ENGINE_VERSION};
use crate::error::Result;
use crate::events::KeyPressedEvent;
use crate::input::InputScript;
use crate::systems::{
    AnimationSystem, CameraMovementSystem, ColliderOutline, CollisionSystem, DamageSystem,
    DrawCommand, KeyboardControlSystem, MovementSystem, ProjectileEmitSystem,
    ProjectileLifecycleSystem, RenderColliderSystem, RenderSystem,
};

/// Statistics of the finished run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Summary {
    pub frames: u32,
    pub entities: usize,
    pub collisions: usize,
    pub hits: usize,
}

/// General context of the game: owns the registry, the event bus, the camera and the input.
pub struct Application {
    config: Config,
    registry: Registry,
    bus: EventBus,
    camera: Camera,
    input: InputScript,
    frame: u32,
    collisions: usize,
    draw_list: Vec<DrawCommand>,
    collider_list: Vec<ColliderOutline>,
}

impl Application {
    /// Creates the application with all systems of the game and no entities.
    pub fn new(config: Config, input: InputScript) -> Result<Self> {
        log::info!(
            "starting {} v{} on {} v{}",
            config.name(),
            config.version(),
            ENGINE_NAME,
            *ENGINE_VERSION,
        );

        let mut registry = Registry::new();
        registry.add_system(MovementSystem::new()?)?;
        registry.add_system(AnimationSystem::new()?)?;
        registry.add_system(KeyboardControlSystem::new()?)?;
        registry.add_system(CollisionSystem::new()?)?;
        registry.add_system(DamageSystem::new()?)?;
        registry.add_system(ProjectileEmitSystem::new()?)?;
        registry.add_system(ProjectileLifecycleSystem::new()?)?;
        registry.add_system(CameraMovementSystem::new()?)?;
        registry.add_system(RenderSystem::new()?)?;
        registry.add_system(RenderColliderSystem::new()?)?;

        let (width, height) = config.viewport();
        let (map_width, map_height) = config.map_size();
        Ok(Self {
            config,
            registry,
            bus: EventBus::new(),
            camera: Camera::new(width, height, map_width, map_height),
            input,
            frame: 0,
            collisions: 0,
            draw_list: Vec::new(),
            collider_list: Vec::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Number of frames run so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Sprites drawn by the last frame, from the bottom layer to the top one.
    pub fn draw_list(&self) -> &[DrawCommand] {
        &self.draw_list
    }

    /// Outlines of colliders drawn by the last frame, empty unless debugging is enabled.
    pub fn collider_list(&self) -> &[ColliderOutline] {
        &self.collider_list
    }

    /// Populates the registry with entities of the demo level.
    pub fn load_scene(&mut self) -> Result<()> {
        let registry = &mut self.registry;

        registry
            .spawn()
            .with(Transform::at(10.0, 30.0))?
            .with(RigidBody::new(50.0, 0.0))?
            .with(Sprite::new("tank-image", 32.0, 32.0, 1))?
            .with(BoxCollider::new(32.0, 32.0))?
            .with(Health::full())?;

        registry
            .spawn()
            .with(Transform::at(200.0, 0.0))?
            .with(RigidBody::new(0.0, 50.0))?
            .with(Sprite::new("truck-image", 32.0, 32.0, 1))?
            .with(BoxCollider::new(32.0, 32.0))?
            .with(Health::full())?;

        registry
            .spawn()
            .with(Transform::at(100.0, 100.0))?
            .with(RigidBody::default())?
            .with(Sprite::new("chopper-image", 32.0, 32.0, 2))?
            .with(Animation::new(2, 10.0, true))?
            .with(CameraFollow)?
            .with(BoxCollider::new(32.0, 32.0))?
            .with(Health::full())?
            .with(KeyboardControlled { speed: 80.0 })?
            .with(ProjectileEmitter::new(Vec2::new(0.0, -200.0), 0.5, 1.0, 10, true))?;

        registry
            .spawn()
            .with(Transform::at(300.0, 100.0))?
            .with(Sprite::new("turret-image", 16.0, 16.0, 1))?
            .with(ProjectileEmitter::new(Vec2::new(-150.0, 0.0), 1.0, 2.0, 20, false))?;

        registry
            .spawn()
            .with(Transform::at(0.0, 0.0))?
            .with(Sprite::new("radar-image", 64.0, 64.0, 3))?;

        log::info!("scene loaded with {} entities", registry.entity_count());
        Ok(())
    }

    /// Runs one frame: input, update, commit of the registry and render.
    pub fn run_frame(&mut self) -> Result<()> {
        let delta_time = self.config.delta_time();

        self.bus.reset();
        KeyboardControlSystem::subscribe_to_events(&mut self.bus, &self.registry)?;
        DamageSystem::subscribe_to_events(&mut self.bus, &self.registry)?;
        for &key in self.input.keys_at(self.frame) {
            self.bus.emit(&mut self.registry, KeyPressedEvent { key });
        }

        let registry = &mut self.registry;
        let bus = &mut self.bus;
        registry.with_system(|system: &mut MovementSystem, entities, registry| {
            system.update(entities, registry, delta_time)
        })??;
        registry.with_system(|system: &mut AnimationSystem, entities, registry| {
            system.update(entities, registry, delta_time)
        })??;
        self.collisions += registry.with_system(|system: &mut CollisionSystem, entities, registry| {
            system.update(entities, registry, bus)
        })??;
        registry.with_system(|system: &mut ProjectileEmitSystem, entities, registry| {
            system.update(entities, registry, delta_time)
        })??;
        registry.with_system(|system: &mut ProjectileLifecycleSystem, entities, registry| {
            system.update(entities, registry, delta_time)
        })??;

        registry.update()?;

        let camera = &mut self.camera;
        registry.with_system(|system: &mut CameraMovementSystem, entities, registry| {
            system.update(entities, registry, camera)
        })??;
        self.draw_list = registry.with_system(|system: &mut RenderSystem, entities, registry| {
            system.render(entities, registry, camera)
        })??;
        self.collider_list = if self.config.debug() {
            registry.with_system(|system: &mut RenderColliderSystem, entities, registry| {
                system.render(entities, registry, camera)
            })??
        } else {
            Vec::new()
        };
        self.frame += 1;
        Ok(())
    }

    /// Runs as many frames as the configuration says.
    pub fn run(&mut self) -> Result<Summary> {
        for _ in 0..self.config.frames() {
            self.run_frame()?;
        }
        let summary = self.summary()?;
        log::info!("finished: {:?}", summary);
        Ok(summary)
    }

    pub fn summary(&self) -> Result<Summary> {
        Ok(Summary {
            frames: self.frame,
            entities: self.registry.entity_count(),
            collisions: self.collisions,
            hits: self.registry.get_system::<DamageSystem>()?.hits(),
        })
    }
}
