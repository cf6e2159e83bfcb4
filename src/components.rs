//! Gameplay components of the demo.

use ultraviolet::Vec2;

/// Placement of the entity in the world.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub scale: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
}

impl Transform {
    pub fn new(position: Vec2, scale: Vec2, rotation: f32) -> Self {
        Self {
            position,
            scale,
            rotation,
        }
    }

    /// Unscaled and unrotated transform at `position`.
    pub fn at(x: f32, y: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::one(), 0.0)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(0.0, 0.0)
    }
}

/// Velocity of the entity in pixels per second.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RigidBody {
    pub velocity: Vec2,
}

impl RigidBody {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            velocity: Vec2::new(x, y),
        }
    }
}

/// Image of the entity drawn by the render system.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub asset_id: String,
    pub width: f32,
    pub height: f32,
    /// Sprites with greater layer are drawn on top.
    pub z_index: i32,
    /// Top left corner of the drawn part of the image.
    pub source: Vec2,
}

impl Sprite {
    pub fn new(asset_id: impl Into<String>, width: f32, height: f32, z_index: i32) -> Self {
        Self {
            asset_id: asset_id.into(),
            width,
            height,
            z_index,
            source: Vec2::zero(),
        }
    }

    pub fn with_source(mut self, x: f32, y: f32) -> Self {
        self.source = Vec2::new(x, y);
        self
    }
}

/// Animation which steps through frames laid out horizontally in the sprite image.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Animation {
    pub frame_count: u32,
    pub current_frame: u32,
    /// Frames per second.
    pub frame_rate: f32,
    /// Looping animation starts over after the last frame, other ones stop on it.
    pub looping: bool,
    /// Seconds since the animation started.
    pub elapsed: f32,
}

impl Animation {
    pub fn new(frame_count: u32, frame_rate: f32, looping: bool) -> Self {
        Self {
            frame_count,
            current_frame: 0,
            frame_rate,
            looping,
            elapsed: 0.0,
        }
    }

    /// Moves the animation `delta_time` seconds forward and updates the current frame.
    pub fn advance(&mut self, delta_time: f32) {
        if self.frame_count == 0 || self.frame_rate <= 0.0 {
            return;
        }
        self.elapsed += delta_time;
        let frame = (self.elapsed * self.frame_rate) as u32;
        self.current_frame = if self.looping {
            frame % self.frame_count
        } else {
            frame.min(self.frame_count - 1)
        };
    }
}

/// Axis-aligned box used for collision detection.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct BoxCollider {
    pub width: f32,
    pub height: f32,
    /// Offset of the box from the position of the entity.
    pub offset: Vec2,
    /// Set by the collision system when the box overlapped another box this frame.
    pub colliding: bool,
}

impl BoxCollider {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset = Vec2::new(x, y);
        self
    }
}

/// Remaining health of the entity, in percents.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Health {
    pub percentage: u32,
}

impl Health {
    pub fn full() -> Self {
        Self { percentage: 100 }
    }

    pub fn is_depleted(&self) -> bool {
        self.percentage == 0
    }
}

/// Projectile which damages entities it collides with and expires after some time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projectile {
    /// Friendly projectiles never hit the player.
    pub friendly: bool,
    /// Damage dealt on hit, in percents of health.
    pub damage: u32,
    /// Lifetime in seconds.
    pub duration: f32,
    /// Seconds passed since the projectile was emitted.
    pub elapsed: f32,
}

impl Projectile {
    pub fn new(friendly: bool, damage: u32, duration: f32) -> Self {
        Self {
            friendly,
            damage,
            duration,
            elapsed: 0.0,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Spawns projectiles from the entity at a fixed interval.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectileEmitter {
    pub velocity: Vec2,
    /// Seconds between two emissions.
    pub interval: f32,
    /// Lifetime of emitted projectiles in seconds.
    pub duration: f32,
    pub damage: u32,
    pub friendly: bool,
    /// Seconds since the last emission.
    pub cooldown: f32,
}

impl ProjectileEmitter {
    pub fn new(velocity: Vec2, interval: f32, duration: f32, damage: u32, friendly: bool) -> Self {
        Self {
            velocity,
            interval,
            duration,
            damage,
            friendly,
            cooldown: 0.0,
        }
    }
}

/// Marks the entity steered by the keyboard, i.e. the player.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeyboardControlled {
    /// Speed in pixels per second along the pressed direction.
    pub speed: f32,
}

/// Marks the entity which the camera keeps in the center of the view.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CameraFollow;
