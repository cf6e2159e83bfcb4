//! Events sent through the event bus of the demo.

use std::fmt;

use ember_ecs::Entity;

/// Two entities whose colliders overlap.
///
/// Sent once per overlapping pair per frame; the order of `a` and `b` is unspecified.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
}

impl CollisionEvent {
    /// Returns the other entity of the pair, if `entity` takes part in the collision.
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Keys the demo reacts to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Right,
    Down,
    Left,
    Space,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Key::Up => "Up",
            Key::Right => "Right",
            Key::Down => "Down",
            Key::Left => "Left",
            Key::Space => "Space",
        };
        write!(f, "{}", name)
    }
}

/// Key which was pressed during the input phase of the frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyPressedEvent {
    pub key: Key,
}
