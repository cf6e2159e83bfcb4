//! Utilities for *entities* in ECS.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifier of the [`Registry`](crate::Registry) which created an entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegistryId(u32);

impl RegistryId {
    /// Returns an identifier which was never returned before in this process.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Unique handle of the *entity* of ECS.
///
/// Entity owns no data: it is just an index into component pools of its registry.
/// The generation guards against handles which outlived the entity
/// after its id was reused by the registry.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    id: u32,
    generation: u32,
    registry: RegistryId,
}

impl Entity {
    pub(crate) const fn new(id: u32, generation: u32, registry: RegistryId) -> Self {
        Self {
            id,
            generation,
            registry,
        }
    }

    /// Numeric id of the entity, which is also its slot in every component pool.
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// How many times the id of the entity was reused before.
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Registry which owns the entity.
    pub const fn registry(&self) -> RegistryId {
        self.registry
    }

    pub(crate) const fn index(&self) -> usize {
        self.id as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}v{}", self.id, self.generation)
    }
}
