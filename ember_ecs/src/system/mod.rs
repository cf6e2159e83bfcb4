//! Utilities for *systems* in ECS.

use std::any::Any;

use slotmap::new_key_type;

pub use signature::ComponentSet;

use crate::{Entity, Signature};

mod signature;

new_key_type! {
    /// Stable identity of a system instance stored in the registry.
    pub(crate) struct SystemKey;
}

/// Bookkeeping of one *system*, owned by the [`Registry`](crate::Registry):
/// required components and matching entities.
///
/// The signature is copied from [`System::signature`] when the system is added
/// and never changes afterwards. Membership is maintained by the registry only.
///
#[derive(Debug, Default, Clone)]
pub struct SystemBase {
    signature: Signature,
    entities: Vec<Entity>,
}

impl SystemBase {
    pub(crate) fn new(signature: Signature) -> Self {
        Self {
            signature,
            entities: Vec::new(),
        }
    }

    /// Components which an entity must have to be handled by the system.
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Entities currently handled by the system.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Returns `true` if the entity is handled by the system.
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub(crate) fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Order of remaining entities is not preserved.
    pub(crate) fn remove_entity(&mut self, entity: Entity) -> bool {
        match self.entities.iter().position(|&other| other == entity) {
            Some(index) => {
                self.entities.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Moves membership out while the system is borrowed.
    pub(crate) fn take_entities(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.entities)
    }

    pub(crate) fn restore_entities(&mut self, entities: Vec<Entity>) {
        self.entities = entities;
    }
}

/// Objects of this trait represent *system* of ECS.
///
/// A system only declares which components it needs: the [`Registry`](crate::Registry)
/// keeps the matching entities in a [`SystemBase`] of its own.
/// Per-frame logic is not part of the trait, because every system needs
/// its own context: run it through [`Registry::with_system`](crate::Registry::with_system),
/// which hands it the current members.
///
pub trait System: Any {
    /// Components which an entity must have to be handled by this system.
    ///
    /// Read once, when the system is added to the registry.
    fn signature(&self) -> Signature;

    /// Called by the registry when the entity joins this system.
    fn on_entity_added(&mut self, _entity: Entity) {}

    /// Called by the registry when the entity leaves this system on commit.
    fn on_entity_removed(&mut self, _entity: Entity) {}
}

/// Object-safe extension of [`System`] used for storage in the registry.
pub(crate) trait AnySystem: System {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<S> AnySystem for S
where
    S: System,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
