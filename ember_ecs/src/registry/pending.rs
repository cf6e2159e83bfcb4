//! Entities waiting for the next commit of the registry.

use std::collections::HashSet;

use crate::Entity;

/// Set of entities which remembers insertion order.
#[derive(Debug, Default)]
pub(crate) struct PendingSet {
    order: Vec<Entity>,
    members: HashSet<Entity>,
}

impl PendingSet {
    /// Returns `false` if the entity was already pending.
    pub fn insert(&mut self, entity: Entity) -> bool {
        let inserted = self.members.insert(entity);
        if inserted {
            self.order.push(entity);
        }
        inserted
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.members.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Empties the set, returning entities in insertion order.
    pub fn take(&mut self) -> Vec<Entity> {
        self.members.clear();
        std::mem::take(&mut self.order)
    }
}
