//! Central storage of entities, components and systems of ECS.

use std::any::{type_name, TypeId};
use std::collections::{HashMap, VecDeque};

use slotmap::SlotMap;

pub use entity_mut::EntityMut;

use crate::component::{component_id, registered_component_id, AnyPool, Component, ComponentId, Pool};
use crate::entity::RegistryId;
use crate::error::{RegistryError, Result};
use crate::system::{AnySystem, System, SystemBase, SystemKey};
use crate::{Entity, Signature};

use pending::PendingSet;

mod entity_mut;
mod pending;
mod tests;

struct SystemSlot {
    name: &'static str,
    base: SystemBase,
    /// Empty while the system is borrowed by [`Registry::with_system`].
    instance: Option<Box<dyn AnySystem>>,
}

impl SystemSlot {
    fn add_entity(&mut self, entity: Entity) {
        self.base.add_entity(entity);
        if let Some(system) = self.instance.as_mut() {
            system.on_entity_added(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        if self.base.remove_entity(entity) {
            if let Some(system) = self.instance.as_mut() {
                system.on_entity_removed(entity);
            }
        }
    }
}

/// System moved out of its slot for the duration of [`Registry::with_system`].
///
/// Puts the system back when dropped, even if the borrowing closure panics.
///
struct Detached<'a> {
    registry: &'a mut Registry,
    key: SystemKey,
    instance: Option<Box<dyn AnySystem>>,
    entities: Vec<Entity>,
}

impl Drop for Detached<'_> {
    fn drop(&mut self) {
        // The system could have been removed while it was borrowed.
        if let Some(slot) = self.registry.systems.get_mut(self.key) {
            slot.instance = self.instance.take();
            slot.base.restore_entities(std::mem::take(&mut self.entities));
        }
    }
}

/// Storage for entities, components and systems of ECS.
///
/// Creation and destruction of entities is deferred: systems see new entities
/// and lose killed ones only after [`Registry::update`] is called at the end of the frame.
/// Components are attached and detached immediately.
///
pub struct Registry {
    id: RegistryId,
    next_entity_id: u32,
    /// Ids of killed entities, reused before minting new ones.
    /// An id whose generations are exhausted is retired and never reused.
    free_ids: VecDeque<u32>,
    /// Current generation of each id.
    generations: Vec<u32>,
    /// Component signature of each id.
    signatures: Vec<Signature>,
    /// Whether the id belongs to an entity which was already handed to systems.
    committed: Vec<bool>,
    live_entities: usize,
    to_be_added: PendingSet,
    to_be_killed: PendingSet,
    /// Committed entities whose signature changed since the last commit.
    changed: PendingSet,
    /// Component pools indexed by component id.
    pools: Vec<Option<Box<dyn AnyPool>>>,
    systems: SlotMap<SystemKey, SystemSlot>,
    system_keys: HashMap<TypeId, SystemKey>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        let id = RegistryId::next();
        log::debug!("registry {:?} created", id);
        Self {
            id,
            next_entity_id: 0,
            free_ids: VecDeque::new(),
            generations: Vec::new(),
            signatures: Vec::new(),
            committed: Vec::new(),
            live_entities: 0,
            to_be_added: PendingSet::default(),
            to_be_killed: PendingSet::default(),
            changed: PendingSet::default(),
            pools: Vec::new(),
            systems: SlotMap::with_key(),
            system_keys: HashMap::new(),
        }
    }

    /// Identifier of this registry, shared by all of its entities.
    pub fn id(&self) -> RegistryId {
        self.id
    }

    /// Creates new entity.
    ///
    /// Ids of killed entities are reused in the order they were freed.
    /// The entity is handed to systems on the next [`update`](Registry::update).
    ///
    /// # Panics
    ///
    /// Panics if all `u32::MAX` entity ids were minted already.
    ///
    pub fn create_entity(&mut self) -> Entity {
        let id = match self.free_ids.pop_front() {
            Some(id) => id,
            None => {
                let id = self.next_entity_id;
                self.next_entity_id = id.checked_add(1).expect("entity id space exhausted");
                id
            }
        };
        let index = id as usize;
        if index >= self.signatures.len() {
            self.signatures.resize(index + 1, Signature::EMPTY);
            self.generations.resize(index + 1, 0);
            self.committed.resize(index + 1, false);
        }

        let entity = Entity::new(id, self.generations[index], self.id);
        self.to_be_added.insert(entity);
        self.live_entities += 1;
        log::debug!("entity {} created", entity);
        entity
    }

    /// Creates new entity and returns a view to fill it with components.
    pub fn spawn(&mut self) -> EntityMut<'_> {
        let entity = self.create_entity();
        EntityMut::new(self, entity)
    }

    /// Returns a view which routes all operations on the entity through this registry.
    ///
    /// # Errors
    ///
    /// An error is returned if the entity is not alive in this registry.
    ///
    pub fn entity_mut(&mut self, entity: Entity) -> Result<EntityMut<'_>> {
        self.check(entity)?;
        Ok(EntityMut::new(self, entity))
    }

    /// Schedules the entity to be killed on the next [`update`](Registry::update).
    ///
    /// The entity stays fully functional until then. Killing it twice is a no-op.
    ///
    /// # Errors
    ///
    /// An error is returned if the entity is not alive in this registry.
    ///
    pub fn kill_entity(&mut self, entity: Entity) -> Result<()> {
        self.check(entity)?;
        if self.to_be_killed.insert(entity) {
            log::debug!("entity {} will be killed", entity);
        }
        Ok(())
    }

    /// Returns `true` if the entity was created by this registry
    /// and was not killed by a commit since then.
    pub fn is_alive(&self, entity: Entity) -> bool {
        entity.registry() == self.id
            && self.generations.get(entity.index()) == Some(&entity.generation())
    }

    /// Number of alive entities, including ones which were not committed yet.
    pub fn entity_count(&self) -> usize {
        self.live_entities
    }

    /// Number of entities waiting to be handed to systems or to be killed.
    pub fn pending_count(&self) -> (usize, usize) {
        (self.to_be_added.len(), self.to_be_killed.len())
    }

    /// Returns component signature of the entity.
    ///
    /// # Errors
    ///
    /// An error is returned if the entity is not alive in this registry.
    ///
    pub fn signature(&self, entity: Entity) -> Result<Signature> {
        self.check(entity)?;
        Ok(self.signatures[entity.index()])
    }

    /// Attaches component to the entity.
    /// If component of this type was already attached, it will be replaced by value.
    ///
    /// Returns previously attached component, if any.
    ///
    /// # Errors
    ///
    /// An error is returned if the entity is not alive in this registry
    /// or if the component type cannot be registered.
    ///
    pub fn add_component<T>(&mut self, entity: Entity, component: T) -> Result<Option<T>>
    where
        T: Component,
    {
        self.check(entity)?;
        let component_id = component_id::<T>()?;
        let index = entity.index();

        let previous = self.pool_or_insert::<T>(component_id).set(index, component);
        self.signatures[index].set(component_id);
        self.mark_changed(entity);
        log::trace!(
            "component `{}` (id {}) was added to entity {}",
            type_name::<T>(),
            component_id,
            entity,
        );
        Ok(previous)
    }

    /// Detaches component of type `T` from the entity.
    ///
    /// Returns component that was attached to the entity, if any.
    ///
    /// # Errors
    ///
    /// An error is returned if the entity is not alive in this registry.
    ///
    pub fn remove_component<T>(&mut self, entity: Entity) -> Result<Option<T>>
    where
        T: Component,
    {
        self.check(entity)?;
        let index = entity.index();
        let component_id = match registered_component_id::<T>() {
            Some(id) if self.signatures[index].test(id) => id,
            _ => return Ok(None),
        };

        self.signatures[index].unset(component_id);
        self.mark_changed(entity);
        log::trace!(
            "component `{}` (id {}) was removed from entity {}",
            type_name::<T>(),
            component_id,
            entity,
        );
        Ok(self.pool_mut::<T>(component_id).and_then(|pool| pool.take(index)))
    }

    /// Returns `true` if component of type `T` is attached to the entity.
    pub fn has_component<T>(&self, entity: Entity) -> bool
    where
        T: Component,
    {
        if !self.is_alive(entity) {
            return false;
        }
        registered_component_id::<T>()
            .map(|id| self.signatures[entity.index()].test(id))
            .unwrap_or(false)
    }

    /// Retrieves an immutable reference to component of type `T` attached to the entity.
    ///
    /// # Errors
    ///
    /// An error is returned if the entity is not alive in this registry
    /// or if it has no such component.
    ///
    pub fn get_component<T>(&self, entity: Entity) -> Result<&T>
    where
        T: Component,
    {
        let component_id = self.attached_id::<T>(entity)?;
        self.pool::<T>(component_id)
            .and_then(|pool| pool.get(entity.index()))
            .ok_or_else(|| not_found::<T>(entity))
    }

    /// Retrieves a mutable reference to component of type `T` attached to the entity.
    ///
    /// # Errors
    ///
    /// An error is returned if the entity is not alive in this registry
    /// or if it has no such component.
    ///
    pub fn get_component_mut<T>(&mut self, entity: Entity) -> Result<&mut T>
    where
        T: Component,
    {
        let component_id = self.attached_id::<T>(entity)?;
        self.pool_mut::<T>(component_id)
            .and_then(|pool| pool.get_mut(entity.index()))
            .ok_or_else(|| not_found::<T>(entity))
    }

    /// Registers the system, handing it every committed entity which matches its signature.
    ///
    /// The signature of the system is read here once: changes of the system made later
    /// do not affect which entities it handles.
    ///
    /// # Errors
    ///
    /// An error is returned if a system of this type was already added.
    ///
    pub fn add_system<S>(&mut self, system: S) -> Result<()>
    where
        S: System,
    {
        let name = type_name::<S>();
        let type_id = TypeId::of::<S>();
        if self.system_keys.contains_key(&type_id) {
            return Err(RegistryError::SystemAlreadyRegistered(name));
        }

        let required = system.signature();
        let mut slot = SystemSlot {
            name,
            base: SystemBase::new(required),
            instance: Some(Box::new(system)),
        };
        let matching = self
            .committed
            .iter()
            .zip(&self.signatures)
            .enumerate()
            .filter(|(_, (committed, signature))| **committed && signature.contains_all(&required))
            .map(|(index, _)| Entity::new(index as u32, self.generations[index], self.id));
        for entity in matching {
            slot.add_entity(entity);
        }

        let key = self.systems.insert(slot);
        self.system_keys.insert(type_id, key);
        log::info!("system `{}` added with signature {}", name, required);
        Ok(())
    }

    /// Unregisters the system and returns it.
    ///
    /// # Errors
    ///
    /// An error is returned if the system was not added
    /// or if it is currently borrowed by [`with_system`](Registry::with_system).
    ///
    pub fn remove_system<S>(&mut self) -> Result<S>
    where
        S: System,
    {
        let name = type_name::<S>();
        let key = self.system_key::<S>()?;
        if self.systems.get(key).map_or(true, |slot| slot.instance.is_none()) {
            return Err(RegistryError::SystemInUse(name));
        }

        self.system_keys.remove(&TypeId::of::<S>());
        let instance = self
            .systems
            .remove(key)
            .and_then(|slot| slot.instance)
            .ok_or(RegistryError::SystemNotFound(name))?;
        log::info!("system `{}` removed", name);
        instance
            .into_any()
            .downcast::<S>()
            .map(|system| *system)
            .map_err(|_| RegistryError::SystemNotFound(name))
    }

    /// Returns `true` if a system of type `S` was added.
    pub fn has_system<S>(&self) -> bool
    where
        S: System,
    {
        self.system_keys.contains_key(&TypeId::of::<S>())
    }

    /// Number of added systems.
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Retrieves an immutable reference to the system of type `S`.
    ///
    /// # Errors
    ///
    /// An error is returned if the system was not added or is currently borrowed.
    ///
    pub fn get_system<S>(&self) -> Result<&S>
    where
        S: System,
    {
        let name = type_name::<S>();
        let key = self.system_key::<S>()?;
        self.systems
            .get(key)
            .ok_or(RegistryError::SystemNotFound(name))?
            .instance
            .as_ref()
            .ok_or(RegistryError::SystemInUse(name))?
            .as_any()
            .downcast_ref()
            .ok_or(RegistryError::SystemNotFound(name))
    }

    /// Retrieves a mutable reference to the system of type `S`.
    ///
    /// Neither signature nor members of the system can be changed through it.
    ///
    /// # Errors
    ///
    /// An error is returned if the system was not added or is currently borrowed.
    ///
    pub fn get_system_mut<S>(&mut self) -> Result<&mut S>
    where
        S: System,
    {
        let name = type_name::<S>();
        let key = self.system_key::<S>()?;
        self.systems
            .get_mut(key)
            .ok_or(RegistryError::SystemNotFound(name))?
            .instance
            .as_mut()
            .ok_or(RegistryError::SystemInUse(name))?
            .as_any_mut()
            .downcast_mut()
            .ok_or(RegistryError::SystemNotFound(name))
    }

    /// Retrieves bookkeeping of the system of type `S`: its signature and members.
    ///
    /// # Errors
    ///
    /// An error is returned if the system was not added or is currently borrowed.
    ///
    pub fn system_base<S>(&self) -> Result<&SystemBase>
    where
        S: System,
    {
        let name = type_name::<S>();
        let key = self.system_key::<S>()?;
        let slot = self.systems.get(key).ok_or(RegistryError::SystemNotFound(name))?;
        match slot.instance {
            Some(_) => Ok(&slot.base),
            None => Err(RegistryError::SystemInUse(name)),
        }
    }

    /// Entities currently handled by the system of type `S`.
    ///
    /// # Errors
    ///
    /// An error is returned if the system was not added or is currently borrowed.
    ///
    pub fn system_entities<S>(&self) -> Result<&[Entity]>
    where
        S: System,
    {
        self.system_base::<S>().map(SystemBase::entities)
    }

    /// Runs `f` with the system of type `S`, its members and the registry itself,
    /// so the system can work with components of its entities.
    ///
    /// While `f` runs, the system is detached from the registry:
    /// it cannot be retrieved, removed or committed into.
    /// It is attached back when `f` returns or panics.
    ///
    /// # Errors
    ///
    /// An error is returned if the system was not added or is already borrowed.
    ///
    pub fn with_system<S, R>(
        &mut self,
        f: impl FnOnce(&mut S, &[Entity], &mut Registry) -> R,
    ) -> Result<R>
    where
        S: System,
    {
        let key = self.system_key::<S>()?;
        self.with_system_key(key, f)
    }

    /// Commits all changes made to entities since the previous commit.
    ///
    /// New entities are handed to every system they match, committed entities
    /// whose components changed join or leave systems, and killed entities
    /// are removed from all systems, after which their ids become reusable.
    /// Additions are processed before kills, so an entity created and killed
    /// during the same frame joins its systems and leaves them right away.
    ///
    /// # Errors
    ///
    /// An error is returned if some system is borrowed by [`with_system`](Registry::with_system).
    /// Nothing is committed in that case.
    ///
    pub fn update(&mut self) -> Result<()> {
        if let Some(slot) = self.systems.values().find(|slot| slot.instance.is_none()) {
            return Err(RegistryError::SystemInUse(slot.name));
        }

        let added = self.to_be_added.take();
        for &entity in &added {
            self.committed[entity.index()] = true;
            self.add_entity_to_systems(entity);
        }

        for entity in self.changed.take() {
            if self.is_alive(entity) && !self.to_be_killed.contains(entity) {
                self.refresh_entity_in_systems(entity);
            }
        }

        let killed = self.to_be_killed.take();
        for &entity in &killed {
            self.remove_entity_from_systems(entity);
            self.release(entity);
        }

        if !added.is_empty() || !killed.is_empty() {
            log::trace!(
                "registry committed: {} entities added, {} killed",
                added.len(),
                killed.len(),
            );
        }
        Ok(())
    }

    pub(crate) fn system_key<S>(&self) -> Result<SystemKey>
    where
        S: System,
    {
        self.system_keys
            .get(&TypeId::of::<S>())
            .copied()
            .ok_or(RegistryError::SystemNotFound(type_name::<S>()))
    }

    pub(crate) fn with_system_key<S, R>(
        &mut self,
        key: SystemKey,
        f: impl FnOnce(&mut S, &[Entity], &mut Registry) -> R,
    ) -> Result<R>
    where
        S: System,
    {
        let name = type_name::<S>();
        let slot = self.systems.get_mut(key).ok_or(RegistryError::SystemNotFound(name))?;
        let instance = slot.instance.take().ok_or(RegistryError::SystemInUse(name))?;
        let entities = slot.base.take_entities();

        let mut detached = Detached {
            registry: self,
            key,
            instance: Some(instance),
            entities,
        };
        let Detached {
            registry,
            instance,
            entities,
            ..
        } = &mut detached;
        let system = instance
            .as_mut()
            .and_then(|instance| instance.as_any_mut().downcast_mut::<S>())
            .ok_or(RegistryError::SystemNotFound(name))?;
        Ok(f(system, entities.as_slice(), &mut **registry))
    }

    fn check(&self, entity: Entity) -> Result<()> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(RegistryError::StaleEntity(entity))
        }
    }

    fn attached_id<T>(&self, entity: Entity) -> Result<ComponentId>
    where
        T: Component,
    {
        self.check(entity)?;
        registered_component_id::<T>()
            .filter(|&id| self.signatures[entity.index()].test(id))
            .ok_or_else(|| not_found::<T>(entity))
    }

    fn mark_changed(&mut self, entity: Entity) {
        if self.committed[entity.index()] {
            self.changed.insert(entity);
        }
    }

    fn pool<T>(&self, component_id: ComponentId) -> Option<&Pool<T>>
    where
        T: Component,
    {
        self.pools.get(component_id.index())?.as_ref()?.downcast_ref()
    }

    fn pool_mut<T>(&mut self, component_id: ComponentId) -> Option<&mut Pool<T>>
    where
        T: Component,
    {
        self.pools.get_mut(component_id.index())?.as_mut()?.downcast_mut()
    }

    fn pool_or_insert<T>(&mut self, component_id: ComponentId) -> &mut Pool<T>
    where
        T: Component,
    {
        let index = component_id.index();
        if index >= self.pools.len() {
            self.pools.resize_with(index + 1, || None);
        }
        self.pools[index]
            .get_or_insert_with(|| Box::new(Pool::<T>::new()) as Box<dyn AnyPool>)
            .downcast_mut()
            .expect("downcast error")
    }

    fn add_entity_to_systems(&mut self, entity: Entity) {
        let signature = self.signatures[entity.index()];
        for slot in self.systems.values_mut() {
            if signature.contains_all(&slot.base.signature()) {
                slot.add_entity(entity);
            }
        }
    }

    fn refresh_entity_in_systems(&mut self, entity: Entity) {
        let signature = self.signatures[entity.index()];
        for slot in self.systems.values_mut() {
            let matches = signature.contains_all(&slot.base.signature());
            let member = slot.base.contains(entity);
            if matches && !member {
                slot.add_entity(entity);
            } else if !matches && member {
                slot.remove_entity(entity);
            }
        }
    }

    fn remove_entity_from_systems(&mut self, entity: Entity) {
        for slot in self.systems.values_mut() {
            slot.remove_entity(entity);
        }
    }

    /// Drops everything the entity owned and makes its id reusable.
    fn release(&mut self, entity: Entity) {
        let index = entity.index();
        self.signatures[index].clear();
        for pool in self.pools.iter_mut().flatten() {
            pool.clear_slot(index);
        }
        self.committed[index] = false;
        self.live_entities -= 1;
        log::debug!("entity {} killed", entity);

        // Generation `u32::MAX` is never handed out, so handles of a retired id stay stale.
        let generation = self.generations[index] + 1;
        self.generations[index] = generation;
        if generation == u32::MAX {
            log::warn!("entity id {} is retired: its generations are exhausted", entity.id());
        } else {
            self.free_ids.push_back(entity.id());
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found<T>(entity: Entity) -> RegistryError {
    RegistryError::ComponentNotFound {
        entity,
        component: type_name::<T>(),
    }
}
