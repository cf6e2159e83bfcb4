use crate::component::Component;
use crate::error::Result;
use crate::{Entity, Registry, Signature};

/// Mutable view of one entity which routes every operation through its registry.
///
/// ```
/// # use ember_ecs::Registry;
/// struct Position(f32, f32);
/// struct Velocity(f32, f32);
///
/// let mut registry = Registry::new();
/// let entity = registry
///     .spawn()
///     .with(Position(0.0, 0.0))?
///     .with(Velocity(5.0, 0.0))?
///     .id();
/// assert!(registry.has_component::<Velocity>(entity));
/// # Ok::<(), ember_ecs::RegistryError>(())
/// ```
pub struct EntityMut<'a> {
    registry: &'a mut Registry,
    entity: Entity,
}

impl<'a> EntityMut<'a> {
    pub(crate) fn new(registry: &'a mut Registry, entity: Entity) -> Self {
        Self { registry, entity }
    }

    /// Handle of the entity.
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// See [`Registry::add_component`].
    pub fn add<T>(&mut self, component: T) -> Result<Option<T>>
    where
        T: Component,
    {
        self.registry.add_component(self.entity, component)
    }

    /// Attaches component and returns the view back, for chaining.
    pub fn with<T>(mut self, component: T) -> Result<Self>
    where
        T: Component,
    {
        self.add(component)?;
        Ok(self)
    }

    /// See [`Registry::remove_component`].
    pub fn remove<T>(&mut self) -> Result<Option<T>>
    where
        T: Component,
    {
        self.registry.remove_component(self.entity)
    }

    pub fn has<T>(&self) -> bool
    where
        T: Component,
    {
        self.registry.has_component::<T>(self.entity)
    }

    pub fn get<T>(&self) -> Result<&T>
    where
        T: Component,
    {
        self.registry.get_component(self.entity)
    }

    pub fn get_mut<T>(&mut self) -> Result<&mut T>
    where
        T: Component,
    {
        self.registry.get_component_mut(self.entity)
    }

    pub fn signature(&self) -> Result<Signature> {
        self.registry.signature(self.entity)
    }

    /// See [`Registry::kill_entity`].
    pub fn kill(self) -> Result<()> {
        self.registry.kill_entity(self.entity)
    }
}
