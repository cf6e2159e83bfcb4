//! Registry of component types and their dense identifiers.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::ComponentLimitError;
use crate::signature::MAX_COMPONENTS;

use super::{Component, ComponentId};

/// Table which assigns [`ComponentId`]s to component types.
///
/// Identifiers are handed out in the order of first request,
/// are never reused and never exceed the limit of the table.
///
#[derive(Debug)]
pub struct ComponentTypes {
    ids: HashMap<TypeId, ComponentId>,
    names: Vec<&'static str>,
    limit: usize,
}

impl ComponentTypes {
    /// Creates an empty table which can hold up to [`MAX_COMPONENTS`] types.
    pub fn new() -> Self {
        Self::with_limit(MAX_COMPONENTS)
    }

    /// Creates an empty table which can hold up to `limit` types.
    ///
    /// The limit is clamped to [`MAX_COMPONENTS`].
    ///
    pub fn with_limit(limit: usize) -> Self {
        Self {
            ids: HashMap::new(),
            names: Vec::new(),
            limit: limit.min(MAX_COMPONENTS),
        }
    }

    /// Returns identifier of component type `T`, assigning the next one on first request.
    ///
    /// # Errors
    ///
    /// An error is returned if `T` is new and the table is already full.
    ///
    pub fn register<T>(&mut self) -> Result<ComponentId, ComponentLimitError>
    where
        T: Component,
    {
        if let Some(&id) = self.ids.get(&TypeId::of::<T>()) {
            return Ok(id);
        }
        let error = ComponentLimitError {
            component: type_name::<T>(),
            limit: self.limit,
        };
        if self.names.len() >= self.limit {
            return Err(error);
        }
        let id = ComponentId::new(self.names.len()).ok_or(error)?;
        self.ids.insert(TypeId::of::<T>(), id);
        self.names.push(type_name::<T>());
        log::trace!("component `{}` registered with id {}", type_name::<T>(), id);
        Ok(id)
    }

    /// Returns identifier of component type `T`, if it was registered before.
    pub fn get<T>(&self) -> Option<ComponentId>
    where
        T: Component,
    {
        self.ids.get(&TypeId::of::<T>()).copied()
    }

    /// Returns type name of the component with given identifier.
    pub fn name(&self, id: ComponentId) -> Option<&'static str> {
        self.names.get(id.index()).copied()
    }

    /// Number of registered component types.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no component type was registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ComponentTypes {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    static ref COMPONENT_TYPES: RwLock<ComponentTypes> = RwLock::new(ComponentTypes::new());
}

/// Returns process-wide identifier of component type `T`, assigning one on first use.
///
/// # Errors
///
/// An error is returned if more than [`MAX_COMPONENTS`] distinct types are requested.
///
pub fn component_id<T>() -> Result<ComponentId, ComponentLimitError>
where
    T: Component,
{
    if let Some(id) = registered_component_id::<T>() {
        return Ok(id);
    }
    COMPONENT_TYPES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register::<T>()
}

/// Returns process-wide identifier of component type `T` without assigning a new one.
pub fn registered_component_id<T>() -> Option<ComponentId>
where
    T: Component,
{
    COMPONENT_TYPES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get::<T>()
}

/// Returns type name of the component with given process-wide identifier.
pub fn component_name(id: ComponentId) -> Option<&'static str> {
    COMPONENT_TYPES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .name(id)
}
