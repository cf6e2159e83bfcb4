//! Error types of the entity-component runtime.

use thiserror::Error;

use crate::Entity;

/// Result of any registry operation which can fail.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Error that happens when more distinct component types are requested
/// than a [`Signature`](crate::Signature) can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot register component `{component}`: limit of {limit} component types reached")]
pub struct ComponentLimitError {
    /// Type name of the rejected component.
    pub component: &'static str,
    /// Maximum number of component types.
    pub limit: usize,
}

/// Error that can happen on any operation of the [`Registry`](crate::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error(transparent)]
    ComponentLimit(#[from] ComponentLimitError),

    #[error("entity {0} is not alive in this registry")]
    StaleEntity(Entity),

    #[error("entity {entity} has no component of type `{component}`")]
    ComponentNotFound {
        entity: Entity,
        component: &'static str,
    },

    #[error("system `{0}` is not registered")]
    SystemNotFound(&'static str),

    #[error("system `{0}` is already registered")]
    SystemAlreadyRegistered(&'static str),

    #[error("system `{0}` is borrowed and cannot be accessed right now")]
    SystemInUse(&'static str),
}
