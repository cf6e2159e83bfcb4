//! Entity Component System (ECS) runtime for game engine.

pub use component::{component_id, AnyPool, Component, ComponentId, ComponentTypes, Pool, POOL_INITIAL_SIZE};
pub use entity::{Entity, RegistryId};
pub use error::{ComponentLimitError, RegistryError, Result};
pub use event::{Event, EventBus};
pub use registry::{EntityMut, Registry};
pub use signature::{Signature, MAX_COMPONENTS};
pub use system::{ComponentSet, System, SystemBase};

pub mod component;
pub mod error;
pub mod event;
pub mod system;

mod entity;
mod registry;
mod signature;
