//! Utilities for game error handling.

use ember_ecs::{ComponentLimitError, RegistryError};
use thiserror::Error;

/// Result of any operation of the game which can return an error.
pub type Result<T> = std::result::Result<T, GameError>;

/// General error type of the game.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl From<ComponentLimitError> for GameError {
    fn from(error: ComponentLimitError) -> Self {
        Self::Registry(error.into())
    }
}
