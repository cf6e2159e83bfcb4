//! Utilities for *components* in ECS.

use std::any::Any;
use std::fmt;

pub use pool::*;
pub use types::*;

use crate::signature::MAX_COMPONENTS;

mod pool;
mod types;

/// Objects of this trait represent *component* of ECS.
///
/// Components should be just plain data: the runtime never looks inside of them.
///
pub trait Component: Any {}

impl<T> Component for T where T: Any {}

/// Dense identifier of a component type, always less than [`MAX_COMPONENTS`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentId(u8);

impl ComponentId {
    /// Creates an identifier from its index, if the index fits into a signature.
    pub const fn new(index: usize) -> Option<Self> {
        if index < MAX_COMPONENTS {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Index of the identifier, which is also the bit of the component in a signature.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
