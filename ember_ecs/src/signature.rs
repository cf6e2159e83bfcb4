//! Bit set of component types.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use crate::component::ComponentId;

/// Maximum number of distinct component types supported by the runtime.
pub const MAX_COMPONENTS: usize = u64::BITS as usize;

/// Set of component types, one bit per [`ComponentId`].
///
/// Describes which components an entity has, or which components a *system* requires.
///
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Signature(u64);

impl Signature {
    /// Signature without any component.
    pub const EMPTY: Self = Self(0);

    /// Creates an empty signature.
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns a copy of this signature with the bit of `id` set.
    #[must_use]
    pub const fn with(self, id: ComponentId) -> Self {
        Self(self.0 | 1u64 << id.index())
    }

    /// Sets the bit of `id`.
    pub fn set(&mut self, id: ComponentId) {
        self.0 |= 1u64 << id.index();
    }

    /// Clears the bit of `id`.
    pub fn unset(&mut self, id: ComponentId) {
        self.0 &= !(1u64 << id.index());
    }

    /// Clears all bits.
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Returns `true` if the bit of `id` is set.
    pub const fn test(&self, id: ComponentId) -> bool {
        (self.0 >> id.index()) & 1 == 1
    }

    /// Returns `true` if every component of `required` is present in this signature.
    pub const fn contains_all(&self, required: &Signature) -> bool {
        self.0 & required.0 == required.0
    }

    /// Returns `true` if no bit is set.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of component types in this signature.
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates over all component ids set in this signature, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ComponentId> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            ComponentId::new(index)
        })
    }
}

impl BitAnd for Signature {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for Signature {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl FromIterator<ComponentId> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:0width$b}", self.0, width = MAX_COMPONENTS)
    }
}
