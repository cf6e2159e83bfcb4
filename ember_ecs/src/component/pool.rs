//! Contiguous storage for **components** of one type.

use std::any::{type_name, Any};
use std::ops::{Index, IndexMut};

use super::Component;

/// Number of slots of a freshly created pool.
pub const POOL_INITIAL_SIZE: usize = 10;

/// Storage for statically typed components of ECS.
///
/// Slot `i` holds the component of the entity with id `i`, so the pool
/// is sparse: it covers the highest entity id that ever used it.
///
#[derive(Debug)]
pub struct Pool<T>
where
    T: Component,
{
    slots: Vec<Option<T>>,
}

impl<T> Pool<T>
where
    T: Component,
{
    /// Creates a pool with [`POOL_INITIAL_SIZE`] empty slots.
    pub fn new() -> Self {
        Self::with_size(POOL_INITIAL_SIZE)
    }

    /// Creates a pool with `size` empty slots.
    pub fn with_size(size: usize) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(size, || None);
        Self { slots }
    }

    /// Number of slots in the pool.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the pool has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Changes number of slots to `size`.
    /// New slots are empty, existing slots below `size` keep their contents.
    pub fn resize(&mut self, size: usize) {
        self.slots.resize_with(size, || None);
    }

    /// Grows the pool if needed so that `index` is a valid slot.
    pub fn ensure_index(&mut self, index: usize) {
        if index >= self.slots.len() {
            self.resize(index + 1);
        }
    }

    /// Stores component in the slot, growing the pool when needed.
    ///
    /// Returns previously stored component, if any.
    ///
    pub fn set(&mut self, index: usize, component: T) -> Option<T> {
        self.ensure_index(index);
        self.slots[index].replace(component)
    }

    /// Takes component out of the slot, leaving it empty.
    pub fn take(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index)?.take()
    }

    /// Retrieves an immutable reference to component in the slot.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.as_ref()
    }

    /// Retrieves a mutable reference to component in the slot.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)?.as_mut()
    }

    /// Empties all slots without changing the size of the pool.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Returns iterator over all occupied slots with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| Some((index, slot.as_ref()?)))
    }
}

impl<T> Default for Pool<T>
where
    T: Component,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for Pool<T>
where
    T: Component,
{
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).expect("there is no component in the slot")
    }
}

impl<T> IndexMut<usize> for Pool<T>
where
    T: Component,
{
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.get_mut(index)
            .expect("there is no component in the slot")
    }
}

/// Type-erased view of a [`Pool`], so pools of all types can live in one collection.
pub trait AnyPool: Any {
    /// Number of slots in the pool.
    fn len(&self) -> usize;

    /// Drops component in the slot, if any.
    fn clear_slot(&mut self, index: usize);

    /// Type name of components in the pool.
    fn component_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> AnyPool for Pool<T>
where
    T: Component,
{
    fn len(&self) -> usize {
        Pool::len(self)
    }

    fn clear_slot(&mut self, index: usize) {
        self.take(index);
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn AnyPool {
    /// Downcasts to the pool of components of type `T`.
    pub fn downcast_ref<T>(&self) -> Option<&Pool<T>>
    where
        T: Component,
    {
        self.as_any().downcast_ref()
    }

    /// Downcasts to the pool of components of type `T`.
    pub fn downcast_mut<T>(&mut self) -> Option<&mut Pool<T>>
    where
        T: Component,
    {
        self.as_any_mut().downcast_mut()
    }
}
