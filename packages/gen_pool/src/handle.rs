use std::fmt;
use std::marker::PhantomData;

use crate::Generation;

/// A weak, non-owning reference to a pool slot.
///
/// A handle stores only the slot index and the [`Generation`] captured when it
/// was created; it holds no pointer into the pool. It is resolved by handing it
/// back to the pool that issued it ([`GenPool::get()`](crate::GenPool::get)
/// and friends), which compares the captured generation against the slot's
/// current one. That comparison is the entire validity check.
///
/// Handles are plain data: freely copyable, comparable, and hashable. A handle
/// never keeps its referent alive and never blocks removal.
///
/// Resolving a handle against a pool other than the one that issued it is not
/// detected; the result is whatever value (or staleness verdict) that pool holds
/// at the same index and generation.
pub struct Handle<T> {
    index: usize,
    generation: Generation,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    #[inline]
    pub(crate) fn new(index: usize, generation: Generation) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// The slot index this handle refers to.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The generation captured when this handle was created.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

// Manual impls: the derives would needlessly require `T: Clone` and so on,
// but a handle is plain data regardless of its payload type.

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("index", &self.index)
            .field("generation", &self.generation)
            .finish()
    }
}
