use std::marker::PhantomData;
use std::num::NonZero;

use raw_alloc::{HeapAllocator, RawAllocator};

use crate::GenPool;

/// Builder of [`GenPool`] instances, from [`GenPool::builder()`].
///
/// Capacity is mandatory and must be a power of two. The allocator defaults to
/// [`HeapAllocator`] and can be swapped for anything implementing
/// [`RawAllocator`], owned or borrowed.
///
/// # Examples
///
/// ```
/// use bump_arena::Arena;
/// use gen_pool::GenPool;
/// use new_zealand::nz;
///
/// let arena = Arena::<512>::new();
///
/// let pool = GenPool::<u32>::builder()
///     .capacity(nz!(16))
///     .allocator(&arena)
///     .build();
///
/// assert_eq!(pool.capacity(), 16);
/// ```
#[derive(Debug)]
#[must_use]
pub struct GenPoolBuilder<T, A: RawAllocator = HeapAllocator> {
    capacity: Option<NonZero<usize>>,
    alloc: A,
    _marker: PhantomData<fn() -> T>,
}

impl<T> GenPoolBuilder<T, HeapAllocator> {
    pub(crate) fn new() -> Self {
        Self {
            capacity: None,
            alloc: HeapAllocator::new(),
            _marker: PhantomData,
        }
    }
}

impl<T, A: RawAllocator> GenPoolBuilder<T, A> {
    /// Sets the number of slots. Mandatory; must be a power of two.
    pub fn capacity(mut self, capacity: NonZero<usize>) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Sets the allocator the pool's single backing block comes from.
    pub fn allocator<B: RawAllocator>(self, alloc: B) -> GenPoolBuilder<T, B> {
        GenPoolBuilder {
            capacity: self.capacity,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Creates the pool, allocating its backing storage.
    ///
    /// # Panics
    ///
    /// Panics if no capacity was set, the capacity is not a power of two, `T`
    /// is zero-sized, or the allocation fails.
    #[must_use]
    pub fn build(self) -> GenPool<T, A> {
        let capacity = self
            .capacity
            .expect("the pool capacity must be set before calling build()");

        GenPool::with_capacity_in(self.alloc, capacity)
    }
}
