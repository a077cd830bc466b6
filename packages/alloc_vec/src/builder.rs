use std::marker::PhantomData;

use raw_alloc::{HeapAllocator, RawAllocator};

use crate::{AllocVec, DEFAULT_GROW_FACTOR, MIN_GROW_FACTOR};

/// Builder for creating an instance of [`AllocVec`].
///
/// All settings are optional: the default is a heap-backed array with no initial
/// capacity and a grow factor of 2.
///
/// # Examples
///
/// ```
/// use alloc_vec::AllocVec;
/// use bump_arena::Arena;
///
/// let arena = Arena::<512>::new();
///
/// let mut values = AllocVec::builder()
///     .allocator(&arena)
///     .capacity(16)
///     .grow_factor(2)
///     .build();
///
/// values.push(1_u32);
/// assert_eq!(values.capacity(), 16);
/// ```
#[derive(Debug)]
#[must_use]
pub struct AllocVecBuilder<T, A: RawAllocator> {
    allocator: A,
    capacity: usize,
    grow_factor: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> AllocVecBuilder<T, HeapAllocator> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            allocator: HeapAllocator::new(),
            capacity: 0,
            grow_factor: DEFAULT_GROW_FACTOR,
            _marker: PhantomData,
        }
    }
}

impl<T, A: RawAllocator> AllocVecBuilder<T, A> {
    /// Sets the allocator the array requests storage from.
    ///
    /// Pass a reference to share an allocator among several containers; the
    /// borrow guarantees the allocator outlives the array.
    #[inline]
    pub fn allocator<B: RawAllocator>(self, allocator: B) -> AllocVecBuilder<T, B> {
        AllocVecBuilder {
            allocator,
            capacity: self.capacity,
            grow_factor: self.grow_factor,
            _marker: PhantomData,
        }
    }

    /// Sets the number of elements of backing storage to pre-allocate.
    #[inline]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the capacity multiplier applied on growth.
    ///
    /// # Panics
    ///
    /// Panics if `grow_factor` is zero.
    #[inline]
    pub fn grow_factor(mut self, grow_factor: usize) -> Self {
        assert!(
            grow_factor >= MIN_GROW_FACTOR,
            "grow factor must be at least {MIN_GROW_FACTOR}, got {grow_factor}"
        );
        self.grow_factor = grow_factor;
        self
    }

    /// Creates the configured [`AllocVec`].
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized or if a non-zero initial capacity was
    /// requested and the allocator refuses it.
    #[must_use]
    pub fn build(self) -> AllocVec<T, A> {
        AllocVec::with_parts(self.allocator, self.capacity, self.grow_factor)
    }
}
