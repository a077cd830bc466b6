use std::fmt;
use std::num::NonZero;
use std::ptr::NonNull;

use raw_alloc::{HeapAllocator, RawAllocator};

use crate::{GenPoolBuilder, Generation, Handle, RawGenPool};

/// A generational slot pool that owns its backing storage.
///
/// The pool makes exactly one allocation, at construction, through the allocator
/// it is given, and releases it exactly once, on drop. Slot payloads are
/// constructed on insert and destroyed on remove (or on pool drop for values
/// still alive at that point), independent of the backing allocation's lifetime.
///
/// Capacity is fixed and must be a power of two; the pool never grows.
///
/// # Examples
///
/// ```
/// use gen_pool::GenPool;
/// use new_zealand::nz;
///
/// let mut pool = GenPool::builder().capacity(nz!(4)).build();
///
/// let a = pool.try_append(1_u32).expect("fresh pool has free slots");
/// let b = pool.try_append(2_u32).expect("fresh pool has free slots");
///
/// assert_eq!(pool.len(), 2);
/// assert_eq!(pool.get(a), Some(&1));
///
/// pool.remove_at(b.index());
/// assert_eq!(pool.get(b), None);
/// ```
///
/// Backed by an arena:
///
/// ```
/// use bump_arena::Arena;
/// use gen_pool::GenPool;
/// use new_zealand::nz;
///
/// let arena = Arena::<1024>::new();
/// let mut pool = GenPool::builder().capacity(nz!(8)).allocator(&arena).build();
///
/// let handle = pool.try_append("in the arena").expect("fresh pool has free slots");
/// assert!(pool.is_current(handle));
/// ```
pub struct GenPool<T, A: RawAllocator = HeapAllocator> {
    raw: RawGenPool<T>,
    base: NonNull<u8>,
    alloc: A,
}

// SAFETY: The pool exclusively owns its storage and payloads; sending it sends
// the payloads and the allocator, nothing is shared.
unsafe impl<T: Send, A: RawAllocator + Send> Send for GenPool<T, A> {}

// SAFETY: Shared access only reads payloads and counters, equivalent to `&[T]`.
unsafe impl<T: Sync, A: RawAllocator + Sync> Sync for GenPool<T, A> {}

impl<T> GenPool<T, HeapAllocator> {
    /// Creates a heap-backed pool with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized, `capacity` is not a power of two, or the
    /// allocation fails.
    #[must_use]
    pub fn with_capacity(capacity: NonZero<usize>) -> Self {
        Self::builder().capacity(capacity).build()
    }

    /// Starts building a [`GenPool`], for configurations beyond the defaults.
    #[must_use]
    pub fn builder() -> GenPoolBuilder<T, HeapAllocator> {
        GenPoolBuilder::new()
    }
}

impl<T, A: RawAllocator> GenPool<T, A> {
    /// Creates a pool with `capacity` slots whose storage comes from `alloc`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized, `capacity` is not a power of two, or the
    /// allocation fails.
    #[must_use]
    pub fn with_capacity_in(alloc: A, capacity: NonZero<usize>) -> Self {
        let capacity = capacity.get();
        let bytes = RawGenPool::<T>::size_for(capacity);

        let base = alloc
            .allocate(bytes, align_of::<T>())
            .unwrap_or_else(|| {
                panic!(
                    "failed to allocate {bytes} bytes of pool storage through allocator '{}'",
                    alloc.label()
                )
            });

        // SAFETY: The block was just allocated with `size_for(capacity)` bytes
        // and payload alignment, and lives until our `Drop` releases it.
        let raw = unsafe { RawGenPool::new(base, capacity) };

        Self { raw, base, alloc }
    }

    /// Total bytes of backing storage required for `capacity` slots.
    ///
    /// The figure covers the generation counter sub-array, the payload
    /// sub-array, and the alignment padding between them.
    ///
    /// # Examples
    ///
    /// ```
    /// use gen_pool::GenPool;
    ///
    /// // 8 one-byte counters padded to u64 alignment, then 8 payloads.
    /// assert_eq!(GenPool::<u64>::size_for(8), 8 + 8 * 8);
    /// ```
    #[must_use]
    pub fn size_for(capacity: usize) -> usize {
        RawGenPool::<T>::size_for(capacity)
    }

    /// The number of slots in the pool.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// The number of slots currently holding a value.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Can be mutated to infinitely growing memory use.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether no slot currently holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The total bytes of the pool's single backing allocation.
    #[must_use]
    pub fn bytes(&self) -> usize {
        Self::size_for(self.capacity())
    }

    /// The allocator the backing storage came from.
    #[must_use]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// A handle to the slot at `index`, capturing its current generation.
    ///
    /// The slot need not be alive: a handle to a dead slot resolves to [`None`]
    /// until the slot is reused, and goes permanently stale at that point.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn handle_at(&self, index: usize) -> Handle<T> {
        self.raw.handle_at(index)
    }

    /// The value in the slot at `index`, if the slot is alive.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<&T> {
        self.raw.value_at(index)
    }

    /// The value in the slot at `index`, mutably, if the slot is alive.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn value_at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.raw.value_at_mut(index)
    }

    /// The current generation of the slot at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn generation_at(&self, index: usize) -> Generation {
        self.raw.generation_at(index)
    }

    /// Whether `handle` still matches the generation of the slot it refers to.
    ///
    /// This comparison is the entire validity check; no pointer identity is
    /// involved. A handle that was ever observed stale stays stale forever.
    #[must_use]
    pub fn is_current(&self, handle: Handle<T>) -> bool {
        self.raw.is_current(handle)
    }

    /// Resolves `handle` to its value.
    ///
    /// Returns [`None`] if the handle is stale or its slot holds no value.
    #[must_use]
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.raw.get(handle)
    }

    /// Resolves `handle` to its value, mutably.
    ///
    /// Returns [`None`] if the handle is stale or its slot holds no value.
    #[must_use]
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.raw.get_mut(handle)
    }

    /// Constructs `value` in the slot at `index`, iff that slot is currently
    /// dead.
    ///
    /// This is the only way to reuse a slot freed by
    /// [`remove_at()`](Self::remove_at); the append cursor never comes back.
    ///
    /// # Errors
    ///
    /// Hands `value` back if the slot is alive or `index` is out of range.
    pub fn try_insert_at(&mut self, index: usize, value: T) -> Result<Handle<T>, T> {
        self.raw.try_insert_at(index, value)
    }

    /// Constructs `value` in the next slot of the append cursor.
    ///
    /// The cursor hands out slots in index order and never revisits freed
    /// slots; this pool carries no free list.
    ///
    /// # Errors
    ///
    /// Hands `value` back once the cursor has exhausted the capacity, or if the
    /// cursor's slot was occupied via [`try_insert_at()`](Self::try_insert_at).
    pub fn try_append(&mut self, value: T) -> Result<Handle<T>, T> {
        self.raw.try_append(value)
    }

    /// Destroys the value in the slot at `index`, iff the slot is alive.
    ///
    /// Advancing the slot's generation is what turns every previously captured
    /// handle for this slot permanently stale. Returns whether a value was
    /// destroyed; removing from a dead slot reports `false` (and a contract
    /// violation in debug builds, since it usually indicates a double remove).
    pub fn remove_at(&mut self, index: usize) -> bool {
        self.raw.remove_at(index)
    }
}

impl<T, A: RawAllocator> Drop for GenPool<T, A> {
    fn drop(&mut self) {
        self.raw.drop_live_payloads();

        // SAFETY: The block was allocated in `with_capacity_in()` with exactly
        // this size and alignment and is released only here.
        unsafe {
            self.alloc
                .deallocate(self.base, self.bytes(), align_of::<T>());
        }
    }
}

impl<T, A: RawAllocator> fmt::Debug for GenPool<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenPool")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("allocator", &self.alloc.label())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use new_zealand::nz;
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(GenPool<u32>: Send, Sync);

    /// Test helper that tracks how many times it has been dropped.
    struct DropTracker {
        drops: Rc<Cell<usize>>,
    }

    impl DropTracker {
        fn new(drops: &Rc<Cell<usize>>) -> Self {
            Self {
                drops: Rc::clone(drops),
            }
        }
    }

    impl Drop for DropTracker {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[test]
    fn handle_goes_stale_on_removal_and_stays_stale() {
        let mut pool = GenPool::with_capacity(nz!(4));

        let h = pool.try_append(100_u32).expect("fresh pool has free slots");
        assert!(pool.is_current(h));
        assert_eq!(pool.get(h), Some(&100));

        assert!(pool.remove_at(0));
        assert!(!pool.is_current(h));
        assert_eq!(pool.get(h), None);

        // Reusing the slot produces a fresh handle; the old one stays stale
        // forever even though the indices are equal.
        let h2 = pool.try_insert_at(0, 200_u32).expect("slot 0 was freed");
        assert_eq!(h.index(), h2.index());
        assert!(pool.is_current(h2));
        assert_eq!(pool.get(h2), Some(&200));
        assert!(!pool.is_current(h));
        assert_eq!(pool.get(h), None);
    }

    #[test]
    fn append_walks_slots_in_order_until_exhausted() {
        let mut pool = GenPool::with_capacity(nz!(4));

        for v in 0..4_u32 {
            let handle = pool.try_append(v).expect("pool has free slots");
            assert_eq!(handle.index(), v as usize);
        }

        assert_eq!(pool.try_append(99), Err(99));
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn append_does_not_reuse_freed_slots() {
        let mut pool = GenPool::with_capacity(nz!(2));

        pool.try_append(1_u32).expect("pool has free slots");
        assert!(pool.remove_at(0));

        // Slot 0 is free, but the cursor is past it.
        let handle = pool.try_append(2).expect("slot 1 is still unused");
        assert_eq!(handle.index(), 1);
        assert_eq!(pool.try_append(3), Err(3));

        // Explicit reuse is the only way back into slot 0.
        let reused = pool.try_insert_at(0, 4).expect("slot 0 was freed");
        assert_eq!(reused.index(), 0);
    }

    #[test]
    fn insert_into_alive_slot_is_rejected() {
        let mut pool = GenPool::with_capacity(nz!(2));
        pool.try_append("first".to_string()).expect("pool has free slots");

        let rejected = pool.try_insert_at(0, "second".to_string());
        assert_eq!(rejected, Err("second".to_string()));
        assert_eq!(pool.value_at(0), Some(&"first".to_string()));
    }

    #[test]
    fn double_remove_reports_false() {
        let mut pool = GenPool::with_capacity(nz!(2));
        pool.try_append(1_u32).expect("pool has free slots");

        assert!(pool.remove_at(0));
        assert!(!pool.remove_at(0));
    }

    #[test]
    fn remove_drops_the_payload_exactly_once() {
        let drops = Rc::new(Cell::new(0));
        let mut pool = GenPool::with_capacity(nz!(4));

        pool.try_append(DropTracker::new(&drops))
            .ok()
            .expect("pool has free slots");
        assert_eq!(drops.get(), 0);

        assert!(pool.remove_at(0));
        assert_eq!(drops.get(), 1);

        drop(pool);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn dropping_the_pool_drops_live_payloads() {
        let drops = Rc::new(Cell::new(0));

        {
            let mut pool = GenPool::with_capacity(nz!(4));
            for _ in 0..3 {
                pool.try_append(DropTracker::new(&drops))
                    .ok()
                    .expect("pool has free slots");
            }
        }

        assert_eq!(drops.get(), 3);
    }

    #[test]
    fn handle_to_dead_slot_resolves_to_none() {
        let pool = GenPool::<u32>::with_capacity(nz!(2));

        let handle = pool.handle_at(1);
        assert!(pool.is_current(handle));
        assert_eq!(pool.get(handle), None);
        assert_eq!(pool.value_at(1), None);
    }

    #[test]
    fn get_mut_allows_in_place_mutation() {
        let mut pool = GenPool::with_capacity(nz!(2));
        let handle = pool.try_append(10_u32).expect("pool has free slots");

        *pool.get_mut(handle).expect("handle is current") += 5;
        assert_eq!(pool.get(handle), Some(&15));
    }

    #[test]
    fn size_for_covers_counters_padding_and_payloads() {
        // 4 counters padded to 8-byte alignment, then 4 u64 payloads.
        assert_eq!(GenPool::<u64>::size_for(4), 8 + 4 * 8);
        // u8 payloads need no padding.
        assert_eq!(GenPool::<u8>::size_for(4), 4 + 4);
    }

    #[test]
    fn arena_backed_pool_releases_storage_as_a_no_op() {
        let arena = bump_arena::Arena::<256>::new();

        {
            let mut pool = GenPool::builder().capacity(nz!(8)).allocator(&arena).build();
            pool.try_append(7_u64).expect("pool has free slots");
            assert_eq!(arena.allocated_bytes(), GenPool::<u64>::size_for(8));
        }

        // Arena deallocation is a no-op; the cursor is untouched.
        assert_eq!(arena.allocated_bytes(), GenPool::<u64>::size_for(8));
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn non_power_of_two_capacity_is_rejected() {
        drop(GenPool::<u32>::with_capacity(nz!(3)));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn handle_at_out_of_range_panics() {
        let pool = GenPool::<u32>::with_capacity(nz!(2));
        drop(pool.handle_at(2));
    }

    #[test]
    #[should_panic(expected = "failed to allocate")]
    fn null_allocator_cannot_back_a_pool() {
        drop(GenPool::<u32>::builder()
            .capacity(nz!(2))
            .allocator(raw_alloc::NullAllocator::new())
            .build());
    }

    #[test]
    fn out_of_range_operations_fail_softly() {
        let mut pool = GenPool::with_capacity(nz!(2));

        assert_eq!(pool.try_insert_at(5, 1_u32), Err(1));
        assert!(!pool.remove_at(5));
    }
}
