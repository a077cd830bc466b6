use std::fmt;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::num::NonZero;
use std::ptr::NonNull;

use crate::{Generation, Handle, RawGenPool};

/// A generational slot pool over storage it does not own.
///
/// Where [`GenPool`](crate::GenPool) allocates its own backing block, a
/// `GenSlots` borrows one from the caller, typically a stack array or a region
/// carved out of some larger buffer. The borrow keeps the storage alive for as
/// long as the pool exists; dropping the pool destroys any live payloads but
/// leaves the bytes to their owner.
///
/// The slot semantics are identical to [`GenPool`](crate::GenPool): fixed
/// power-of-two capacity, generation-checked handles, an append cursor that
/// never revisits freed slots.
///
/// Size the buffer with [`required_bytes()`](Self::required_bytes), which
/// includes worst-case alignment slack on top of the raw storage size.
///
/// # Examples
///
/// ```
/// use std::mem::MaybeUninit;
///
/// use gen_pool::GenSlots;
/// use new_zealand::nz;
///
/// let mut storage = [MaybeUninit::<u8>::uninit(); GenSlots::<u64>::required_bytes(4)];
/// let mut slots = GenSlots::new(&mut storage, nz!(4));
///
/// let handle = slots.try_append(42_u64).expect("fresh pool has free slots");
/// assert_eq!(slots.get(handle), Some(&42));
///
/// slots.remove_at(handle.index());
/// assert!(!slots.is_current(handle));
/// ```
pub struct GenSlots<'s, T> {
    raw: RawGenPool<T>,
    _storage: PhantomData<&'s mut [MaybeUninit<u8>]>,
}

// SAFETY: The pool has exclusive access to the borrowed storage for its whole
// lifetime; sending it sends the payloads, nothing is shared.
unsafe impl<T: Send> Send for GenSlots<'_, T> {}

// SAFETY: Shared access only reads payloads and counters, equivalent to `&[T]`.
unsafe impl<T: Sync> Sync for GenSlots<'_, T> {}

impl<'s, T> GenSlots<'s, T> {
    /// Creates a pool with `capacity` slots inside `storage`.
    ///
    /// The storage must hold at least [`required_bytes()`](Self::required_bytes)
    /// for the capacity; the exact need depends on how the buffer happens to be
    /// aligned, so size for the worst case.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized, `capacity` is not a power of two, or the
    /// storage is too small once aligned for `T`.
    #[must_use]
    pub fn new(storage: &'s mut [MaybeUninit<u8>], capacity: NonZero<usize>) -> Self {
        let capacity = capacity.get();
        let shift = storage.as_ptr().align_offset(align_of::<T>());
        let needed = RawGenPool::<T>::size_for(capacity);

        assert!(
            storage.len() >= shift.saturating_add(needed),
            "pool of capacity {capacity} needs {needed} bytes after aligning but storage holds {}",
            storage.len()
        );

        // SAFETY: A `&mut` slice pointer is never null.
        let base = unsafe { NonNull::new_unchecked(storage.as_mut_ptr().cast::<u8>().add(shift)) };

        // SAFETY: The aligned sub-range holds `size_for(capacity)` bytes and the
        // borrow keeps it exclusively ours for `'s`.
        let raw = unsafe { RawGenPool::new(base, capacity) };

        Self {
            raw,
            _storage: PhantomData,
        }
    }

    /// Bytes of storage guaranteed to fit `capacity` slots at any alignment.
    ///
    /// This is the raw storage size plus worst-case padding to align the start
    /// of the buffer for `T`.
    #[must_use]
    pub const fn required_bytes(capacity: usize) -> usize {
        RawGenPool::<T>::size_for(capacity) + align_of::<T>() - 1
    }

    /// The number of slots in the pool.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// The number of slots currently holding a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether no slot currently holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A handle to the slot at `index`, capturing its current generation.
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
    /// # Errors
    ///
    /// Hands `value` back if the slot is alive or `index` is out of range.
    pub fn try_insert_at(&mut self, index: usize, value: T) -> Result<Handle<T>, T> {
        self.raw.try_insert_at(index, value)
    }

    /// Constructs `value` in the next slot of the append cursor.
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
    /// Returns whether a value was destroyed; see
    /// [`GenPool::remove_at()`](crate::GenPool::remove_at) for the semantics.
    pub fn remove_at(&mut self, index: usize) -> bool {
        self.raw.remove_at(index)
    }
}

impl<T> Drop for GenSlots<'_, T> {
    fn drop(&mut self) {
        // Payloads die with the pool; the bytes belong to the caller.
        self.raw.drop_live_payloads();
    }
}

impl<T> fmt::Debug for GenSlots<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenSlots")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
