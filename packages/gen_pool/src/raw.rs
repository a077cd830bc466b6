use std::ptr::{self, NonNull};

use crate::{Generation, Handle};

/// The slot algorithm shared by the owning and non-owning pool types.
///
/// Does not own, allocate, or free its storage: the wrapper that created it is
/// responsible for the backing bytes and for calling
/// [`drop_live_payloads()`](Self::drop_live_payloads) before the storage goes
/// away.
///
/// Storage layout is struct-of-arrays: all generation counters first (one byte
/// per slot, so bulk liveness scans touch a dense range independent of payload
/// size), then the payload slots, aligned for `T`.
pub(crate) struct RawGenPool<T> {
    generations: NonNull<Generation>,
    payloads: NonNull<T>,
    capacity: usize,
    /// Next slot the append cursor will try. Never decreases.
    top: usize,
}

impl<T> RawGenPool<T> {
    /// Byte offset from the storage base to the payload sub-array.
    ///
    /// Const so callers can size stack buffers at compile time, hence the
    /// inline mask arithmetic instead of [`align_up()`](raw_alloc::align_up).
    pub(crate) const fn payload_offset(capacity: usize) -> usize {
        let counter_bytes = capacity
            .checked_mul(size_of::<Generation>())
            .expect("generation array size cannot exceed virtual memory");
        let mask = align_of::<T>() - 1;
        (counter_bytes + mask) & !mask
    }

    /// Total bytes of backing storage required for `capacity` slots.
    pub(crate) const fn size_for(capacity: usize) -> usize {
        let payload_bytes = capacity
            .checked_mul(size_of::<T>())
            .expect("payload array size cannot exceed virtual memory");
        Self::payload_offset(capacity)
            .checked_add(payload_bytes)
            .expect("pool storage size cannot exceed virtual memory")
    }

    /// Takes over `capacity` slots of storage at `base`, zeroing the generation
    /// counters (every slot starts dead).
    ///
    /// # Safety
    ///
    /// The caller must ensure that `base` is aligned for `T`, refers to at least
    /// [`size_for(capacity)`](Self::size_for) writable bytes, and outlives this
    /// value.
    pub(crate) unsafe fn new(base: NonNull<u8>, capacity: usize) -> Self {
        assert!(
            size_of::<T>() > 0,
            "generational pools cannot store zero-sized values"
        );
        assert!(
            capacity.is_power_of_two(),
            "pool capacity must be a power of two, got {capacity}"
        );

        let generations = base.cast::<Generation>();

        // SAFETY: The payload sub-array starts within the block the caller
        // provided; `payload_offset` keeps it aligned for `T`.
        let payloads = unsafe { base.add(Self::payload_offset(capacity)) }.cast::<T>();

        // SAFETY: The caller provided at least `capacity` writable bytes at the
        // base; a zeroed counter is a valid dead generation.
        unsafe {
            ptr::write_bytes(generations.as_ptr(), 0, capacity);
        }

        Self {
            generations,
            payloads,
            capacity,
            top: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Counts live slots by scanning the dense generation sub-array.
    pub(crate) fn len(&self) -> usize {
        (0..self.capacity)
            .filter(|&index| self.generation_at(index).is_alive())
            .count()
    }

    #[inline]
    fn generation_ptr(&self, index: usize) -> NonNull<Generation> {
        debug_assert!(index < self.capacity);

        // SAFETY: `index < capacity`, checked by every caller, so the pointer
        // stays inside the generation sub-array.
        unsafe { self.generations.add(index) }
    }

    #[inline]
    fn payload_ptr(&self, index: usize) -> NonNull<T> {
        debug_assert!(index < self.capacity);

        // SAFETY: `index < capacity`, checked by every caller, so the pointer
        // stays inside the payload sub-array.
        unsafe { self.payloads.add(index) }
    }

    /// The current generation of the slot at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub(crate) fn generation_at(&self, index: usize) -> Generation {
        assert!(
            index < self.capacity,
            "slot index {index} out of range for pool of capacity {}",
            self.capacity
        );

        // SAFETY: Bounds-checked above; counters are always initialized.
        unsafe { self.generation_ptr(index).read() }
    }

    pub(crate) fn handle_at(&self, index: usize) -> Handle<T> {
        Handle::new(index, self.generation_at(index))
    }

    pub(crate) fn value_at(&self, index: usize) -> Option<&T> {
        if !self.generation_at(index).is_alive() {
            return None;
        }

        // SAFETY: The alive bit is set iff the payload is constructed; shared
        // access is tied to `&self`.
        Some(unsafe { self.payload_ptr(index).as_ref() })
    }

    pub(crate) fn value_at_mut(&mut self, index: usize) -> Option<&mut T> {
        if !self.generation_at(index).is_alive() {
            return None;
        }

        // SAFETY: As in `value_at()`, plus we hold `&mut self`.
        Some(unsafe { self.payload_ptr(index).as_mut() })
    }

    pub(crate) fn is_current(&self, handle: Handle<T>) -> bool {
        handle.index() < self.capacity && handle.generation() == self.generation_at(handle.index())
    }

    pub(crate) fn get(&self, handle: Handle<T>) -> Option<&T> {
        if !self.is_current(handle) {
            return None;
        }
        self.value_at(handle.index())
    }

    pub(crate) fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if !self.is_current(handle) {
            return None;
        }
        self.value_at_mut(handle.index())
    }

    /// Constructs `value` in the slot at `index` iff the slot is currently dead.
    pub(crate) fn try_insert_at(&mut self, index: usize, value: T) -> Result<Handle<T>, T> {
        if index >= self.capacity {
            raw_alloc::contract_violation!("insert index out of range");
            return Err(value);
        }

        let mut generation = self.generation_at(index);
        if generation.is_alive() {
            return Err(value);
        }

        // SAFETY: The slot is dead, so its payload bytes are unoccupied; the
        // pointer is in bounds per the check above.
        unsafe {
            self.payload_ptr(index).write(value);
        }

        generation.set_alive();

        // SAFETY: In bounds per the check above.
        unsafe {
            self.generation_ptr(index).write(generation);
        }

        Ok(Handle::new(index, generation))
    }

    /// Inserts at the append cursor, advancing it on success.
    ///
    /// The cursor never revisits earlier slots, so freed slots are not reused
    /// here; it also does not skip a slot that was manually occupied via
    /// [`try_insert_at()`](Self::try_insert_at): the append stream simply stops
    /// at it until that slot is freed.
    pub(crate) fn try_append(&mut self, value: T) -> Result<Handle<T>, T> {
        if self.top == self.capacity {
            raw_alloc::contract_violation!("append to a pool whose slots are exhausted");
            return Err(value);
        }

        let handle = self.try_insert_at(self.top, value)?;
        self.top += 1;
        Ok(handle)
    }

    /// Destroys the payload at `index` iff the slot is alive, advancing its
    /// generation. Returns whether a payload was destroyed.
    pub(crate) fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.capacity {
            raw_alloc::contract_violation!("remove index out of range");
            return false;
        }

        let mut generation = self.generation_at(index);
        if !generation.is_alive() {
            raw_alloc::contract_violation!("remove of a slot that holds no value");
            return false;
        }

        // SAFETY: The alive bit is set, so the payload is constructed; it is
        // dropped exactly once because the bit is cleared below.
        unsafe {
            ptr::drop_in_place(self.payload_ptr(index).as_ptr());
        }

        generation.set_dead_and_advance();

        // SAFETY: In bounds per the check above.
        unsafe {
            self.generation_ptr(index).write(generation);
        }

        true
    }

    /// Destroys every live payload, marking the slots dead.
    ///
    /// Called by the owning wrappers on drop, before the storage goes away.
    pub(crate) fn drop_live_payloads(&mut self) {
        for index in 0..self.capacity {
            if self.generation_at(index).is_alive() {
                self.remove_at(index);
            }
        }
    }
}
