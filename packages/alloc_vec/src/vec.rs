use std::fmt;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use raw_alloc::{HeapAllocator, RawAllocator};

use crate::AllocVecBuilder;

/// The default capacity multiplier applied on growth.
pub const DEFAULT_GROW_FACTOR: usize = 2;

/// The smallest permitted capacity multiplier.
pub const MIN_GROW_FACTOR: usize = 1;

/// A contiguous growable array that requests all storage from a [`RawAllocator`].
///
/// Invariants, upheld by every operation:
///
/// - `len <= capacity`;
/// - the data pointer is null if and only if `capacity == 0`;
/// - elements `[0, len)` are live, `[len, capacity)` is uninitialized backing
///   memory.
///
/// The allocator is held by value. To share one allocator among several
/// containers, hand each a reference: `&A` is itself a [`RawAllocator`] and the
/// borrow guarantees the allocator outlives the container.
///
/// # Examples
///
/// ```
/// use alloc_vec::AllocVec;
///
/// let mut names = AllocVec::new();
/// names.push("anvil".to_string());
/// names.push("brick".to_string());
///
/// assert_eq!(names.len(), 2);
/// assert_eq!(names[0], "anvil");
/// ```
pub struct AllocVec<T, A: RawAllocator = HeapAllocator> {
    alloc: A,
    /// Null if and only if `capacity == 0`.
    ptr: *mut T,
    capacity: usize,
    len: usize,
    grow_factor: usize,
    _marker: PhantomData<T>,
}

// SAFETY: The raw pointer is an owning pointer to elements of `T`; sending the
// container sends the elements and the allocator, nothing is shared.
unsafe impl<T: Send, A: RawAllocator + Send> Send for AllocVec<T, A> {}

// SAFETY: Shared access only reads through the pointer, equivalent to `&[T]`.
unsafe impl<T: Sync, A: RawAllocator + Sync> Sync for AllocVec<T, A> {}

impl<T> AllocVec<T, HeapAllocator> {
    /// Creates an empty heap-backed array.
    ///
    /// No allocation happens until the first push.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building an [`AllocVec`], for configurations beyond the defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let values = AllocVec::<u64>::builder().capacity(32).grow_factor(4).build();
    ///
    /// assert_eq!(values.capacity(), 32);
    /// assert_eq!(values.grow_factor(), 4);
    /// ```
    #[must_use]
    pub fn builder() -> AllocVecBuilder<T, HeapAllocator> {
        AllocVecBuilder::new()
    }
}

impl<T, A: RawAllocator> AllocVec<T, A> {
    /// Creates an empty array that requests storage from `alloc`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized.
    #[must_use]
    pub fn new_in(alloc: A) -> Self {
        Self::with_parts(alloc, 0, DEFAULT_GROW_FACTOR)
    }

    /// Creates an array with `capacity` elements of backing storage pre-allocated
    /// from `alloc`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized or if the initial allocation fails.
    #[must_use]
    pub fn with_capacity_in(alloc: A, capacity: usize) -> Self {
        Self::with_parts(alloc, capacity, DEFAULT_GROW_FACTOR)
    }

    pub(crate) fn with_parts(alloc: A, capacity: usize, grow_factor: usize) -> Self {
        assert!(
            size_of::<T>() > 0,
            "AllocVec cannot store zero-sized values"
        );
        assert!(
            grow_factor >= MIN_GROW_FACTOR,
            "grow factor must be at least {MIN_GROW_FACTOR}, got {grow_factor}"
        );

        let mut new = Self {
            alloc,
            ptr: ptr::null_mut(),
            capacity: 0,
            len: 0,
            grow_factor,
            _marker: PhantomData,
        };

        if capacity > 0 {
            new.reserve(capacity);
        }

        new
    }

    /// The number of live elements.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Can be mutated to infinitely growing memory use.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no elements.
    ///
    /// An empty array may still be holding backing capacity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of elements the array can hold without growing.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The configured capacity multiplier.
    #[must_use]
    pub fn grow_factor(&self) -> usize {
        self.grow_factor
    }

    /// The number of bytes occupied by live elements.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        self.len * size_of::<T>()
    }

    /// The number of bytes of backing storage currently allocated.
    #[must_use]
    pub fn capacity_in_bytes(&self) -> usize {
        self.capacity * size_of::<T>()
    }

    /// The allocator this array requests storage from.
    #[must_use]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// The capacity a growth step would move to from `capacity`.
    ///
    /// The policy is `1 + capacity * grow_factor`; from an empty array with the
    /// default factor of 2 this produces the sequence `1, 3, 7, 15, …`.
    #[must_use]
    pub fn grown_capacity(&self, capacity: usize) -> usize {
        capacity
            .checked_mul(self.grow_factor)
            .and_then(|grown| grown.checked_add(1))
            .expect("grown capacity overflows usize, which would exceed virtual memory long before this point")
    }

    /// The live elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        if self.len == 0 {
            return &[];
        }

        // SAFETY: `ptr` is non-null whenever `len > 0` and elements `[0, len)`
        // are initialized, per the container invariants.
        unsafe { slice::from_raw_parts(self.ptr, self.len) }
    }

    /// The live elements as a mutable slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.len == 0 {
            return &mut [];
        }

        // SAFETY: As in `as_slice()`, plus we hold `&mut self`.
        unsafe { slice::from_raw_parts_mut(self.ptr, self.len) }
    }

    /// Appends `value`, growing if necessary, and returns a reference to it.
    ///
    /// # Panics
    ///
    /// Panics if growth is needed and the allocator refuses the request. Use
    /// [`try_push()`](Self::try_push) to handle exhaustion without panicking.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let mut values = AllocVec::new();
    /// let pushed = values.push(7);
    /// *pushed += 1;
    ///
    /// assert_eq!(values[0], 8);
    /// ```
    pub fn push(&mut self, value: T) -> &mut T {
        if self.len == self.capacity {
            self.reserve(self.grown_capacity(self.capacity));
        }

        // SAFETY: `len < capacity` after the growth above, so the slot is
        // inside the backing allocation and currently uninitialized.
        let slot = unsafe { self.ptr.add(self.len) };

        // SAFETY: Writing to uninitialized backing memory we own.
        unsafe {
            slot.write(value);
        }

        self.len += 1;

        // SAFETY: Just initialized; no other reference to it exists.
        unsafe { &mut *slot }
    }

    /// Appends `value` if storage permits.
    ///
    /// On growth failure the array is left untouched and the value is handed
    /// back, so the caller can retry elsewhere or drop it.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    /// use raw_alloc::NullAllocator;
    ///
    /// let mut grounded = AllocVec::builder().allocator(NullAllocator::new()).build();
    ///
    /// assert_eq!(grounded.try_push(42), Err(42));
    /// assert!(grounded.is_empty());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the value back if the allocator cannot provide grown storage.
    pub fn try_push(&mut self, value: T) -> Result<&mut T, T> {
        if self.len == self.capacity {
            let grown = self.grown_capacity(self.capacity);
            if !self.try_reserve(grown) {
                return Err(value);
            }
        }

        // SAFETY: `len < capacity` after the growth above, so the slot is inside
        // the backing allocation and currently uninitialized.
        let slot = unsafe { self.ptr.add(self.len) };

        // SAFETY: Writing to uninitialized backing memory we own.
        unsafe {
            slot.write(value);
        }

        self.len += 1;

        // SAFETY: Just initialized; no other reference to it exists.
        Ok(unsafe { &mut *slot })
    }

    /// Appends an element constructed in place and returns a reference to it.
    ///
    /// Growth happens before `f` runs, so `f` writes straight into the backing
    /// storage. Useful for large values that should not bounce through the stack.
    ///
    /// # Panics
    ///
    /// Panics if growth is needed and the allocator refuses the request.
    ///
    /// # Safety
    ///
    /// `f` must fully initialize the provided slot before returning.
    pub unsafe fn push_with(&mut self, f: impl FnOnce(&mut MaybeUninit<T>)) -> &mut T {
        if self.len == self.capacity {
            let grown = self.grown_capacity(self.capacity);
            self.reserve(grown);
        }

        // SAFETY: `len < capacity`, so the slot is inside the backing allocation.
        let slot = unsafe { self.ptr.add(self.len).cast::<MaybeUninit<T>>() };

        // SAFETY: The slot is uninitialized backing memory we own exclusively.
        f(unsafe { &mut *slot });

        self.len += 1;

        // SAFETY: The caller guarantees `f` initialized the slot.
        unsafe { (*slot).assume_init_mut() }
    }

    /// Removes and returns the last element, or [`None`] if the array is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let mut values = AllocVec::new();
    /// values.push('a');
    ///
    /// assert_eq!(values.pop(), Some('a'));
    /// assert_eq!(values.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;

        // SAFETY: The element at the old `len - 1` is live; decrementing `len`
        // first transfers ownership of it to the returned value.
        Some(unsafe { self.ptr.add(self.len).read() })
    }

    /// Removes the element at `index`, shifting every later element one slot
    /// left. O(n), order-preserving.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let mut values = AllocVec::new();
    /// for v in [1, 2, 3, 4] {
    ///     values.push(v);
    /// }
    ///
    /// assert_eq!(values.remove(1), 2);
    /// assert_eq!(values.as_slice(), &[1, 3, 4]);
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "remove index {index} out of bounds for length {}",
            self.len
        );

        // SAFETY: `index < len`, so the slot holds a live element whose
        // ownership moves into `value`.
        let (target, value) = unsafe {
            let target = self.ptr.add(index);
            (target, target.read())
        };

        // SAFETY: Shifting the `len - index - 1` live elements after the hole
        // one slot left; ranges overlap, `ptr::copy` handles that.
        unsafe {
            ptr::copy(target.add(1), target, self.len - index - 1);
        }

        self.len -= 1;
        value
    }

    /// Removes the element at `index` by swapping the last element into its
    /// place. O(1), does **not** preserve the relative order of elements.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let mut values = AllocVec::new();
    /// for v in [1, 2, 3, 4] {
    ///     values.push(v);
    /// }
    ///
    /// assert_eq!(values.swap_remove(1), 2);
    /// assert_eq!(values.as_slice(), &[1, 4, 3]);
    /// ```
    pub fn swap_remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "swap_remove index {index} out of bounds for length {}",
            self.len
        );

        // SAFETY: `index < len`, so the slot holds a live element whose
        // ownership moves into `value`.
        let (target, value) = unsafe {
            let target = self.ptr.add(index);
            (target, target.read())
        };

        let last_index = self.len - 1;
        if index != last_index {
            // SAFETY: Both pointers are inside the live range and distinct;
            // the last element's bytes move into the vacated slot.
            unsafe {
                ptr::copy_nonoverlapping(self.ptr.add(last_index), target, 1);
            }
        }

        self.len -= 1;
        value
    }

    /// Ensures capacity for at least `total` elements.
    ///
    /// No-op if `total <= capacity`; otherwise allocates storage for exactly
    /// `total` elements, relocates the live elements, and releases the old
    /// block.
    ///
    /// # Panics
    ///
    /// Panics if the allocator refuses the request. Use
    /// [`try_reserve()`](Self::try_reserve) to handle exhaustion without
    /// panicking.
    pub fn reserve(&mut self, total: usize) {
        assert!(
            self.try_reserve(total),
            "failed to reserve {total} elements through allocator '{}'",
            self.alloc.label()
        );
    }

    /// Ensures capacity for at least `total` elements, reporting failure instead
    /// of panicking.
    ///
    /// On failure the array is left exactly as it was: same elements, same
    /// capacity, same pointer.
    #[must_use]
    pub fn try_reserve(&mut self, total: usize) -> bool {
        if total <= self.capacity {
            return true;
        }

        let Some(new_ptr) = self.allocate_elements(total) else {
            return false;
        };

        if !self.ptr.is_null() {
            // SAFETY: Both blocks are distinct allocations sized for at least
            // `len` elements; a Rust move is a byte copy, so this relocates
            // every live element regardless of whether `T` is trivially
            // copyable.
            unsafe {
                ptr::copy_nonoverlapping(self.ptr, new_ptr.as_ptr(), self.len);
            }

            self.release_storage();
        }

        self.ptr = new_ptr.as_ptr();
        self.capacity = total;
        true
    }

    /// Resizes to exactly `total` elements.
    ///
    /// Growing appends clones of `value`; shrinking destroys the excess tail
    /// without releasing storage.
    ///
    /// # Panics
    ///
    /// Panics if growth is needed and the allocator refuses the request.
    pub fn resize(&mut self, total: usize, value: T)
    where
        T: Clone,
    {
        if total > self.len {
            self.reserve(total);

            while self.len < total {
                // SAFETY: `len < total <= capacity`; the slot is uninitialized
                // backing memory we own.
                unsafe {
                    self.ptr.add(self.len).write(value.clone());
                }
                self.len += 1;
            }
        } else {
            self.truncate(total);
        }
    }

    /// Destroys every element past the first `total`, keeping the storage.
    pub fn truncate(&mut self, total: usize) {
        while self.len > total {
            self.len -= 1;

            // SAFETY: The element at the new `len` was live and is now outside
            // the live range, so it is dropped exactly once.
            unsafe {
                ptr::drop_in_place(self.ptr.add(self.len));
            }
        }
    }

    /// Destroys all elements. The backing storage is kept for reuse.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let mut values = AllocVec::new();
    /// values.push(1);
    /// values.push(2);
    /// let capacity = values.capacity();
    ///
    /// values.clear();
    ///
    /// assert!(values.is_empty());
    /// assert_eq!(values.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Destroys all elements and releases the backing storage, returning the
    /// array to the valid-but-empty state: size 0, capacity 0, null pointer.
    pub fn reset(&mut self) {
        self.clear();

        if self.ptr.is_null() {
            return;
        }

        self.release_storage();
        self.ptr = ptr::null_mut();
        self.capacity = 0;
    }

    /// Reallocates the backing storage to exactly `len` elements.
    ///
    /// The observable element sequence never changes; only `capacity` does. If
    /// the array is empty, the storage is released outright. If the allocator
    /// cannot provide the smaller block, the array is left as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let mut values = AllocVec::builder().capacity(100).build();
    /// values.push(1);
    /// values.push(2);
    ///
    /// values.shrink_to_fit();
    ///
    /// assert_eq!(values.as_slice(), &[1, 2]);
    /// assert_eq!(values.capacity(), 2);
    /// ```
    pub fn shrink_to_fit(&mut self) {
        if self.capacity == self.len {
            return;
        }

        if self.len == 0 {
            self.reset();
            return;
        }

        let Some(new_ptr) = self.allocate_elements(self.len) else {
            return;
        };

        // SAFETY: Relocating `len` live elements between distinct blocks, as in
        // `try_reserve()`.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr, new_ptr.as_ptr(), self.len);
        }

        self.release_storage();
        self.ptr = new_ptr.as_ptr();
        self.capacity = self.len;
    }

    fn allocate_elements(&self, count: usize) -> Option<NonNull<T>> {
        let bytes = count.checked_mul(size_of::<T>())?;
        Some(self.alloc.allocate(bytes, align_of::<T>())?.cast::<T>())
    }

    /// Releases the current backing block. The caller maintains the pointer and
    /// capacity fields afterwards.
    fn release_storage(&mut self) {
        // SAFETY: `ptr` is non-null here per the invariant, so it came from
        // `allocate_elements()` with exactly this size and alignment.
        unsafe {
            self.alloc.deallocate(
                NonNull::new_unchecked(self.ptr.cast::<u8>()),
                self.capacity * size_of::<T>(),
                align_of::<T>(),
            );
        }
    }
}

impl<T, A: RawAllocator> Drop for AllocVec<T, A> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T, A: RawAllocator + Default> Default for AllocVec<T, A> {
    fn default() -> Self {
        Self::with_parts(A::default(), 0, DEFAULT_GROW_FACTOR)
    }
}

impl<T, A: RawAllocator> Deref for AllocVec<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: RawAllocator> DerefMut for AllocVec<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone, A: RawAllocator + Clone> Clone for AllocVec<T, A> {
    fn clone(&self) -> Self {
        let mut new = Self::with_parts(self.alloc.clone(), self.len, self.grow_factor);

        for value in self {
            new.push(value.clone());
        }

        new
    }
}

impl<T: fmt::Debug, A: RawAllocator> fmt::Debug for AllocVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'v, T, A: RawAllocator> IntoIterator for &'v AllocVec<T, A> {
    type Item = &'v T;
    type IntoIter = slice::Iter<'v, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'v, T, A: RawAllocator> IntoIterator for &'v mut AllocVec<T, A> {
    type Item = &'v mut T;
    type IntoIter = slice::IterMut<'v, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use bump_arena::Arena;
    use raw_alloc::NullAllocator;
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(AllocVec<u32>: Send, Sync, Default);

    /// Test helper whose clones and drops are observable from the outside.
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
    fn growth_follows_the_literal_sequence() {
        let mut values = AllocVec::new();
        let mut observed = Vec::new();

        for v in 1..=8 {
            values.push(v);
            observed.push(values.capacity());
        }

        assert_eq!(observed, [1, 3, 3, 7, 7, 7, 7, 15]);
    }

    #[test]
    fn custom_grow_factor_changes_the_sequence() {
        let mut values = AllocVec::builder().grow_factor(3).build();
        let mut observed = Vec::new();

        for v in 1..=5 {
            values.push(v);
            observed.push(values.capacity());
        }

        // 1 + n * 3: 1, 4, 4, 4, 13.
        assert_eq!(observed, [1, 4, 4, 4, 13]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut values = AllocVec::new();
        for v in [10, 20, 30, 40, 50] {
            values.push(v);
        }

        assert_eq!(values.remove(1), 20);
        assert_eq!(values.as_slice(), &[10, 30, 40, 50]);
    }

    #[test]
    fn swap_remove_moves_last_into_hole() {
        let mut values = AllocVec::new();
        for v in [10, 20, 30, 40, 50] {
            values.push(v);
        }

        assert_eq!(values.swap_remove(1), 20);
        assert_eq!(values.as_slice(), &[10, 50, 30, 40]);
    }

    #[test]
    fn swap_remove_of_last_element_is_plain_pop() {
        let mut values = AllocVec::new();
        values.push(1);
        values.push(2);

        assert_eq!(values.swap_remove(1), 2);
        assert_eq!(values.as_slice(), &[1]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn remove_out_of_bounds_panics() {
        let mut values = AllocVec::new();
        values.push(1);
        drop(values.remove(1));
    }

    #[test]
    fn moved_from_state_is_empty_and_harmless() {
        let mut source = AllocVec::new();
        source.push(1);
        source.push(2);

        let destination = std::mem::take(&mut source);

        assert_eq!(source.len(), 0);
        assert_eq!(source.capacity(), 0);
        assert!(source.as_slice().is_empty());

        // Destroying the moved-from array must not disturb the destination.
        drop(source);
        assert_eq!(destination.as_slice(), &[1, 2]);
    }

    #[test]
    fn shrink_to_fit_preserves_elements() {
        let mut values = AllocVec::builder().capacity(64).build();
        for v in 0..5 {
            values.push(v);
        }

        values.shrink_to_fit();

        assert_eq!(values.capacity(), 5);
        assert_eq!(values.as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn shrink_to_fit_of_empty_array_releases_storage() {
        let mut values = AllocVec::<i32>::builder().capacity(16).build();

        values.shrink_to_fit();

        assert_eq!(values.capacity(), 0);
    }

    #[test]
    fn reserve_is_exact_and_monotonic() {
        let mut values = AllocVec::<u8>::new();

        values.reserve(10);
        assert_eq!(values.capacity(), 10);

        // Smaller or equal requests are no-ops.
        values.reserve(5);
        assert_eq!(values.capacity(), 10);

        values.reserve(11);
        assert_eq!(values.capacity(), 11);
    }

    #[test]
    fn resize_grows_with_clones_and_shrinks_with_drops() {
        let drops = Rc::new(Cell::new(0));
        let mut values = AllocVec::new();

        values.push(7_u32);
        values.resize(4, 9);
        assert_eq!(values.as_slice(), &[7, 9, 9, 9]);

        values.resize(1, 0);
        assert_eq!(values.as_slice(), &[7]);

        // Shrinking destroys exactly the excess tail.
        let mut tracked = AllocVec::new();
        for _ in 0..4 {
            tracked.push(DropTracker::new(&drops));
        }
        tracked.truncate(1);
        assert_eq!(drops.get(), 3);
    }

    #[test]
    fn clear_keeps_capacity_and_drops_elements() {
        let drops = Rc::new(Cell::new(0));
        let mut values = AllocVec::new();
        for _ in 0..3 {
            values.push(DropTracker::new(&drops));
        }
        let capacity = values.capacity();

        values.clear();

        assert_eq!(drops.get(), 3);
        assert!(values.is_empty());
        assert_eq!(values.capacity(), capacity);
    }

    #[test]
    fn drop_destroys_all_elements_once() {
        let drops = Rc::new(Cell::new(0));

        {
            let mut values = AllocVec::new();
            for _ in 0..5 {
                values.push(DropTracker::new(&drops));
            }
            drop(values.pop());
        }

        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let mut original = AllocVec::new();
        original.push("a".to_string());
        original.push("b".to_string());

        let mut copy = original.clone();
        copy.push("c".to_string());

        assert_eq!(original.len(), 2);
        assert_eq!(copy.len(), 3);
        assert_eq!(copy[0], "a");
    }

    #[test]
    fn push_returns_a_usable_reference_across_growth() {
        let mut values = AllocVec::new();

        // Each push may relocate the storage; the returned reference must
        // point at the element's current home every time.
        for v in 0..8_u32 {
            let pushed = values.push(v);
            *pushed += 100;
        }

        assert_eq!(
            values.as_slice(),
            &[100, 101, 102, 103, 104, 105, 106, 107]
        );
    }

    #[test]
    #[should_panic(expected = "failed to reserve")]
    fn push_panics_with_the_allocator_label_on_refusal() {
        let mut grounded = AllocVec::builder().allocator(NullAllocator::new()).build();
        grounded.push(1_u32);
    }

    #[test]
    fn null_allocator_keeps_the_array_empty() {
        let mut grounded = AllocVec::builder().allocator(NullAllocator::new()).build();

        assert_eq!(grounded.try_push(1), Err(1));
        assert!(!grounded.try_reserve(8));
        assert_eq!(grounded.len(), 0);
        assert_eq!(grounded.capacity(), 0);
    }

    #[test]
    fn failed_growth_leaves_existing_elements_intact() {
        // Arena sized for the first few growth steps only.
        let arena = Arena::<64>::new();
        let mut values = AllocVec::builder().allocator(&arena).build();

        let mut pushed = 0_u64;
        loop {
            match values.try_push(pushed) {
                Ok(_) => pushed += 1,
                Err(rejected) => {
                    assert_eq!(rejected, pushed);
                    break;
                }
            }
        }

        assert!(pushed > 0);
        assert_eq!(values.len() as u64, pushed);
        for (index, value) in values.iter().enumerate() {
            assert_eq!(*value, index as u64);
        }
    }

    #[test]
    fn arena_backed_array_works_like_any_other() {
        let arena = Arena::<4096>::new();
        let mut values = AllocVec::builder().allocator(&arena).capacity(4).build();

        for v in 0..4 {
            values.push(v);
        }

        assert_eq!(values.as_slice(), &[0, 1, 2, 3]);
        assert!(arena.allocated_bytes() >= values.capacity_in_bytes());
    }

    #[test]
    fn push_with_constructs_in_place() {
        let mut values = AllocVec::new();

        // SAFETY: The closure fully initializes the slot.
        let slot = unsafe {
            values.push_with(|uninit| {
                uninit.write([0_u8; 32]);
            })
        };
        slot[0] = 7;

        assert_eq!(values.len(), 1);
        assert_eq!(values[0][0], 7);
    }

    #[test]
    fn slice_access_via_deref() {
        let mut values = AllocVec::new();
        for v in [3, 1, 2] {
            values.push(v);
        }

        assert_eq!(values.first(), Some(&3));
        assert_eq!(values.last(), Some(&2));
        values.sort_unstable();
        assert_eq!(values.as_slice(), &[1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "zero-sized")]
    fn zero_sized_values_are_rejected() {
        drop(AllocVec::<()>::new());
    }
}
