use std::ptr::NonNull;

/// The capability every memory provider must expose to back a container.
///
/// Allocation failure is communicated by returning [`None`]; no method panics on
/// exhaustion. A request for zero bytes is a contract violation: it is reported
/// through the contract hook in debug builds and returns [`None`] in all builds.
///
/// All methods take `&self` so that stateful implementations (such as a bump
/// arena) can serve allocations through interior mutability while being shared
/// with several containers at once.
///
/// # Offset allocations
///
/// [`allocate_with_offset()`](Self::allocate_with_offset) reserves `offset` extra
/// bytes *ahead of* the returned pointer, so a header and payload can share one
/// underlying block. Such a block is released by handing
/// [`deallocate()`](Self::deallocate) the start of the whole block
/// (`ptr - offset`) and its full size (`offset + size`).
///
/// # Safety
///
/// Implementations must guarantee that a returned pointer:
///
/// 1. Refers to a block of at least `size` bytes, valid for reads and writes.
/// 2. Is aligned to `align` (offset allocations: whenever `offset` is a multiple
///    of `align`).
/// 3. Does not overlap any other live block handed out by the same allocator.
/// 4. Remains valid until passed to [`deallocate()`](Self::deallocate) or the
///    allocator itself is destroyed or reset, whichever comes first.
pub unsafe trait RawAllocator {
    /// Allocates `size` bytes aligned to `align`.
    ///
    /// `align` must be a power of two; this precondition is checked in debug
    /// builds only. Returns [`None`] when the request cannot be satisfied.
    fn allocate(&self, size: usize, align: usize) -> Option<NonNull<u8>>;

    /// Allocates `size` bytes aligned to `align`, with `offset` extra bytes
    /// reserved ahead of the returned pointer.
    ///
    /// `flags` is reserved for implementation-specific request attributes and may
    /// be ignored. Returns [`None`] when the request cannot be satisfied.
    fn allocate_with_offset(
        &self,
        size: usize,
        align: usize,
        offset: usize,
        flags: u32,
    ) -> Option<NonNull<u8>>;

    /// Releases a previously allocated block.
    ///
    /// # Safety
    ///
    /// The caller must ensure that:
    ///
    /// 1. `ptr` was returned by this allocator (for offset allocations, adjusted
    ///    back to the block start as described on the trait).
    /// 2. `size` and `align` are the values the block was requested with (for
    ///    offset allocations, `size` is the full `offset + size`).
    /// 3. The block is released exactly once.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, size: usize, align: usize);

    /// The diagnostic name of this allocator.
    fn label(&self) -> &str;
}

// SAFETY: Pure forwarding; the referenced allocator upholds the contract and the
// borrow guarantees it outlives the reference.
unsafe impl<A: RawAllocator + ?Sized> RawAllocator for &A {
    #[inline]
    fn allocate(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        (**self).allocate(size, align)
    }

    #[inline]
    fn allocate_with_offset(
        &self,
        size: usize,
        align: usize,
        offset: usize,
        flags: u32,
    ) -> Option<NonNull<u8>> {
        (**self).allocate_with_offset(size, align, offset, flags)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, size: usize, align: usize) {
        // SAFETY: Forwarding the caller's guarantees unchanged.
        unsafe { (**self).deallocate(ptr, size, align) }
    }

    #[inline]
    fn label(&self) -> &str {
        (**self).label()
    }
}

/// Rounds `size` up to the next multiple of `align`.
///
/// `align` must be a power of two. The precondition is checked in debug builds
/// only; in release builds a non-power-of-two alignment produces an unspecified
/// result.
///
/// # Examples
///
/// ```
/// use raw_alloc::align_up;
///
/// assert_eq!(align_up(13, 8), 16);
/// assert_eq!(align_up(16, 8), 16);
/// assert_eq!(align_up(0, 8), 0);
/// ```
#[inline]
#[must_use]
pub fn align_up(size: usize, align: usize) -> usize {
    crate::debug_contract!(align.is_power_of_two(), "alignment must be a power of two");

    let mask = align.wrapping_sub(1);
    size.wrapping_add(mask) & !mask
}
