use std::ptr::NonNull;

use crate::RawAllocator;

/// An allocator that refuses every request.
///
/// Useful for disabling allocation-dependent code paths in tests and for backends
/// that are compiled in but not enabled: any container handed a `NullAllocator`
/// stays permanently empty while remaining fully valid to use.
///
/// # Examples
///
/// ```
/// use raw_alloc::{NullAllocator, RawAllocator};
///
/// let null = NullAllocator::new();
/// assert!(null.allocate(64, 8).is_none());
/// assert!(null.allocate_with_offset(64, 8, 16, 0).is_none());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAllocator;

impl NullAllocator {
    /// Creates a null allocator.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

// SAFETY: No pointer is ever returned, so there is nothing to uphold.
unsafe impl RawAllocator for NullAllocator {
    fn allocate(&self, _size: usize, _align: usize) -> Option<NonNull<u8>> {
        None
    }

    fn allocate_with_offset(
        &self,
        _size: usize,
        _align: usize,
        _offset: usize,
        _flags: u32,
    ) -> Option<NonNull<u8>> {
        None
    }

    unsafe fn deallocate(&self, _ptr: NonNull<u8>, _size: usize, _align: usize) {
        crate::contract_violation!("deallocate on a null allocator that never allocated");
    }

    fn label(&self) -> &str {
        "null"
    }
}
