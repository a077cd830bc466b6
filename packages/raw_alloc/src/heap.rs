use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::RawAllocator;

/// General-purpose allocator delegating to the process global allocator.
///
/// Every request is served with an exact [`Layout`], so arbitrary power-of-two
/// alignment is honored, including over-alignment beyond what the platform
/// allocator would hand out by default.
///
/// The type is a stateless, copyable token; any copy can release blocks allocated
/// through any other copy.
///
/// # Examples
///
/// ```
/// use raw_alloc::{HeapAllocator, RawAllocator};
///
/// let heap = HeapAllocator::new();
/// assert_eq!(heap.label(), "heap");
///
/// // Over-aligned allocation: 256-byte alignment for a 16-byte block.
/// let block = heap.allocate(16, 256).expect("the process heap is not expected to be exhausted");
/// assert_eq!(block.as_ptr() as usize % 256, 0);
///
/// // SAFETY: Allocated just above with this exact size and alignment.
/// unsafe {
///     heap.deallocate(block, 16, 256);
/// }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct HeapAllocator {
    label: &'static str,
}

impl HeapAllocator {
    /// Creates a heap allocator with the default diagnostic label.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_label("heap")
    }

    /// Creates a heap allocator carrying a custom diagnostic label.
    ///
    /// The label only affects diagnostics; all instances share the same
    /// underlying process heap.
    #[inline]
    #[must_use]
    pub const fn with_label(label: &'static str) -> Self {
        Self { label }
    }
}

impl Default for HeapAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: Blocks come from the process global allocator with exact layouts, so
// they are valid, aligned, disjoint, and live until deallocated with the same
// layout.
unsafe impl RawAllocator for HeapAllocator {
    fn allocate(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        if size == 0 {
            crate::contract_violation!("meaningless zero-size allocation");
            return None;
        }

        let layout = Layout::from_size_align(size, align).ok()?;

        // SAFETY: The layout has non-zero size, checked above.
        let ptr = unsafe { alloc::alloc(layout) };

        NonNull::new(ptr)
    }

    fn allocate_with_offset(
        &self,
        size: usize,
        align: usize,
        offset: usize,
        _flags: u32,
    ) -> Option<NonNull<u8>> {
        if size == 0 {
            crate::contract_violation!("meaningless zero-size allocation");
            return None;
        }

        let total = offset.checked_add(size)?;
        let layout = Layout::from_size_align(total, align).ok()?;

        // SAFETY: The layout has non-zero size because `size` is non-zero.
        let base = NonNull::new(unsafe { alloc::alloc(layout) })?;

        // SAFETY: `offset < total`, so the result stays inside the block.
        Some(unsafe { base.add(offset) })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, size: usize, align: usize) {
        crate::debug_contract!(size != 0, "attempt to deallocate a zero-size block");

        let layout = Layout::from_size_align(size, align)
            .expect("deallocate received a size/align pair that cannot form a layout, so it cannot match any allocation");

        // SAFETY: The caller guarantees the block came from this allocator with
        // this exact layout and is released exactly once.
        unsafe {
            alloc::dealloc(ptr.as_ptr(), layout);
        }
    }

    fn label(&self) -> &str {
        self.label
    }
}
