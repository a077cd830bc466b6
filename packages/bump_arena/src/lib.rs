//! A monotonic bump allocator over a fixed, inline buffer.
//!
//! [`Arena`] owns its storage outright as an inline byte array and serves
//! allocations by advancing a cursor. It never grows and never falls back to the
//! heap: once the buffer is exhausted, every further request fails until
//! [`reset()`](Arena::reset) rewinds the cursor or the arena is dropped.
//! Individual deallocation is a no-op.
//!
//! The buffer is [`MAX_ALIGN`]-aligned and the cursor is aligned per request,
//! so any alignment up to [`MAX_ALIGN`] is honored; larger alignments are
//! refused.
//!
//! The arena implements [`RawAllocator`], so allocator-backed containers can be
//! pointed at it by reference:
//!
//! ```
//! use bump_arena::Arena;
//! use raw_alloc::RawAllocator;
//!
//! let arena = Arena::<1024>::new();
//!
//! let first = arena.allocate(100, 8).expect("fresh arena has room for 100 bytes");
//! let second = arena.allocate(100, 8).expect("arena has room for another 100 bytes");
//!
//! // Bump allocation is contiguous: the second block starts where the
//! // first one (rounded up to its alignment) ended.
//! assert_eq!(second.as_ptr() as usize, first.as_ptr() as usize + 104);
//! assert_eq!(arena.allocated_bytes(), 208);
//!
//! // An oversized request fails without disturbing the cursor.
//! assert!(arena.allocate(10_000, 8).is_none());
//! assert_eq!(arena.allocated_bytes(), 208);
//! ```
//!
//! # Pointer validity
//!
//! Pointers handed out by the arena point into its inline buffer. They remain
//! valid until the arena is moved, reset, or dropped; all three require ending
//! any outstanding borrow of the arena first, so safe callers that hold the
//! arena by reference cannot observe a dangling pointer.
//!
//! # Thread safety
//!
//! The cursor lives in a [`Cell`], so the arena is `Send` but not `Sync`;
//! sharing one arena across threads requires external synchronization by design.

use std::cell::{Cell, UnsafeCell};
use std::fmt;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

use raw_alloc::{RawAllocator, align_up};

/// The alignment of the arena's inline buffer, and the largest alignment an
/// allocation request may ask for.
///
/// Requests with a larger alignment are contract violations: reported through
/// the contract hook in debug builds and refused in all builds.
pub const MAX_ALIGN: usize = 16;

#[repr(align(16))]
struct Storage<const CAP: usize>([MaybeUninit<u8>; CAP]);

/// A fixed-capacity monotonic (bump) allocator.
///
/// `CAP` is the byte capacity of the inline buffer. The invariant
/// `0 <= top <= CAP` holds at all times: an allocation that would break it
/// fails, returns [`None`], and leaves the cursor unchanged.
pub struct Arena<const CAP: usize> {
    storage: UnsafeCell<Storage<CAP>>,
    top: Cell<usize>,
    label: &'static str,
}

impl<const CAP: usize> Arena<CAP> {
    /// Creates an empty arena with the default diagnostic label.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_label("bump_arena")
    }

    /// Creates an empty arena carrying a custom diagnostic label.
    #[inline]
    #[must_use]
    pub const fn with_label(label: &'static str) -> Self {
        Self {
            storage: UnsafeCell::new(Storage([MaybeUninit::uninit(); CAP])),
            top: Cell::new(0),
            label,
        }
    }

    /// Total byte capacity of the arena.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        CAP
    }

    /// Bytes still available for allocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use bump_arena::Arena;
    /// use raw_alloc::RawAllocator;
    ///
    /// let arena = Arena::<256>::new();
    /// assert_eq!(arena.available_bytes(), 256);
    ///
    /// arena.allocate(64, 1).expect("fresh arena has room for 64 bytes");
    /// assert_eq!(arena.available_bytes(), 192);
    /// ```
    #[inline]
    #[must_use]
    pub fn available_bytes(&self) -> usize {
        // The cursor invariant guarantees this cannot underflow.
        CAP - self.top.get()
    }

    /// Bytes consumed so far, including alignment padding and offsets.
    #[inline]
    #[must_use]
    pub fn allocated_bytes(&self) -> usize {
        self.top.get()
    }

    /// Rewinds the cursor to zero, making the full capacity reusable.
    ///
    /// The buffer itself is not released or wiped. Taking `&mut self` ends every
    /// outstanding borrow of the arena, so no safe caller can still hold a block
    /// handed out before the reset.
    ///
    /// # Examples
    ///
    /// ```
    /// use bump_arena::Arena;
    /// use raw_alloc::RawAllocator;
    ///
    /// let mut arena = Arena::<128>::new();
    /// arena.allocate(128, 1).expect("exact fill must succeed");
    /// assert_eq!(arena.available_bytes(), 0);
    ///
    /// arena.reset();
    /// assert_eq!(arena.available_bytes(), 128);
    /// ```
    #[inline]
    pub fn reset(&mut self) {
        *self.top.get_mut() = 0;
    }

    fn bump(&self, size: usize, align: usize, offset: usize) -> Option<NonNull<u8>> {
        if size == 0 {
            raw_alloc::contract_violation!("meaningless zero-size allocation");
            return None;
        }
        if align > MAX_ALIGN {
            raw_alloc::contract_violation!("arena storage cannot honor this alignment");
            return None;
        }

        let top = self.top.get();

        // The buffer base is MAX_ALIGN-aligned, so aligning the cursor is
        // enough to keep the returned pointer aligned (while `offset` is a
        // multiple of `align`, as the trait requires).
        let start = align_up(top, align);

        // Checked all the way: a near-usize::MAX size must fail here, not wrap
        // to a tiny aligned size and "succeed" with zero reserved bytes.
        let mask = align - 1;
        let aligned_size = size.checked_add(mask)? & !mask;
        let required = (start - top)
            .checked_add(offset)?
            .checked_add(aligned_size)?;

        if required > CAP - top {
            raw_alloc::contract_violation!("not enough arena storage for this allocation");
            return None;
        }

        self.top.set(top + required);

        let base = self.storage.get().cast::<u8>();

        // SAFETY: `start + offset < top + required <= CAP`, so the pointer stays
        // inside the inline buffer; a pointer into a live buffer is never null.
        Some(unsafe { NonNull::new_unchecked(base.add(start + offset)) })
    }
}

impl<const CAP: usize> Default for Arena<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> fmt::Debug for Arena<CAP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("label", &self.label)
            .field("capacity", &CAP)
            .field("allocated_bytes", &self.top.get())
            .finish_non_exhaustive()
    }
}

// SAFETY: Blocks are disjoint sub-ranges of the inline buffer, sized and placed
// by `bump()`, and stay valid until the arena is moved, reset, or dropped, which
// all require the borrow handed to containers to have ended.
unsafe impl<const CAP: usize> RawAllocator for Arena<CAP> {
    fn allocate(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        self.bump(size, align, 0)
    }

    fn allocate_with_offset(
        &self,
        size: usize,
        align: usize,
        offset: usize,
        _flags: u32,
    ) -> Option<NonNull<u8>> {
        self.bump(size, align, offset)
    }

    unsafe fn deallocate(&self, _ptr: NonNull<u8>, _size: usize, _align: usize) {
        // Arena memory is reclaimed only by reset() or by dropping the arena.
    }

    fn label(&self) -> &str {
        self.label
    }
}
