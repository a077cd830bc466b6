//! A fixed-capacity slot pool with generation counters and weak, checkable handles.
//!
//! Every slot in a [`GenPool`] carries a one-byte [`Generation`] whose low bit
//! records whether the slot currently holds a constructed value. Removing a value
//! advances the slot's generation, so a [`Handle`] captured earlier can always be
//! detected as stale: use-after-free turns into a recoverable [`None`] instead of
//! silently reading recycled data.
//!
//! Two configurations share the same algorithm:
//!
//! - [`GenPool`] allocates and owns its backing storage through any
//!   [`RawAllocator`](raw_alloc::RawAllocator), releasing it exactly once on drop.
//! - [`GenSlots`] operates over a caller-supplied byte buffer it never frees,
//!   for storage that lives in an arena or on the stack.
//!
//! # Handles
//!
//! A [`Handle`] is a capability to *attempt* access, never an owner: it stores
//! only a slot index and the generation captured when it was created. Resolution
//! happens through the pool ([`get()`](GenPool::get),
//! [`is_current()`](GenPool::is_current)); the generation comparison is the
//! entire check, no pointers are involved.
//!
//! # Slot reuse
//!
//! [`try_append()`](GenPool::try_append) hands out slots in index order using an
//! internal cursor and never revisits freed slots; reusing a freed slot is an
//! explicit act via [`try_insert_at()`](GenPool::try_insert_at). This keeps the
//! pool free of free-list bookkeeping by design.
//!
//! # Examples
//!
//! ```
//! use gen_pool::GenPool;
//! use new_zealand::nz;
//!
//! let mut pool = GenPool::builder().capacity(nz!(8)).build();
//!
//! let handle = pool.try_append("payload").expect("fresh pool has free slots");
//! assert_eq!(pool.get(handle), Some(&"payload"));
//!
//! pool.remove_at(handle.index());
//! assert_eq!(pool.get(handle), None);
//!
//! // The slot can be reused explicitly; the old handle stays stale.
//! pool.try_insert_at(handle.index(), "recycled").expect("slot was freed");
//! assert_eq!(pool.get(handle), None);
//! ```

mod builder;
mod generation;
mod handle;
mod pool;
mod raw;
mod slots;

pub use builder::*;
pub use generation::*;
pub use handle::*;
pub use pool::*;
pub(crate) use raw::*;
pub use slots::*;
