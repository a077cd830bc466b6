//! Minimal raw allocation capability for allocator-backed containers.
//!
//! This crate defines [`RawAllocator`], the contract every memory provider in this
//! workspace satisfies, together with two implementations and the process-wide
//! contract-check hook used by all of them:
//!
//! - [`HeapAllocator`] delegates to the process global allocator and honors any
//!   power-of-two alignment, including over-alignment beyond the platform default.
//! - [`NullAllocator`] refuses every request; it exists to disable
//!   allocation-dependent code paths in tests and stubbed-out backends.
//! - [`set_contract_failure_handler()`] installs the callback invoked when a
//!   debug-only contract check fails anywhere in the workspace.
//!
//! Containers are generic over `A: RawAllocator` and hold their allocator by value.
//! An allocator that must be shared is borrowed instead: `&A` implements
//! [`RawAllocator`] whenever `A` does, so a container can be handed `&arena` and
//! ordinary borrow rules guarantee the allocator outlives it.
//!
//! # Examples
//!
//! ```
//! use raw_alloc::{HeapAllocator, RawAllocator};
//!
//! let heap = HeapAllocator::new();
//!
//! let block = heap.allocate(64, 16).expect("the process heap is not expected to be exhausted");
//!
//! // SAFETY: The block was just allocated with this size and alignment
//! // and is released exactly once.
//! unsafe {
//!     heap.deallocate(block, 64, 16);
//! }
//! ```

mod allocator;
mod contract;
mod heap;
mod null;

pub use allocator::*;
pub use contract::*;
pub use heap::*;
pub use null::*;
