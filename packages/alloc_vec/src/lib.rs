//! A contiguous, geometrically growing array backed by any [`RawAllocator`].
//!
//! [`AllocVec`] is the workspace's replacement for `Vec` in code that must route
//! every byte through an explicit allocator: a heap allocator by default, a bump
//! arena for frame-scoped scratch data, or a null allocator to prove a code path
//! never allocates.
//!
//! # Growth policy
//!
//! When a push finds the array full, capacity grows to
//! `1 + capacity * grow_factor` (factor 2 unless configured otherwise). Starting
//! from an empty array this yields the capacity sequence `1, 3, 7, 15, …`.
//! Growth failure is fail-safe: [`try_push()`](AllocVec::try_push) hands the
//! value back and the array is left exactly as it was.
//!
//! # Removal flavors
//!
//! [`remove()`](AllocVec::remove) preserves the relative order of the remaining
//! elements at O(n) cost; [`swap_remove()`](AllocVec::swap_remove) is O(1) but
//! moves the former last element into the vacated position.
//!
//! # Examples
//!
//! ```
//! use alloc_vec::AllocVec;
//!
//! let mut values = AllocVec::new();
//!
//! values.push(10);
//! values.push(20);
//! values.push(30);
//!
//! assert_eq!(values.as_slice(), &[10, 20, 30]);
//! assert_eq!(values.remove(0), 10);
//! assert_eq!(values.as_slice(), &[20, 30]);
//! ```
//!
//! Backed by a bump arena:
//!
//! ```
//! use alloc_vec::AllocVec;
//! use bump_arena::Arena;
//!
//! let arena = Arena::<1024>::new();
//! let mut scratch = AllocVec::builder().allocator(&arena).capacity(8).build();
//!
//! scratch.push(1_u32);
//! scratch.push(2_u32);
//! assert_eq!(scratch.as_slice(), &[1, 2]);
//! ```
//!
//! [`RawAllocator`]: raw_alloc::RawAllocator

mod builder;
mod vec;

pub use builder::*;
pub use vec::*;
