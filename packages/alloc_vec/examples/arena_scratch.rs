//! Demonstrates pointing an `AllocVec` at a bump arena for frame-scoped
//! scratch data, including graceful handling of arena exhaustion.

use alloc_vec::AllocVec;
use bump_arena::Arena;

fn main() {
    // A small arena: room for the first few growth steps and nothing more.
    let arena = Arena::<256>::new();

    let mut scratch = AllocVec::builder().allocator(&arena).build();

    // Push until the arena runs dry. Every failed push hands the value back
    // and leaves the array fully intact.
    let mut rejected = None;
    for value in 0..100_u64 {
        if let Err(value) = scratch.try_push(value) {
            rejected = Some(value);
            break;
        }
    }

    println!(
        "pushed {} values before the arena ran out (first rejected: {:?})",
        scratch.len(),
        rejected
    );
    println!(
        "arena: {} of {} bytes used",
        arena.allocated_bytes(),
        arena.capacity()
    );

    // The array is still fully usable at its current size.
    let sum: u64 = scratch.iter().sum();
    println!("sum of scratch values: {sum}");
}
