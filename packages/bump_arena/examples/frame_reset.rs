//! Demonstrates the per-frame usage pattern: allocate freely during a frame,
//! then reset the arena and reuse the same bytes for the next frame.

use bump_arena::Arena;
use raw_alloc::RawAllocator;

fn main() {
    let mut arena = Arena::<4096>::new();

    for frame in 0..3 {
        // Simulated per-frame workload with mixed sizes and alignments.
        let header = arena.allocate(24, 8).expect("fresh frame has room");
        let payload = arena.allocate(1000, 16).expect("fresh frame has room");
        let tail = arena.allocate(3, 1).expect("fresh frame has room");

        println!(
            "frame {frame}: header {:p}, payload {:p}, tail {:p}",
            header, payload, tail
        );
        println!(
            "frame {frame}: {} of {} bytes used",
            arena.allocated_bytes(),
            arena.capacity()
        );

        // End of frame: one cursor rewind reclaims everything at once.
        arena.reset();
    }

    println!("after final reset: {} bytes used", arena.allocated_bytes());
}
