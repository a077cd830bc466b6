//! Demonstrates the lifecycle of pool handles: capture, resolution, staleness
//! after removal, and explicit slot reuse.

use gen_pool::GenPool;
use new_zealand::nz;

fn main() {
    let mut pool = GenPool::builder().capacity(nz!(8)).build();

    // Append a few values; handles come back in slot order.
    let first = pool.try_append("alpha").expect("fresh pool has free slots");
    let second = pool.try_append("beta").expect("fresh pool has free slots");

    println!("first:  index {}, value {:?}", first.index(), pool.get(first));
    println!("second: index {}, value {:?}", second.index(), pool.get(second));

    // Handles are plain data; copies resolve like the original.
    let copy_of_first = first;
    println!("copy:   value {:?}", pool.get(copy_of_first));

    // Removing the value advances the slot's generation.
    pool.remove_at(first.index());
    println!(
        "after remove: is_current = {}, value = {:?}",
        pool.is_current(first),
        pool.get(first)
    );

    // Reusing the slot is explicit. The new handle works, every old one stays
    // stale forever even though the indices are equal.
    let recycled = pool
        .try_insert_at(first.index(), "gamma")
        .expect("the slot was freed above");

    println!(
        "after reuse: old handle resolves to {:?}, new handle to {:?}",
        pool.get(first),
        pool.get(recycled)
    );

    println!("live values: {} of {}", pool.len(), pool.capacity());
}
