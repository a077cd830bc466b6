//! Basic benchmarks for the `alloc_vec` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::iter;
use std::time::Instant;

use alloc_tracker::Allocator;
use alloc_vec::AllocVec;
use criterion::{Criterion, criterion_group, criterion_main};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

type TestItem = usize;
const TEST_VALUE: TestItem = 1024;

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("vec_basic");

    let allocs_op = allocs.operation("build_empty");
    group.bench_function("build_empty", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(AllocVec::<TestItem>::new()));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("push_one_preallocated");
    group.bench_function("push_one_preallocated", |b| {
        b.iter_custom(|iters| {
            let mut vecs =
                iter::repeat_with(|| AllocVec::<TestItem>::builder().capacity(1).build())
                    .take(usize::try_from(iters).unwrap())
                    .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for vec in &mut vecs {
                _ = black_box(vec.push(black_box(TEST_VALUE)));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("read_one");
    group.bench_function("read_one", |b| {
        b.iter_custom(|iters| {
            let mut vec = AllocVec::<TestItem>::new();
            vec.push(TEST_VALUE);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                _ = black_box(vec[black_box(0)]);
            }

            start.elapsed()
        });
    });

    group.finish();

    let mut group = c.benchmark_group("vec_slow");

    let allocs_op = allocs.operation("push_10k_growing");
    group.bench_function("push_10k_growing", |b| {
        b.iter_custom(|iters| {
            let mut vecs = iter::repeat_with(AllocVec::<TestItem>::new)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for vec in &mut vecs {
                for _ in 0..10_000 {
                    _ = black_box(vec.push(black_box(TEST_VALUE)));
                }
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("push_10k_reserved");
    group.bench_function("push_10k_reserved", |b| {
        b.iter_custom(|iters| {
            let mut vecs = iter::repeat_with(|| {
                AllocVec::<TestItem>::builder().capacity(10_000).build()
            })
            .take(usize::try_from(iters).unwrap())
            .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for vec in &mut vecs {
                for _ in 0..10_000 {
                    _ = black_box(vec.push(black_box(TEST_VALUE)));
                }
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}
