//! Benchmarks for collision resolution, reflow preview, and a full drag.
//!
//! Run with: cargo bench -p dndsort-sortable

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use dndsort_core::{InputEvent, Orientation, Point, PointerDevice, Rect};
use dndsort_sortable::bounds::{stacked, tiled};
use dndsort_sortable::strategy::shifts;
use dndsort_sortable::{CollisionMetric, CollisionResolver, SortableConfig, SortableList};
use std::hint::black_box;
use web_time::Instant;

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision/resolve");

    for n in [10u32, 100, 1_000] {
        let ids: Vec<u32> = (0..n).collect();
        let rows = stacked(&ids, 200.0, 24.0, 4.0);
        let projected = Rect::new(0.0, (n / 2) as f32 * 28.0 + 7.0, 200.0, 24.0);
        let on_axis = CollisionResolver::new(CollisionMetric::ClosestCenterOnAxis(
            Orientation::Vertical,
        ));
        group.bench_with_input(BenchmarkId::new("list", n), &ids, |b, ids| {
            b.iter(|| black_box(on_axis.resolve(&0, projected, ids, &rows)))
        });

        let cells = tiled(&ids, 8, 32.0, 4.0);
        let center = CollisionResolver::new(CollisionMetric::ClosestCenter);
        group.bench_with_input(BenchmarkId::new("grid", n), &ids, |b, ids| {
            b.iter(|| black_box(center.resolve(&0, projected, ids, &cells)))
        });
    }

    group.finish();
}

fn bench_shifts(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy/shifts");

    for n in [10u32, 100, 1_000] {
        let ids: Vec<u32> = (0..n).collect();
        let rows = stacked(&ids, 200.0, 24.0, 4.0);
        let over = (n as usize) - 1;
        group.bench_with_input(BenchmarkId::new("first_to_last", n), &ids, |b, ids| {
            b.iter(|| black_box(shifts(ids, &rows, 0, Some(over))))
        });
    }

    group.finish();
}

fn bench_pointer_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("sortable/pointer_drag");

    for n in [10u32, 100] {
        let ids: Vec<u32> = (0..n).collect();
        let rows = stacked(&ids, 200.0, 24.0, 4.0);
        let bottom = n as f32 * 28.0;
        group.bench_with_input(BenchmarkId::new("top_to_bottom", n), &ids, |b, ids| {
            b.iter_batched(
                || SortableList::new(ids.clone(), |n| *n, SortableConfig::list()).expect("list"),
                |mut list| {
                    let now = Instant::now();
                    let device = PointerDevice::Mouse;
                    list.dispatch(
                        &InputEvent::pointer_down(1, device, Some(0), Point::new(10.0, 10.0)),
                        &rows,
                        now,
                    );
                    let mut y = 10.0;
                    while y < bottom {
                        list.dispatch(&InputEvent::pointer_move(1, device, Point::new(10.0, y)), &rows, now);
                        y += 7.0;
                    }
                    list.dispatch(&InputEvent::pointer_up(1, device, Point::new(10.0, y)), &rows, now);
                    black_box(list)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_shifts, bench_pointer_drag);

criterion_main!(benches);
