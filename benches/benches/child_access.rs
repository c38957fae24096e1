// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use georama_graph::{
    FullPhysVol, LogVol, Material, NameTag, PhysVol, SerialDenominator, SerialTransformer, Solid,
    Transform, Volume, VolumeCursor, trf,
};

fn log(name: &str) -> Arc<LogVol> {
    LogVol::new(
        name,
        Solid::Box {
            x_half: 1.0,
            y_half: 1.0,
            z_half: 1.0,
        },
        Material::new("Air", 0.0012),
    )
}

/// A parent with `plain` explicitly placed children followed by a serial
/// transformer of `copies` copies.
fn gen_parent(plain: usize, copies: usize) -> Arc<PhysVol> {
    let parent = PhysVol::new(log("Parent"));
    for i in 0..plain {
        parent.add(NameTag::new(format!("Plain{i}")));
        parent.add(Transform::new(trf::translate(i as f64, 0.0, 0.0)));
        parent.add(FullPhysVol::new(log("Plain")));
    }
    parent.add(SerialDenominator::new("Copy"));
    parent.add(SerialTransformer::new(
        FullPhysVol::new(log("Copy")),
        |i: usize| trf::translate(0.0, i as f64, 0.0) * trf::rotate_z(0.001 * i as f64),
        copies,
    ));
    parent
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate_children");
    for &(plain, copies) in &[(16_usize, 16_usize), (64, 1024), (256, 16384)] {
        let parent = gen_parent(plain, copies);
        let n = parent.child_count();
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("cursor_p{plain}_s{copies}"), |b| {
            b.iter(|| {
                let mut cursor = VolumeCursor::new(&parent.to_link(), None);
                let mut acc = 0.0;
                while !cursor.at_end() {
                    acc += trf::translation_of(&cursor.transform()).y;
                    black_box(cursor.name());
                    cursor.advance();
                }
                black_box(acc)
            });
        });

        // Random access per index replays the sequence every time; keep the
        // largest case out to bound the run time.
        if n <= 2048 {
            group.bench_function(format!("access_p{plain}_s{copies}"), |b| {
                b.iter(|| {
                    let mut acc = 0.0;
                    for i in 0..n {
                        let child = parent.child_at(i, None).unwrap();
                        acc += trf::translation_of(&child.transform).y;
                        black_box(child.name);
                    }
                    black_box(acc)
                });
            });
        }
    }
    group.finish();
}

fn bench_single_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_child");
    let parent = gen_parent(256, 16384);
    let last = parent.child_count() - 1;

    group.bench_function("access_last", |b| {
        b.iter(|| black_box(parent.child_at(black_box(last), None).unwrap()));
    });
    group.bench_function("cursor_to_last", |b| {
        b.iter(|| {
            let mut cursor = VolumeCursor::new(&parent.to_link(), None);
            while cursor.index() < last && !cursor.at_end() {
                cursor.advance();
            }
            black_box(cursor.transform())
        });
    });
    group.bench_function("count", |b| {
        b.iter(|| black_box(parent.child_count()));
    });
    group.finish();
}

criterion_group!(benches, bench_iterate, bench_single_lookup);
criterion_main!(benches);
