// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use georama_graph::{
    AlignableTransform, AlignmentStore, ClearPositionAction, FullPhysVol, LogVol, Material,
    PhysVol, Positioned, Solid, Transform, Volume, trf,
};

fn log() -> Arc<LogVol> {
    LogVol::new(
        "Level",
        Solid::Tube {
            radius_min: 0.0,
            radius_max: 1.0,
            z_half: 1.0,
        },
        Material::new("Air", 0.0012),
    )
}

/// A chain of `depth` full volumes, each placed by a fixed and an alignable
/// transform. Returns the root and the deepest volume.
fn gen_chain(depth: usize) -> (Arc<PhysVol>, Arc<FullPhysVol>) {
    let root = PhysVol::new(log());
    let mut parent = FullPhysVol::new(log());
    root.add(parent.clone());
    for i in 0..depth {
        let child = FullPhysVol::new(log());
        parent.add(Transform::new(trf::translate(0.0, 0.0, 1.0)));
        parent.add(AlignableTransform::new(trf::rotate_z(0.01 * i as f64)));
        parent.add(child.clone());
        parent = child;
    }
    (root, parent)
}

fn bench_absolute(c: &mut Criterion) {
    let mut group = c.benchmark_group("absolute_transform");
    for depth in [4_usize, 16, 64] {
        let (root, leaf) = gen_chain(depth);

        group.bench_function(format!("cold_private_d{depth}"), |b| {
            b.iter(|| {
                leaf.clear_cache();
                black_box(leaf.absolute_transform(None).unwrap())
            });
        });

        let _ = leaf.absolute_transform(None).unwrap();
        group.bench_function(format!("warm_private_d{depth}"), |b| {
            b.iter(|| black_box(leaf.absolute_transform(None).unwrap()));
        });

        group.bench_function(format!("cold_store_d{depth}"), |b| {
            b.iter_batched(
                AlignmentStore::new,
                |store| black_box(leaf.absolute_transform(Some(&store)).unwrap()),
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("clear_subtree_d{depth}"), |b| {
            b.iter(|| {
                let mut clear = ClearPositionAction::new();
                root.to_link().execute(&mut clear);
                black_box(clear.cleared())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_absolute);
criterion_main!(benches);
