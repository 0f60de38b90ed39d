//! Projection and full-session benchmarks at Z=14.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stvoxel::{project_all, RenderSession, Rgba, Tile, Viewport, VoxelDefinition, VoxelItem};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn tiles(count: usize) -> Vec<Tile> {
  (0..count as i64)
    .map(|i| Tile::unit(14, i % 4, (i * 7919) % 16_384, (i * 104_729) % 16_384))
    .collect()
}

fn bench_project(c: &mut Criterion) {
  let mut group = c.benchmark_group("projector/project_all");
  for &size in &SIZES {
    let batch = tiles(size);
    group.bench_with_input(BenchmarkId::from_parameter(size), &batch, |b, batch| {
      b.iter(|| black_box(project_all(black_box(batch), Rgba::WHITE)))
    });

    #[cfg(feature = "parallel")]
    group.bench_with_input(BenchmarkId::new("par", size), &batch, |b, batch| {
      b.iter(|| black_box(stvoxel::projector::project_all_par(black_box(batch), Rgba::WHITE)))
    });
  }
  group.finish();
}

fn bench_session(c: &mut Criterion) {
  let mut group = c.benchmark_group("projector/session");
  // Around Tokyo, map zoom high enough to keep Z=14
  let view = Viewport::new(16.0, 139.7, 35.6);

  for &size in &SIZES {
    let definitions: Vec<VoxelDefinition> = (0..size as i64)
      .map(|i| VoxelDefinition::unit(14, 0, 14_550 + i % 64, 6_450 + (i / 64) % 64))
      .collect();
    let item = VoxelItem::new(definitions, Rgba::WHITE);

    group.bench_with_input(BenchmarkId::new("miss", size), &item, |b, item| {
      b.iter(|| {
        let mut session = RenderSession::default();
        black_box(session.render_item(item, Some(&view), 0.0))
      })
    });

    let mut session = RenderSession::default();
    group.bench_with_input(BenchmarkId::new("hit", size), &item, |b, item| {
      b.iter(|| black_box(session.render_item(item, Some(&view), 0.0)))
    });
  }
  group.finish();
}

criterion_group!(projector, bench_project, bench_session);
criterion_main!(projector);
