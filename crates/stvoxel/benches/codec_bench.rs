//! Identifier codec benchmarks.
//!
//! - **parse**: comma-separated identifier batches
//! - **compile**: compact vs exhaustive, cold vs warm range memo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stvoxel::compile::cell_count;
use stvoxel::{parse_identifiers, CompileMode, Compiler, ExpandBudget, VoxelDefinition};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

/// Deterministic batch of Z=14 identifiers mixing scalars, ranges and
/// antimeridian wraps.
fn identifier_text(count: usize) -> String {
  (0..count)
    .map(|i| {
      let x = (i * 7919) % 16_384;
      let y = (i * 104_729) % 16_384;
      match i % 4 {
        0 => format!("14/0/{}/{}", x, y),
        1 => format!("14/0:3/{}:{}/{}", x, (x + 2) % 16_384, y),
        2 => format!("14/-/{}/{}:{}_60/{}", x, y, (y + 1).min(16_383), i % 100),
        _ => format!("14/1/16383:1/{}", y),
      }
    })
    .collect::<Vec<_>>()
    .join(", ")
}

fn definitions(count: usize) -> Vec<VoxelDefinition> {
  parse_identifiers(&identifier_text(count)).definitions
}

fn bench_parse(c: &mut Criterion) {
  let mut group = c.benchmark_group("codec/parse");
  for &size in &SIZES {
    let text = identifier_text(size);
    group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
      b.iter(|| black_box(parse_identifiers(black_box(text))))
    });
  }
  group.finish();
}

fn bench_compile(c: &mut Criterion) {
  let mut group = c.benchmark_group("codec/compile");
  for &size in &SIZES {
    let defs = definitions(size);

    group.bench_with_input(BenchmarkId::new("compact/cold", size), &defs, |b, defs| {
      b.iter(|| {
        let mut compiler = Compiler::default();
        black_box(compiler.compile(defs, CompileMode::Compact))
      })
    });

    let mut warm = Compiler::default();
    group.bench_with_input(BenchmarkId::new("compact/warm", size), &defs, |b, defs| {
      b.iter(|| black_box(warm.compile(defs, CompileMode::Compact)))
    });

    // Unbounded floors expand to 2^15 bands each; keep the small ones
    let mut compiler = Compiler::new(1024, ExpandBudget::UNLIMITED);
    let small: Vec<_> = defs
      .iter()
      .filter(|d| cell_count(d).map_or(false, |cells| cells <= 64))
      .copied()
      .collect();
    group.bench_with_input(BenchmarkId::new("exhaustive", size), &small, |b, defs| {
      b.iter(|| black_box(compiler.compile(defs, CompileMode::Exhaustive)))
    });
  }
  group.finish();
}

criterion_group!(codec, bench_parse, bench_compile);
criterion_main!(codec);
