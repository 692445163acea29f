use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use mesh_gradient::{AnimatorConfig, Grid, HermiteTessellator, MeshAnimator, MeshGenerator, MeshRandomizer};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_tessellate(c: &mut Criterion) {
    let mut group = c.benchmark_group("HermiteTessellator::tessellate");

    let colors = Grid::from_fn(6, 6, |x, y| Vec3::new(x as f32 / 5.0, y as f32 / 5.0, 0.5));
    let grid = MeshGenerator::generate(&colors);

    for &subdivisions in &[4u32, 18, 48] {
        let tessellator = HermiteTessellator::new(subdivisions);
        group.bench_with_input(
            BenchmarkId::new("subdivisions", subdivisions),
            &subdivisions,
            |b, _| b.iter(|| tessellator.tessellate(&grid)),
        );
    }

    group.finish();
}

fn bench_advance_frame(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let grid = MeshGenerator::uniform(8, 8, Vec3::ONE);
    let config = AnimatorConfig::new(MeshRandomizer::with_rng(&mut rng)).with_seed(1);
    let mut animator = MeshAnimator::new(grid, config);

    c.bench_function("MeshAnimator::advance_frame", |b| {
        b.iter(|| animator.advance_frame())
    });
}

criterion_group!(benches, bench_tessellate, bench_advance_frame);
criterion_main!(benches);
