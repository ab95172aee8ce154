use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use somaseg_imgproc::morphology::MorphContext;
use somaseg_volume::LevelSet;

fn ball(size: usize) -> LevelSet<3> {
    let c = size as f32 / 2.0;
    let r = size as f32 / 4.0;
    LevelSet::from_shape_fn([size, size, size], |[z, y, x]| {
        let d = ((z as f32 - c).powi(2) + (y as f32 - c).powi(2) + (x as f32 - c).powi(2)).sqrt();
        u8::from(d < r)
    })
}

fn bench_morphology(c: &mut Criterion) {
    let mut group = c.benchmark_group("Morphology");

    for size in [16, 32, 64].iter() {
        group.throughput(criterion::Throughput::Elements((size * size * size) as u64));

        let u = ball(*size);
        let mut ctx = MorphContext::<3>::new().unwrap();

        group.bench_with_input(BenchmarkId::new("si", size), &u, |b, u| {
            b.iter(|| black_box(ctx.si(u)))
        });

        group.bench_with_input(BenchmarkId::new("is", size), &u, |b, u| {
            b.iter(|| black_box(ctx.is(u)))
        });

        group.bench_with_input(BenchmarkId::new("curvature", size), &u, |b, u| {
            b.iter(|| black_box(ctx.curvature(u)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_morphology);
criterion_main!(benches);
