use chromaseg::{Kmeans, MeanShift, PixelBuffer, Segmenter, StopRule};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

fn synthetic_image(width: u32, height: u32, seed: u64) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = width as usize * height as usize;
    let mut data = Vec::with_capacity(n * 4);
    for _ in 0..n {
        data.extend_from_slice(&[rng.random::<u8>(), rng.random::<u8>(), rng.random::<u8>(), 255]);
    }
    PixelBuffer::new(width, height, data).unwrap()
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");
    let image = synthetic_image(64, 64, 42);

    group.bench_function("segment_64x64_k8", |b| {
        b.iter(|| {
            let model = Kmeans::new(8)
                .with_stop_rule(StopRule::Fixed { iters: 10 })
                .with_seed(42);
            model.segment(black_box(&image)).unwrap();
        })
    });

    group.finish();
}

fn bench_mean_shift(c: &mut Criterion) {
    let mut group = c.benchmark_group("mean_shift");
    let image = synthetic_image(32, 32, 42);

    group.bench_function("segment_32x32_bw40_seeds64", |b| {
        b.iter(|| {
            let model = MeanShift::new(40.0).with_seed_limit(64).with_seed(42);
            model.segment(black_box(&image)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_kmeans, bench_mean_shift);
criterion_main!(benches);
