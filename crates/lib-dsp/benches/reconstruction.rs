//! Reconstruction and PSD benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lib_dsp::engine::{EngineConfig, ReconstructionEngine};
use lib_types::units::{Hertz, Seconds};

fn bench_reconstruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruction");

    // Observation windows from the default half second up to the UI maximum
    for duration in [0.5, 1.0, 2.0].iter() {
        let config = EngineConfig::new(Hertz(5.0), Hertz(25.0), Seconds(*duration));
        let engine = ReconstructionEngine::new(config).unwrap();
        let samples = engine.samples();

        group.bench_with_input(
            BenchmarkId::new("zoh", duration),
            &(&engine, &samples),
            |b, (e, s)| {
                b.iter(|| e.reconstruct_zoh(black_box(s)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("sinc", duration),
            &(&engine, &samples),
            |b, (e, s)| {
                b.iter(|| e.reconstruct_sinc(black_box(s)));
            },
        );

        let rebuilt = engine.reconstruct_sinc(&samples).unwrap();
        group.bench_with_input(
            BenchmarkId::new("psd", duration),
            &(&engine, &rebuilt),
            |b, (e, x)| {
                b.iter(|| e.psd(black_box(x)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_reconstruction);
criterion_main!(benches);
