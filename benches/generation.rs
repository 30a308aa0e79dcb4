//! Benchmarks for sample generation and window maintenance

use agroclima::{
    indicators, GeneratorConfig, HistoryWindow, Metric, SampleGenerator, WindowStats,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    let mut generator = SampleGenerator::new(GeneratorConfig::new().with_seed(42)).unwrap();

    group.throughput(Throughput::Elements(1));
    group.bench_function("generate_current", |b| {
        b.iter(|| black_box(generator.generate_current()))
    });

    group.throughput(Throughput::Elements(169));
    group.bench_function("generate_history_week", |b| {
        b.iter(|| black_box(generator.generate_history(168).unwrap()))
    });

    group.finish();
}

fn bench_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("window");
    let mut generator = SampleGenerator::new(GeneratorConfig::new().with_seed(7)).unwrap();
    let readings = generator.generate_history(999).unwrap();
    let mut window = HistoryWindow::prefilled(&mut generator, 24).unwrap();

    group.throughput(Throughput::Elements(1000));
    group.bench_function("push_1000_evicting", |b| {
        b.iter(|| {
            for r in &readings {
                window.push(r.clone());
            }
            black_box(window.len())
        })
    });

    group.bench_function("stats_and_indicators", |b| {
        b.iter(|| {
            let snapshot = window.snapshot();
            let stats = WindowStats::compute(&snapshot, Metric::Temperature);
            let tiles = indicators(&snapshot[snapshot.len() - 1], snapshot.get(snapshot.len() - 2));
            black_box((stats, tiles))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_generation, bench_window);
criterion_main!(benches);
