use criterion::{black_box, criterion_group, criterion_main, Criterion};
use exposure::photometry::sky::SkySpectrumModel;
use exposure::scenario::Scenario;
use exposure::{ExposureEngine, SpectralGrid};

fn bench_scenario_evaluate(c: &mut Criterion) {
    let scenario = Scenario::default();

    c.bench_function("scenario_evaluate_default", |b| {
        b.iter(|| black_box(&scenario).evaluate())
    });
}

fn bench_engine_run(c: &mut Criterion) {
    let scenario = Scenario::default();
    let output = scenario.evaluate().expect("default scenario evaluates");
    let engine = ExposureEngine::new(output.instrument.clone());
    let apertures: Vec<f64> = (1..=40).map(|i| i as f64 * 0.1).collect();
    let seeing = scenario.conditions.seeing_fwhm_arcsec();

    let mut group = c.benchmark_group("engine_run");
    group.bench_function("5_apertures", |b| {
        b.iter(|| {
            engine.run(
                black_box(&output.target),
                black_box(&output.sky),
                black_box(&output.throughput),
                black_box(&scenario.exposure),
                seeing,
                black_box(&scenario.apertures),
            )
        })
    });
    group.bench_function("40_apertures", |b| {
        b.iter(|| {
            engine.run(
                black_box(&output.target),
                black_box(&output.sky),
                black_box(&output.throughput),
                black_box(&scenario.exposure),
                seeing,
                black_box(&apertures),
            )
        })
    });
    group.finish();
}

fn bench_sky_update(c: &mut Criterion) {
    let conditions = Scenario::default().conditions;
    let mut model = SkySpectrumModel::pipeline();

    c.bench_function("sky_update_pipeline_grid", |b| {
        b.iter(|| model.update(black_box(&conditions)).map(|grid| grid.len()))
    });
}

fn bench_display_decimation(c: &mut Criterion) {
    let grid = SpectralGrid::pipeline(1.0);

    c.bench_function("decimate_for_display", |b| {
        b.iter(|| black_box(&grid).to_display())
    });
}

criterion_group!(
    benches,
    bench_scenario_evaluate,
    bench_engine_run,
    bench_sky_update,
    bench_display_decimation
);
criterion_main!(benches);
