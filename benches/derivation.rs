use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pkseries::prelude::*;

/// A synthetic study with `nsub` subjects sampled at the same nominal times
fn study(nsub: usize) -> Dataset {
    let times = [0.0, 0.25, 0.5, 1.0, 2.0, 3.5, 5.0, 7.0, 9.0, 12.0, 24.0];
    let mut observations = Vec::with_capacity(nsub * times.len());
    for sub in 0..nsub {
        let ka = 1.0 + (sub % 7) as f64 * 0.2;
        let ke = 0.08 + (sub % 5) as f64 * 0.01;
        for t in times {
            let conc = 10.0 * ka / (ka - ke) * ((-ke * t).exp() - (-ka * t).exp());
            observations.push(Observation::new(
                sub.to_string(),
                t,
                conc,
                observations.len(),
            ));
        }
    }
    Dataset::new(observations)
}

fn benchmark_derivation(c: &mut Criterion) {
    let small = study(12);
    let large = study(1_000);

    c.bench_function("subject_series_12", |b| {
        b.iter(|| derive_subject_series(black_box(&small)))
    });

    c.bench_function("aggregate_series_12", |b| {
        b.iter(|| derive_aggregate_series(black_box(&small), StdPolicy::Zero))
    });

    c.bench_function("subject_series_1_000", |b| {
        b.iter(|| derive_subject_series(black_box(&large)))
    });

    c.bench_function("aggregate_series_1_000", |b| {
        b.iter(|| derive_aggregate_series(black_box(&large), StdPolicy::Zero))
    });
}

fn benchmark_load(c: &mut Criterion) {
    let columns = Columns {
        subject: "Subject_ID".to_string(),
        time: "Time_h".to_string(),
        concentration: "Concentration_mg_L".to_string(),
        ..Columns::default()
    };

    c.bench_function("load_theophylline", |b| {
        b.iter(|| Dataset::from_path(black_box("src/tests/data/theophylline.csv"), &columns))
    });
}

criterion_group!(benches, benchmark_derivation, benchmark_load);
criterion_main!(benches);
