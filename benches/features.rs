//! Feature benchmark: transactions → customer / terminal windows → feature rows.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fraud_core::config::FeaturesConfig;
use fraud_core::features::{CustomerFeatureBuilder, FeaturePipeline, TerminalRiskBuilder};
use fraud_core::Transaction;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_transactions(n: usize, customers: u64, terminals: u64, days: i64) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(0);
    let start = NaiveDate::from_ymd_opt(2018, 4, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut offsets: Vec<i64> = (0..n).map(|_| rng.gen_range(0..days * 86_400)).collect();
    offsets.sort_unstable();
    offsets
        .into_iter()
        .enumerate()
        .map(|(i, secs)| {
            let tx = Transaction::new(
                i as u64,
                start + Duration::seconds(secs),
                rng.gen_range(0..customers),
                rng.gen_range(0..terminals),
                rng.gen_range(5.0..150.0),
                secs / 86_400,
            );
            if rng.gen_bool(0.01) {
                tx.with_fraud(1)
            } else {
                tx
            }
        })
        .collect()
}

fn bench_customer_features(c: &mut Criterion) {
    let txs = make_transactions(10_000, 500, 100, 60);
    let builder = CustomerFeatureBuilder::default();

    c.bench_function("customer_features_10k", |b| {
        b.iter(|| black_box(builder.compute(black_box(&txs))).unwrap())
    });
}

fn bench_terminal_risk(c: &mut Criterion) {
    let txs = make_transactions(10_000, 500, 100, 60);
    let builder = TerminalRiskBuilder::default();

    c.bench_function("terminal_risk_10k", |b| {
        b.iter(|| black_box(builder.compute(black_box(&txs))).unwrap())
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let pipeline = FeaturePipeline::new(&FeaturesConfig::default()).unwrap();

    let mut g = c.benchmark_group("pipeline_by_size");
    for n in [1_000, 10_000, 50_000] {
        let txs = make_transactions(n, 1_000, 200, 90);
        g.bench_function(format!("tx_{}", n).as_str(), |b| {
            b.iter(|| black_box(pipeline.transform(black_box(&txs))).unwrap())
        });
    }
    g.finish();
}

criterion_group!(
    benches,
    bench_customer_features,
    bench_terminal_risk,
    bench_full_pipeline
);
criterion_main!(benches);
