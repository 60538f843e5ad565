//! Benchmarks for routing and expression evaluation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gideon::intent::IntentRouter;
use gideon::math;

const UTTERANCES: &[&str] = &[
    "12 times (3 + 4) divided by 2",
    "weather in Thessaloniki",
    "who is Ada Lovelace",
    "translate good morning to greek",
    "tell me a joke",
    "hello there",
];

fn bench_route(c: &mut Criterion) {
    let router = IntentRouter::default();

    c.bench_function("route_mixed", |bench| {
        bench.iter(|| {
            for text in UTTERANCES {
                black_box(router.route(black_box(text)));
            }
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    c.bench_function("evaluate_nested", |bench| {
        bench.iter(|| black_box(math::evaluate(black_box("((1+2)*(3-4)/5)^2 - -7.5"))))
    });
}

fn bench_evaluate_deep(c: &mut Criterion) {
    let expr = format!("{}1{}", "(".repeat(60), ")".repeat(60));

    c.bench_function("evaluate_depth_60", |bench| {
        bench.iter(|| black_box(math::evaluate(black_box(&expr))))
    });
}

criterion_group!(benches, bench_route, bench_evaluate, bench_evaluate_deep);
criterion_main!(benches);
