use RustedCalculus::symbolic::calculus_api::IntegrationMode;
use RustedCalculus::symbolic::parse_expr::parse_expression_func;
use RustedCalculus::symbolic::symbolic_context::{CalculusEngine, EngineConfig};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const WIDE: &str = "x^3+sin(2*x)-e^(3*x)+x*cos(x)+ln(x)+1/(x^2+4)+sqrt(9-x^2)-tan(x)+x*e^x+e^(x^2)";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse wide sum", |b| {
        b.iter(|| parse_expression_func(black_box(WIDE), "x"))
    });
}

// a fresh engine every iteration, so the caches never help
fn bench_differentiate(c: &mut Criterion) {
    let expr = parse_expression_func(WIDE, "x").unwrap();
    let mut group = c.benchmark_group("differentiate");
    group.bench_function("parallel", |b| {
        b.iter(|| CalculusEngine::new(EngineConfig::default()).differentiate(black_box(&expr), "x"))
    });
    group.bench_function("sequential", |b| {
        b.iter(|| CalculusEngine::new(EngineConfig::sequential()).differentiate(black_box(&expr), "x"))
    });
    group.finish();
}

fn bench_integrate(c: &mut Criterion) {
    let expr = parse_expression_func(WIDE, "x").unwrap();
    let mut group = c.benchmark_group("integrate");
    group.bench_function("cold cache", |b| {
        b.iter(|| CalculusEngine::new(EngineConfig::default()).integrate(black_box(&expr), "x"))
    });
    let warm = CalculusEngine::default();
    group.bench_function("warm cache", |b| {
        b.iter(|| warm.integrate(black_box(&expr), "x"))
    });
    group.finish();
}

fn bench_definite(c: &mut Criterion) {
    let engine = CalculusEngine::default();
    c.bench_function("definite with quadrature fallback", |b| {
        b.iter(|| {
            engine.integrate_text(
                black_box("x^2+e^(x^2)"),
                "x",
                IntegrationMode::Definite,
                Some("0"),
                Some("1"),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_differentiate,
    bench_integrate,
    bench_definite
);
criterion_main!(benches);
