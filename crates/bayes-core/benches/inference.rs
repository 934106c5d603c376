use bayes_core::inference::{Backend, InferenceEngine};
use bayes_core::networks::{self, random};
use bayes_core::{BayesNetwork, Evidence};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_query(
    engine: &dyn InferenceEngine,
    network: &BayesNetwork,
    variable: &str,
    evidence: &Evidence,
) {
    let _ = black_box(engine.query_distribution(network, variable, evidence));
}

fn builtin_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("builtin_posterior");
    let cases = [
        ("twilight", "BellaState", Evidence::new().with("Volturi", "Yes")),
        ("respiratory", "Virus", Evidence::new().with("Diagnosis", "Positive")),
        ("road_accident", "Alcohol", Evidence::new().with("Severity", "Severe")),
    ];
    for (name, variable, evidence) in &cases {
        let Some(Ok(network)) = networks::builtin(name) else { continue };
        for backend in Backend::ALL {
            let engine = backend.engine();
            group.bench_function(format!("{name}_{backend}"), |b| {
                b.iter(|| bench_query(engine.as_ref(), &network, variable, evidence))
            });
        }
    }
    group.finish();
}

fn random_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_posterior");
    for variables in [8usize, 12, 16] {
        let shape = random::RandomShape {
            variables,
            max_parents: 2,
            max_states: 2,
        };
        let Ok(network) = random::generate(2024, shape) else {
            continue;
        };
        let evidence = Evidence::new().with(format!("X{}", variables - 1), "s0");
        for backend in Backend::ALL {
            let engine = backend.engine();
            group.bench_function(format!("n{variables}_{backend}"), |b| {
                b.iter(|| bench_query(engine.as_ref(), &network, "X0", &evidence))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, builtin_bench, random_bench);
criterion_main!(benches);
