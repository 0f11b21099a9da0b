use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use cyberrange::prelude::*;
use std::hint::black_box;

fn bench_rounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("rounds");

    for nodes in [20usize, 200, 2000] {
        let config = SimConfig::default()
            .with_topology(nodes, 4, 0.15)
            .with_population(nodes / 10, nodes / 7, nodes / 2)
            .with_seed(42);

        group.bench_with_input(BenchmarkId::new("100_rounds", nodes), &config, |b, config| {
            b.iter(|| {
                let mut sim = Simulation::new(config.clone()).unwrap();
                sim.run(100).unwrap();
                black_box(sim.state_counts())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rounds);
criterion_main!(benches);
