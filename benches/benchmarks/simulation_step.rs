use criterion::{criterion_group, Criterion};

use yaflip3d::flip::*;

fn bench_simulation_step(c: &mut Criterion) {
    let config = SimulationConfig {
        particle_count: 10000,
        seed: Some(0),
        ..Default::default()
    };
    let [nx, ny, nz] = config.grid_size;
    let mut simulation = Simulation::new(config).unwrap();
    simulation.start();
    // Let the fluid settle a bit so the step doesn't just measure the first, trivial tick.
    for _ in 0..10 {
        simulation.tick();
    }

    c.bench_function(
        &format!(
            "bench_simulation_step - {}x{}x{} grid with {} marker particles",
            nx,
            ny,
            nz,
            simulation.particle_positions().len()
        ),
        |b| b.iter(|| simulation.tick()),
    );
}

fn config() -> Criterion {
    Criterion::default().sample_size(20)
}

criterion_group!(
    name = simulation_step;
    config = config();
    targets = bench_simulation_step
);
