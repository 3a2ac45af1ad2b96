use criterion::{black_box, criterion_group, Criterion};

use yaflip3d::flip::cellfield::solid_boundary_mask;
use yaflip3d::flip::stages;
use yaflip3d::flip::*;
use yaflip3d::units::*;

fn bench_gauss_seidel(c: &mut Criterion) {
    let topology = GridTopology::new(32, 16, 32);
    let mask = solid_boundary_mask(&topology, &[]);

    // lower half of the domain is water, falling at 1 m/s
    let mut positions = Vec::new();
    for z in 1..31 {
        for y in 1..8 {
            for x in 1..31 {
                positions.push(topology.cell_center(x, y, z, 1.0));
            }
        }
    }
    let mut cells = CellField::new(topology.num_cells());
    stages::classify(&mut cells, &topology, &positions, 1.0, &mask);
    cells.velocities.iter_mut().for_each(|v| *v = Vector::new(0.0, -1.0, 0.0));

    let mut system = SparseSystem::new(0, topology);
    stages::setup_pressure(&cells, &mut system, &topology, 1.0, 100.0, -1000.0, 0.02);

    let mut group = c.benchmark_group("SparseSystem");
    group.bench_function(format!("gauss_seidel - {} water cells, 3 sweeps", cells.num_water_cells()), |b| {
        b.iter(|| {
            system.zero_solution();
            system.gauss_seidel(black_box(3));
        })
    });
    group.bench_function("setup_pressure", |b| {
        b.iter(|| stages::setup_pressure(&cells, &mut system, &topology, 1.0, 100.0, -1000.0, black_box(0.02)))
    });
    group.finish();
}

criterion_group!(gauss_seidel, bench_gauss_seidel);
