use criterion::criterion_main;
mod benchmarks;

criterion_main! {
    benchmarks::gauss_seidel::gauss_seidel,
    benchmarks::simulation_step::simulation_step,
}
