pub mod gauss_seidel;
pub mod simulation_step;
