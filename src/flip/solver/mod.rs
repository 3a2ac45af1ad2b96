pub use flipsolver::FlipSolver;

mod flipsolver;

// ------------------------------------------------------

use super::fluidgridworld::FluidGridWorld;
use crate::units::*;

pub trait Solver {
    // performs a single simulation step with a fixed timestep.
    fn simulation_step(&mut self, fluid_world: &mut FluidGridWorld, dt: Real);
}
