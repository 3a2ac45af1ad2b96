use super::super::config::SimulationConfig;
use super::super::fluidgridworld::FluidGridWorld;
use super::super::stages;
use super::Solver;
use crate::units::*;

/// Grid based water solver: marker particles define the water region, velocities and pressure live on the grid.
///
/// Each step runs classification, convection, external forces, viscosity, pressure projection,
/// velocity extrapolation and finally moves the marker particles.
pub struct FlipSolver {
    gravity: Real, // added to velocity.y
    viscosity: Real,
    fluid_density: Real,
    air_density: Real,
    atmo_pressure: Real,

    gauss_iterations: usize,
    extrapolation_passes: usize,
    max_speed: Real,

    probe_cell: [usize; 3],
}

impl FlipSolver {
    pub fn new(config: &SimulationConfig) -> FlipSolver {
        FlipSolver {
            gravity: config.gravity,
            viscosity: config.viscosity,
            fluid_density: config.fluid_density,
            air_density: config.air_density,
            atmo_pressure: config.atmo_pressure,

            gauss_iterations: config.gauss_iterations,
            extrapolation_passes: config.extrapolation_iterations.saturating_sub(1),
            max_speed: config.max_speed,

            probe_cell: config.probe_cell,
        }
    }

    fn solve_pressure(&self, fluid_world: &mut FluidGridWorld, dt: Real) {
        microprofile::scope!("FlipSolver", "pressure");
        let topology = fluid_world.topology;
        let cell_width = fluid_world.cell_width;
        let cells = &mut fluid_world.cells;
        let system = &mut fluid_world.pressure_levels[0];

        stages::setup_pressure(cells, system, &topology, cell_width, self.fluid_density, self.atmo_pressure, dt);
        system.zero_solution();
        system.gauss_seidel(self.gauss_iterations);
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("pressure residual after {} sweeps: {}", self.gauss_iterations, system.residual_norm());
        }
        let num_degenerate_pressures = stages::copy_pressure(cells, system, self.atmo_pressure);
        stages::apply_pressure(cells, &topology, cell_width, self.fluid_density, self.air_density, dt);
        cells.swap_velocities();

        let num_degenerate_velocities = cells.sanitize_velocities(self.max_speed);
        if num_degenerate_pressures > 0 || num_degenerate_velocities > 0 {
            log::warn!(
                "Pressure projection degenerated: {} non-finite pressures reset to air pressure, {} velocities clamped",
                num_degenerate_pressures,
                num_degenerate_velocities
            );
        }
    }
}

impl Solver for FlipSolver {
    fn simulation_step(&mut self, fluid_world: &mut FluidGridWorld, dt: Real) {
        microprofile::scope!("FlipSolver", "simulation_step");
        let topology = fluid_world.topology;
        let cell_width = fluid_world.cell_width;

        {
            let cells = &mut fluid_world.cells;
            stages::classify(cells, &topology, &fluid_world.particles.positions, cell_width, &fluid_world.solid_mask);

            stages::convect(cells, &topology, cell_width, dt);
            cells.swap_velocities();

            stages::apply_external_forces(cells, self.gravity, dt);
            cells.swap_velocities();

            stages::apply_viscosity(cells, &topology, self.viscosity, cell_width, dt);
            cells.swap_velocities();
        }

        self.solve_pressure(fluid_world, dt);

        {
            let cells = &mut fluid_world.cells;
            stages::extrapolate_velocities(cells, &topology, self.extrapolation_passes);
            cells.zero_solid_velocities();
        }

        stages::advect_particles(&mut fluid_world.particles, &fluid_world.cells.velocities, &topology, cell_width, dt);

        let [x, y, z] = self.probe_cell;
        log::debug!("pressure at probe cell ({}, {}, {}): {}", x, y, z, fluid_world.pressure_at(x, y, z));
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::cellfield::Phase;
    use super::super::super::gridtopology::GridTopology;
    use super::*;
    use cgmath::prelude::*;
    use more_asserts::*;

    fn config(grid_size: [usize; 3]) -> SimulationConfig {
        SimulationConfig {
            grid_size,
            gravity: 9.8,
            viscosity: 0.0,
            fluid_density: 1.0,
            air_density: 1.0,
            atmo_pressure: 0.0,
            gauss_iterations: 3,
            particle_count: 0,
            ..Default::default()
        }
    }

    #[test]
    fn pressure_opposes_gravity() {
        let config = config([4, 4, 4]);
        let mut world = FluidGridWorld::new(config.topology(), 1.0, &[]);
        world.particles.positions.push(Point::new(1.5, 1.5, 1.5));
        let mut solver = FlipSolver::new(&config);

        solver.simulation_step(&mut world, 0.1);

        let water = world.topology().index(1, 1, 1);
        assert_eq!(world.cells.phases[water], Phase::Water);
        let vy = world.cells.velocities[water].y;
        assert_gt!(vy, 0.0);
        assert_lt!(vy, 0.98);
        assert_lt!(world.pressure_at(1, 1, 1), 0.0);
    }

    #[test]
    fn solids_end_up_at_rest() {
        let config = config([5, 5, 5]);
        let mut world = FluidGridWorld::new(config.topology(), 1.0, &[]);
        world.particles.positions.push(Point::new(2.5, 2.5, 2.5));
        world.cells.velocities.iter_mut().for_each(|v| *v = Vector::new(1.0, 2.0, 3.0));
        let mut solver = FlipSolver::new(&config);

        solver.simulation_step(&mut world, 0.05);

        let topology: GridTopology = *world.topology();
        for i in 0..topology.num_cells() {
            let (x, y, z) = topology.coordinates(i);
            if topology.is_on_shell(x, y, z) {
                assert_eq!(world.cells.phases[i], Phase::Solid);
                assert_eq!(world.cells.velocities[i], Vector::zero());
            }
        }
    }
}
