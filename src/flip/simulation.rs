use super::config::SimulationConfig;
use super::error::ConfigurationError;
use super::fluidgridworld::FluidGridWorld;
use super::solver::{FlipSolver, Solver};
use crate::units::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimulationState {
    /// Waiting for the start trigger, ticks do nothing.
    Idle,
    /// Runs one solver step per tick. There is no way back to `Idle`.
    Running,
}

/// Owns the fluid world and drives the solver.
pub struct Simulation {
    config: SimulationConfig,
    state: SimulationState,
    fluid_world: FluidGridWorld,
    solver: Box<dyn Solver>,
    num_ticks: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Simulation, ConfigurationError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let fluid_world = FluidGridWorld::from_config(&config, &mut rng);
        let solver = FlipSolver::new(&config);

        let [nx, ny, nz] = config.grid_size;
        log::info!(
            "Simulation set up: {}x{}x{} cells, {} marker particles, {} grid level(s)",
            nx,
            ny,
            nz,
            fluid_world.particles.len(),
            fluid_world.num_grid_levels()
        );

        Ok(Simulation {
            config,
            state: SimulationState::Idle,
            fluid_world,
            solver: Box::new(solver),
            num_ticks: 0,
        })
    }

    /// The start trigger. Only the first call has an effect.
    pub fn start(&mut self) {
        if self.state == SimulationState::Idle {
            log::info!("Simulation started");
            self.state = SimulationState::Running;
        }
    }

    /// Runs one step with the configured timestep. Returns false if the simulation hasn't been started yet.
    pub fn tick(&mut self) -> bool {
        self.tick_with(self.config.time_step)
    }

    /// Like [`Simulation::tick`], but with a timestep chosen by the caller.
    /// Timesteps that aren't positive and finite are skipped.
    pub fn tick_with(&mut self, dt: Real) -> bool {
        if self.state != SimulationState::Running {
            return false;
        }
        if !(dt > 0.0 && dt.is_finite()) {
            log::warn!("Skipping tick with invalid timestep {}", dt);
            return false;
        }
        microprofile::scope!("Simulation", "tick");
        self.solver.simulation_step(&mut self.fluid_world, dt);
        self.num_ticks += 1;
        true
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn num_ticks(&self) -> u64 {
        self.num_ticks
    }

    pub fn world(&self) -> &FluidGridWorld {
        &self.fluid_world
    }

    // For setting up initial conditions (e.g. seeding velocities) before starting.
    pub fn world_mut(&mut self) -> &mut FluidGridWorld {
        &mut self.fluid_world
    }

    pub fn particle_positions(&self) -> &[Point] {
        self.fluid_world.particles.positions()
    }

    pub fn probe_pressure(&self) -> Real {
        let [x, y, z] = self.config.probe_cell;
        self.fluid_world.pressure_at(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            grid_size: [6, 6, 6],
            particle_count: 50,
            seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn idle_until_started() {
        let mut simulation = Simulation::new(small_config()).unwrap();
        let before = simulation.particle_positions().to_vec();
        assert_eq!(simulation.state(), SimulationState::Idle);
        assert!(!simulation.tick());
        assert_eq!(simulation.num_ticks(), 0);
        assert_eq!(simulation.particle_positions(), &before[..]);

        simulation.start();
        simulation.start();
        assert_eq!(simulation.state(), SimulationState::Running);
        assert!(simulation.tick());
        assert!(simulation.tick_with(0.01));
        assert_eq!(simulation.num_ticks(), 2);
        assert_eq!(simulation.state(), SimulationState::Running);
    }

    #[test]
    fn degenerate_timesteps_are_skipped() {
        let mut simulation = Simulation::new(SimulationConfig {
            particle_count: 200,
            ..small_config()
        })
        .unwrap();
        simulation.start();
        assert!(simulation.tick());
        let positions = simulation.particle_positions().to_vec();

        for dt in [0.0, -0.02, Real::NAN, Real::INFINITY] {
            assert!(!simulation.tick_with(dt));
        }
        assert_eq!(simulation.num_ticks(), 1);
        assert_eq!(simulation.particle_positions(), &positions[..]);
        assert!(simulation.world().cells.pressures.iter().all(|p| p.is_finite()));
        assert!(simulation.probe_pressure().is_finite());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimulationConfig {
            grid_size: [6, 0, 6],
            ..small_config()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(ConfigurationError::NonPositiveGridDimension { axis: 'y' })
        ));
    }

    #[test]
    fn same_seed_same_particles() {
        let a = Simulation::new(small_config()).unwrap();
        let b = Simulation::new(small_config()).unwrap();
        assert_eq!(a.particle_positions(), b.particle_positions());
    }
}
