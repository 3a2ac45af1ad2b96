use super::cellfield::{solid_boundary_mask, CellField};
use super::config::{ObstacleBox, SimulationConfig};
use super::gridtopology::GridTopology;
use super::markerparticles::MarkerParticles;
use super::sparsesystem::SparseSystem;
use crate::units::*;
use rand::Rng;
use rayon::prelude::*;

/// Everything that makes up the simulated fluid: the grid, its marker particles and the pressure system(s).
pub struct FluidGridWorld {
    pub cells: CellField,
    pub particles: MarkerParticles,

    pub(super) pressure_levels: Vec<SparseSystem>, // level 0 is the full resolution grid
    pub(super) topology: GridTopology,
    pub(super) cell_width: Real,
    pub(super) solid_mask: Vec<bool>, // shell + obstacles, fixed for the lifetime of the world
}

impl FluidGridWorld {
    pub fn new(topology: GridTopology, cell_width: Real, obstacles: &[ObstacleBox]) -> FluidGridWorld {
        FluidGridWorld {
            cells: CellField::new(topology.num_cells()),
            particles: MarkerParticles::new(),

            pressure_levels: vec![SparseSystem::new(0, topology)],
            topology,
            cell_width,
            solid_mask: solid_boundary_mask(&topology, obstacles),
        }
    }

    /// World as described by a (validated) configuration: all grid levels allocated, particles spawned, velocities seeded.
    pub fn from_config(config: &SimulationConfig, rng: &mut impl Rng) -> FluidGridWorld {
        let mut world = FluidGridWorld::new(config.topology(), config.cell_width, &config.obstacles);
        while world.num_grid_levels() < config.grid_levels {
            world.add_grid_level();
        }
        world.particles = MarkerParticles::new_random(config.particle_count, &config.effective_spawn_region(), rng);
        for seed in config.velocity_seeds.iter() {
            let [x, y, z] = seed.cell;
            world.seed_velocity(x, y, z, Vector::from(seed.velocity));
        }
        world
    }

    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    pub fn cell_width(&self) -> Real {
        self.cell_width
    }

    pub fn extent(&self) -> Vector {
        self.topology.extent(self.cell_width)
    }

    pub fn solid_mask(&self) -> &[bool] {
        &self.solid_mask
    }

    pub fn num_grid_levels(&self) -> usize {
        self.pressure_levels.len()
    }

    pub fn pressure_system(&self, level: usize) -> &SparseSystem {
        &self.pressure_levels[level]
    }

    /// Allocates the pressure system of the next coarser level (half the cells per axis).
    ///
    /// Coarser levels are not coupled to the solve yet.
    pub fn add_grid_level(&mut self) {
        let level = self.pressure_levels.len();
        let topology = self.pressure_levels[level - 1].topology().coarsened();
        log::info!(
            "Grid level {} added ({}x{}x{} cells)",
            level,
            topology.size_x(),
            topology.size_y(),
            topology.size_z()
        );
        self.pressure_levels.push(SparseSystem::new(level, topology));
    }

    /// Overwrites the velocity of a single cell. Meant for setting up initial conditions before the first tick.
    pub fn seed_velocity(&mut self, x: usize, y: usize, z: usize, velocity: Vector) {
        let index = self.topology.index(x, y, z);
        self.cells.velocities[index] = velocity;
    }

    pub fn pressure_at(&self, x: usize, y: usize, z: usize) -> Real {
        self.cells.pressures[self.topology.index(x, y, z)]
    }

    /// Pressure of the cell containing each particle, e.g. for shading.
    pub fn particle_pressures(&self) -> Vec<Real> {
        let topology = &self.topology;
        let cell_width = self.cell_width;
        let pressures = &self.cells.pressures;
        self.particles
            .positions
            .par_iter()
            .map(|&position| {
                let (x, y, z) = topology.cell_of_position(position, cell_width);
                pressures[topology.index(x, y, z)]
            })
            .collect()
    }
}
