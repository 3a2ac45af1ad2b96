use super::error::ConfigurationError;
use super::gridtopology::GridTopology;
use crate::units::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World space box marker particles are spawned in.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnRegion {
    pub min: [Real; 3],
    pub max: [Real; 3],
}

/// Box of cells (inclusive cell coordinates) that is treated as solid, in addition to the domain shell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleBox {
    pub min: [usize; 3],
    pub max: [usize; 3],
}

impl ObstacleBox {
    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        (self.min[0]..=self.max[0]).contains(&x) && (self.min[1]..=self.max[1]).contains(&y) && (self.min[2]..=self.max[2]).contains(&z)
    }
}

/// Initial velocity written into a single cell before the first tick.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VelocitySeed {
    pub cell: [usize; 3],
    pub velocity: [Real; 3],
}

/// All simulation parameters. Read once at initialization, never changed afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub grid_size: [usize; 3],
    pub cell_width: Real, // world units per cell

    pub gravity: Real,       // vertical acceleration in m/s², added to velocity.y. Negative pulls down.
    pub viscosity: Real,     // diffusion coefficient of the explicit viscosity stage
    pub fluid_density: Real, // ρ of water
    pub air_density: Real,   // ρ of air, used for pressure gradients towards air cells
    pub atmo_pressure: Real, // pressure of air cells, also the boundary term for water next to air

    pub gauss_iterations: usize,         // Gauss-Seidel sweeps per tick
    pub extrapolation_iterations: usize, // velocity extrapolation runs this minus one passes

    pub particle_count: usize,
    pub seed: Option<u64>,
    pub spawn_region: Option<SpawnRegion>, // defaults to the domain minus its solid shell

    pub time_step: Real,    // fixed tick length in seconds
    pub grid_levels: usize, // allocated pressure system levels, only level 0 takes part in the solve
    pub obstacles: Vec<ObstacleBox>,
    pub velocity_seeds: Vec<VelocitySeed>, // seeds on solid cells are zeroed by the first classification
    pub probe_cell: [usize; 3], // cell whose pressure is logged every tick
    pub max_speed: Real,        // velocities above this are clamped
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            grid_size: [32, 16, 32],
            cell_width: 1.0,

            gravity: -9.8,
            viscosity: 2.7,
            fluid_density: 100.0,
            air_density: 1.0,
            atmo_pressure: -1000.0,

            gauss_iterations: 3,
            extrapolation_iterations: 3,

            particle_count: 1000,
            seed: None,
            spawn_region: None,

            time_step: 0.02,
            grid_levels: 1,
            obstacles: Vec::new(),
            velocity_seeds: Vec::new(),
            probe_cell: [0, 0, 0],
            max_speed: 1000.0,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a TOML configuration. Missing keys take their default value.
    pub fn from_toml_str(source: &str) -> Result<SimulationConfig, ConfigurationError> {
        let config: SimulationConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<SimulationConfig, ConfigurationError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn topology(&self) -> GridTopology {
        GridTopology::new(self.grid_size[0], self.grid_size[1], self.grid_size[2])
    }

    /// World space box the default particle spawn uses: everything except the solid shell.
    pub fn effective_spawn_region(&self) -> SpawnRegion {
        self.spawn_region.unwrap_or_else(|| {
            let w = self.cell_width;
            let inner = |size: usize| -> (Real, Real) {
                if size > 2 {
                    (w, (size - 1) as Real * w)
                } else {
                    (0.0, size as Real * w)
                }
            };
            let (x0, x1) = inner(self.grid_size[0]);
            let (y0, y1) = inner(self.grid_size[1]);
            let (z0, z1) = inner(self.grid_size[2]);
            SpawnRegion {
                min: [x0, y0, z0],
                max: [x1, y1, z1],
            }
        })
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (axis, &size) in ['x', 'y', 'z'].iter().zip(self.grid_size.iter()) {
            if size == 0 {
                return Err(ConfigurationError::NonPositiveGridDimension { axis: *axis });
            }
        }

        for (field, value) in [
            ("cell_width", self.cell_width),
            ("time_step", self.time_step),
            ("fluid_density", self.fluid_density),
            ("air_density", self.air_density),
            ("max_speed", self.max_speed),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigurationError::NonPositiveValue { field, value });
            }
        }
        if !(self.viscosity >= 0.0 && self.viscosity.is_finite()) {
            return Err(ConfigurationError::NegativeValue {
                field: "viscosity",
                value: self.viscosity,
            });
        }

        for (field, value) in [("gravity", self.gravity), ("atmo_pressure", self.atmo_pressure)] {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteValue { field, value });
            }
        }

        if self.grid_levels == 0 {
            return Err(ConfigurationError::NoGridLevels);
        }

        self.check_cell("probe_cell", self.probe_cell)?;
        for obstacle in self.obstacles.iter() {
            if (0..3).any(|axis| obstacle.min[axis] > obstacle.max[axis]) {
                return Err(ConfigurationError::InvertedBox { field: "obstacles" });
            }
            self.check_cell("obstacles", obstacle.min)?;
            self.check_cell("obstacles", obstacle.max)?;
        }
        for seed in self.velocity_seeds.iter() {
            self.check_cell("velocity_seeds", seed.cell)?;
            if let Some(&value) = seed.velocity.iter().find(|v| !v.is_finite()) {
                return Err(ConfigurationError::NonFiniteValue {
                    field: "velocity_seeds",
                    value,
                });
            }
        }
        if let Some(region) = &self.spawn_region {
            if (0..3).any(|axis| !(region.min[axis] <= region.max[axis])) {
                return Err(ConfigurationError::InvertedBox { field: "spawn_region" });
            }
        }

        Ok(())
    }

    fn check_cell(&self, field: &'static str, cell: [usize; 3]) -> Result<(), ConfigurationError> {
        let [size_x, size_y, size_z] = self.grid_size;
        if cell[0] >= size_x || cell[1] >= size_y || cell[2] >= size_z {
            return Err(ConfigurationError::CellOutOfGrid {
                field,
                x: cell[0],
                y: cell[1],
                z: cell[2],
                size_x,
                size_y,
                size_z,
            });
        }
        Ok(())
    }
}
