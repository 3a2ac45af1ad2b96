pub use self::cellfield::{CellField, Phase};
pub use self::config::{ObstacleBox, SimulationConfig, SpawnRegion, VelocitySeed};
pub use self::error::ConfigurationError;
pub use self::fluidgridworld::FluidGridWorld;
pub use self::gridtopology::GridTopology;
pub use self::markerparticles::MarkerParticles;
pub use self::sampling::{is_inside_domain, sample_velocity};
pub use self::simulation::{Simulation, SimulationState};
pub use self::solver::*;
pub use self::sparsesystem::SparseSystem;
pub use self::timemanager::TimeManager;

pub mod cellfield;
pub mod sparsesystem;
pub mod stages;

mod config;
mod error;
mod fluidgridworld;
mod gridtopology;
mod markerparticles;
mod sampling;
mod simulation;
mod solver;
mod timemanager;
