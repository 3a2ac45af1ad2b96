//! The per-tick stages of the solver.
//!
//! Every stage is a plain function over the grid state it needs. Stages that change velocities
//! read `CellField::velocities` and write `CellField::next_velocities` for *every* cell,
//! the caller publishes the result with `CellField::swap_velocities`.

pub use self::advection::advect_particles;
pub use self::classify::classify;
pub use self::convection::convect;
pub use self::extrapolation::extrapolate_velocities;
pub use self::forces::{apply_external_forces, apply_viscosity};
pub use self::pressure::{apply_pressure, copy_pressure, setup_pressure};

mod advection;
mod classify;
mod convection;
mod extrapolation;
mod forces;
mod pressure;
