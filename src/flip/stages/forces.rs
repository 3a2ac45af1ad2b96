use super::super::cellfield::{CellField, Phase};
use super::super::gridtopology::GridTopology;
use crate::units::*;
use cgmath::prelude::*;
use rayon::prelude::*;

/// Adds `gravity * dt` to the vertical velocity of every water cell.
pub fn apply_external_forces(cells: &mut CellField, gravity: Real, dt: Real) {
    microprofile::scope!("stages", "apply_external_forces");
    let acceleration = Vector::new(0.0, gravity, 0.0);
    cells
        .next_velocities
        .par_iter_mut()
        .zip((&cells.velocities, &cells.phases).into_par_iter())
        .for_each(|(next, (&velocity, &phase))| {
            *next = if phase == Phase::Water {
                velocity + acceleration * dt
            } else {
                velocity
            };
        });
}

/// Explicit diffusion of the velocity field over water cells, using the 6-neighbor laplacian.
/// Neighbors outside of the grid contribute zero velocity.
pub fn apply_viscosity(cells: &mut CellField, topology: &GridTopology, viscosity: Real, cell_width: Real, dt: Real) {
    microprofile::scope!("stages", "apply_viscosity");
    let velocities = &cells.velocities;
    let phases = &cells.phases;
    let factor = viscosity * dt / (cell_width * cell_width);

    cells.next_velocities.par_iter_mut().enumerate().for_each(|(i, next)| {
        let velocity = velocities[i];
        if phases[i] != Phase::Water {
            *next = velocity;
            return;
        }
        let (x, y, z) = topology.coordinates(i);
        let mut laplacian = Vector::zero();
        for direction in 0..6 {
            let neighbor_velocity = match topology.neighbor(x, y, z, direction) {
                Some(n) => velocities[n],
                None => Vector::zero(),
            };
            laplacian += neighbor_velocity - velocity;
        }
        *next = velocity + laplacian * factor;
    });
}
