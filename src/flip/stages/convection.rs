use super::super::cellfield::{CellField, Phase};
use super::super::gridtopology::GridTopology;
use super::super::sampling::{is_inside_domain, sample_velocity};
use crate::units::*;
use rayon::prelude::*;

/// Semi-Lagrangian self-advection of the velocity field.
///
/// Each water cell traces its center back by one timestep and takes the interpolated velocity found there.
/// Backtraces leaving the domain keep the cell's velocity.
pub fn convect(cells: &mut CellField, topology: &GridTopology, cell_width: Real, dt: Real) {
    microprofile::scope!("stages", "convect");
    let velocities = &cells.velocities;
    let phases = &cells.phases;

    cells.next_velocities.par_iter_mut().enumerate().for_each(|(i, next)| {
        let velocity = velocities[i];
        if phases[i] != Phase::Water {
            *next = velocity;
            return;
        }
        let (x, y, z) = topology.coordinates(i);
        let backtraced = topology.cell_center(x, y, z, cell_width) - velocity * dt;
        *next = if is_inside_domain(topology, cell_width, backtraced) {
            sample_velocity(topology, velocities, cell_width, backtraced)
        } else {
            velocity
        };
    });
}
