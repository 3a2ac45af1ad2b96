use super::super::cellfield::{CellField, Phase};
use super::super::gridtopology::GridTopology;
use super::super::sparsesystem::{SparseSystem, COEFFS_PER_ROW, NEIGHBORS_PER_ROW, NO_NEIGHBOR};
use crate::units::*;
use cgmath::prelude::*;
use rayon::prelude::*;

/// Isolated water cells would end up with a zero diagonal.
const MIN_DIAGONAL: Real = 1.0;

// -1 for the "minus" stencil directions, +1 for the "plus" ones.
#[inline]
fn direction_sign(direction: usize) -> Real {
    if direction % 2 == 0 {
        -1.0
    } else {
        1.0
    }
}

/// Assembles the pressure Poisson system for all water cells.
///
/// Water rows: diagonal is the number of non-solid neighbors, -1 for every water/air neighbor.
/// The right hand side is `-outflow * cell_width * fluid_density / dt`, where outflow is the net flux through the
/// cell faces (face velocity = mean of both cells, zero towards solids), plus `atmo_pressure` for every air neighbor.
/// Outflow is not divided by the cell width, so the divergence term scales with `cell_width²` against a unit stencil.
/// All other rows are identity rows with zero right hand side, so they stay at zero during the solve.
pub fn setup_pressure(
    cells: &CellField,
    system: &mut SparseSystem,
    topology: &GridTopology,
    cell_width: Real,
    fluid_density: Real,
    atmo_pressure: Real,
    dt: Real,
) {
    microprofile::scope!("stages", "setup_pressure");
    assert_eq!(system.num_rows(), topology.num_cells());
    let phases = &cells.phases;
    let velocities = &cells.velocities;
    let divergence_scale = -cell_width * fluid_density / dt;

    system
        .coeffs
        .par_chunks_mut(COEFFS_PER_ROW)
        .zip(system.col_index.par_chunks_mut(NEIGHBORS_PER_ROW))
        .zip(system.rhs.par_iter_mut())
        .enumerate()
        .for_each(|(i, ((coeffs, columns), rhs))| {
            if phases[i] != Phase::Water {
                coeffs[0] = 1.0;
                coeffs[1..].iter_mut().for_each(|c| *c = 0.0);
                columns.iter_mut().for_each(|c| *c = NO_NEIGHBOR);
                *rhs = 0.0;
                return;
            }

            let (x, y, z) = topology.coordinates(i);
            let velocity = velocities[i];
            let mut diagonal = 0.0;
            let mut outflow = 0.0;
            let mut boundary = 0.0;
            for direction in 0..6 {
                match topology.neighbor(x, y, z, direction) {
                    Some(n) if phases[n] != Phase::Solid => {
                        diagonal += 1.0;
                        coeffs[1 + direction] = -1.0;
                        columns[direction] = n as u32;

                        let axis = direction / 2;
                        let face_velocity = 0.5 * (velocity[axis] + velocities[n][axis]);
                        outflow += direction_sign(direction) * face_velocity;

                        if phases[n] == Phase::Air {
                            boundary += atmo_pressure;
                        }
                    }
                    // no flux through solid faces or the grid border
                    _ => {
                        coeffs[1 + direction] = 0.0;
                        columns[direction] = NO_NEIGHBOR;
                    }
                }
            }
            coeffs[0] = Real::max(diagonal, MIN_DIAGONAL);
            *rhs = outflow * divergence_scale + boundary;
        });
}

/// Writes the solved pressures back into the cells. Everything that isn't water gets the air pressure.
/// Non-finite solutions are replaced with the air pressure as well, returns how many water cells were affected.
pub fn copy_pressure(cells: &mut CellField, system: &SparseSystem, atmo_pressure: Real) -> usize {
    microprofile::scope!("stages", "copy_pressure");
    cells
        .pressures
        .par_iter_mut()
        .zip((&cells.phases, &system.solution).into_par_iter())
        .map(|(pressure, (&phase, &solution))| {
            if phase != Phase::Water {
                *pressure = atmo_pressure;
                0_usize
            } else if !solution.is_finite() {
                *pressure = atmo_pressure;
                1
            } else {
                *pressure = solution;
                0
            }
        })
        .sum()
}

/// Subtracts the pressure gradient from the velocity of every water cell.
///
/// Per axis, both faces contribute `(pressure difference) / density` where density is the fluid density towards
/// water neighbors and the air density towards air neighbors. Solid faces contribute nothing.
/// The mean of both faces is scaled by `dt / cell_width`.
pub fn apply_pressure(cells: &mut CellField, topology: &GridTopology, cell_width: Real, fluid_density: Real, air_density: Real, dt: Real) {
    microprofile::scope!("stages", "apply_pressure");
    let phases = &cells.phases;
    let pressures = &cells.pressures;
    let velocities = &cells.velocities;
    let scale = 0.5 * dt / cell_width;

    cells.next_velocities.par_iter_mut().enumerate().for_each(|(i, next)| {
        let velocity = velocities[i];
        if phases[i] != Phase::Water {
            *next = velocity;
            return;
        }

        let (x, y, z) = topology.coordinates(i);
        let pressure = pressures[i];
        let mut gradient = Vector::zero();
        for direction in 0..6 {
            let n = match topology.neighbor(x, y, z, direction) {
                Some(n) if phases[n] != Phase::Solid => n,
                _ => continue,
            };
            let density = if phases[n] == Phase::Water { fluid_density } else { air_density };
            gradient[direction / 2] += direction_sign(direction) * (pressures[n] - pressure) / density;
        }
        *next = velocity - gradient * scale;
    });
}
