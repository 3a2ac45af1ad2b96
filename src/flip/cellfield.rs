use super::config::ObstacleBox;
use super::gridtopology::GridTopology;
use crate::units::*;
use cgmath::prelude::*;
use rayon::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Air,
    Water,
    Solid,
}

/// Extrapolation layer of cells that haven't received a valid velocity yet.
pub(crate) const LAYER_UNKNOWN: u32 = u32::MAX;

/// Per-cell state of the whole grid, stored as one array per attribute.
///
/// `velocities` is what stages read, `next_velocities` is what they write.
/// Stages never read `next_velocities`; [`CellField::swap_velocities`] publishes a stage's result.
pub struct CellField {
    pub phases: Vec<Phase>,
    pub pressures: Vec<Real>,
    pub velocities: Vec<Vector>,
    pub next_velocities: Vec<Vector>,

    // Graph distance to the fluid region, maintained by velocity extrapolation.
    pub(crate) layers: Vec<u32>,
}

impl CellField {
    pub fn new(num_cells: usize) -> CellField {
        CellField {
            phases: vec![Phase::Air; num_cells],
            pressures: vec![0.0; num_cells],
            velocities: vec![Vector::zero(); num_cells],
            next_velocities: vec![Vector::zero(); num_cells],
            layers: vec![LAYER_UNKNOWN; num_cells],
        }
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn num_water_cells(&self) -> usize {
        self.phases.iter().filter(|&&phase| phase == Phase::Water).count()
    }

    pub fn reset_to_air(&mut self) {
        self.phases.par_iter_mut().for_each(|phase| *phase = Phase::Air);
    }

    /// Marks every cell that contains at least one particle as water.
    pub fn mark_water_from_particles(&mut self, topology: &GridTopology, positions: &[Point], cell_width: Real) {
        // Scatter, so not parallelized. Particle counts are small compared to the work per cell elsewhere.
        for &position in positions {
            let (x, y, z) = topology.cell_of_position(position, cell_width);
            self.phases[topology.index(x, y, z)] = Phase::Water;
        }
    }

    pub fn swap_velocities(&mut self) {
        std::mem::swap(&mut self.velocities, &mut self.next_velocities);
    }

    /// Forces all masked cells to solid and zeroes their velocity, regardless of what classification said before.
    pub fn enforce_solid_boundary(&mut self, solid_mask: &[bool]) {
        assert_eq!(solid_mask.len(), self.len());
        self.phases
            .par_iter_mut()
            .zip(self.velocities.par_iter_mut())
            .zip(solid_mask.par_iter())
            .for_each(|((phase, velocity), &solid)| {
                if solid {
                    *phase = Phase::Solid;
                    *velocity = Vector::zero();
                }
            });
    }

    pub fn zero_solid_velocities(&mut self) {
        self.velocities
            .par_iter_mut()
            .zip(self.phases.par_iter())
            .for_each(|(velocity, &phase)| {
                if phase == Phase::Solid {
                    *velocity = Vector::zero();
                }
            });
    }

    /// Replaces non-finite velocities with zero and clamps speeds above `max_speed`.
    /// Returns the number of cells that had to be fixed up.
    pub fn sanitize_velocities(&mut self, max_speed: Real) -> usize {
        let max_speed_sq = max_speed * max_speed;
        self.velocities
            .par_iter_mut()
            .map(|velocity| {
                if !(velocity.x.is_finite() && velocity.y.is_finite() && velocity.z.is_finite()) {
                    *velocity = Vector::zero();
                    1_usize
                } else if velocity.magnitude2() > max_speed_sq {
                    *velocity = velocity.normalize_to(max_speed);
                    1
                } else {
                    0
                }
            })
            .sum()
    }
}

/// Cells forced solid every tick: the outer shell of the grid plus all obstacle boxes.
pub fn solid_boundary_mask(topology: &GridTopology, obstacles: &[ObstacleBox]) -> Vec<bool> {
    (0..topology.num_cells())
        .map(|i| {
            let (x, y, z) = topology.coordinates(i);
            topology.is_on_shell(x, y, z) || obstacles.iter().any(|obstacle| obstacle.contains(x, y, z))
        })
        .collect()
}
