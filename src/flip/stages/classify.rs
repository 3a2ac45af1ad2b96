use super::super::cellfield::CellField;
use super::super::gridtopology::GridTopology;
use crate::units::*;

/// Recomputes all cell phases from scratch: everything becomes air, cells holding a particle become water,
/// then the solid mask is applied on top.
pub fn classify(cells: &mut CellField, topology: &GridTopology, particle_positions: &[Point], cell_width: Real, solid_mask: &[bool]) {
    microprofile::scope!("stages", "classify");
    cells.reset_to_air();
    cells.mark_water_from_particles(topology, particle_positions, cell_width);
    cells.enforce_solid_boundary(solid_mask);
}
