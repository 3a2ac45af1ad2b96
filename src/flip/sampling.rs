use super::gridtopology::GridTopology;
use crate::units::*;
use cgmath::prelude::*;

/// Velocity of a cell by signed coordinates. Cells outside of the grid count as solid, i.e. zero velocity.
#[inline]
fn velocity_at(topology: &GridTopology, velocities: &[Vector], x: i64, y: i64, z: i64) -> Vector {
    if x < 0 || y < 0 || z < 0 || x >= topology.size_x() as i64 || y >= topology.size_y() as i64 || z >= topology.size_z() as i64 {
        Vector::zero()
    } else {
        velocities[topology.index(x as usize, y as usize, z as usize)]
    }
}

/// Trilinear interpolation of the per-cell velocities at a world space position.
///
/// Velocities live at cell centers, so a position at a cell center returns exactly that cell's velocity.
pub fn sample_velocity(topology: &GridTopology, velocities: &[Vector], cell_width: Real, position: Point) -> Vector {
    let grid_position = position.to_vec() / cell_width - Vector::new(0.5, 0.5, 0.5);
    let base = Vector::new(grid_position.x.floor(), grid_position.y.floor(), grid_position.z.floor());
    let t = grid_position - base;
    let (bx, by, bz) = (base.x as i64, base.y as i64, base.z as i64);

    let mut result = Vector::zero();
    for corner in 0..8 {
        let (dx, dy, dz) = (corner & 1, (corner >> 1) & 1, (corner >> 2) & 1);
        let weight = (if dx == 1 { t.x } else { 1.0 - t.x }) * (if dy == 1 { t.y } else { 1.0 - t.y }) * (if dz == 1 { t.z } else { 1.0 - t.z });
        if weight == 0.0 {
            continue;
        }
        result += velocity_at(topology, velocities, bx + dx, by + dy, bz + dz) * weight;
    }
    result
}

/// True if the position lies within the closed domain box [0, size * cell_width].
pub fn is_inside_domain(topology: &GridTopology, cell_width: Real, position: Point) -> bool {
    let extent = topology.extent(cell_width);
    (0..3).all(|axis| position[axis] >= 0.0 && position[axis] <= extent[axis])
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::*;

    fn ramp_field(topology: &GridTopology) -> Vec<Vector> {
        (0..topology.num_cells())
            .map(|i| {
                let (x, y, z) = topology.coordinates(i);
                Vector::new(x as Real, y as Real * 2.0, z as Real * -1.0)
            })
            .collect()
    }

    #[test]
    fn sampling_at_cell_center_is_exact() {
        let topology = GridTopology::new(4, 3, 5);
        let velocities = ramp_field(&topology);
        for i in 0..topology.num_cells() {
            let (x, y, z) = topology.coordinates(i);
            let center = topology.cell_center(x, y, z, 0.5);
            assert_eq!(sample_velocity(&topology, &velocities, 0.5, center), velocities[i]);
        }
    }

    #[test]
    fn sampling_is_linear_between_centers() {
        let topology = GridTopology::new(4, 4, 4);
        let velocities = ramp_field(&topology);
        let sample = sample_velocity(&topology, &velocities, 1.0, Point::new(2.0, 1.75, 2.25));
        assert_lt!((sample - Vector::new(1.5, 2.5, -1.75)).magnitude(), 1.0e-5);
    }

    #[test]
    fn outside_of_grid_counts_as_zero() {
        let topology = GridTopology::new(2, 2, 2);
        let velocities = vec![Vector::new(1.0, 0.0, 0.0); topology.num_cells()];
        // Halfway between the center of cell 0 and the (virtual) cell at x = -1.
        let sample = sample_velocity(&topology, &velocities, 1.0, Point::new(0.0, 0.5, 0.5));
        assert_lt!((sample.x - 0.5).abs(), 1.0e-6);
    }

    #[test]
    fn domain_test() {
        let topology = GridTopology::new(2, 3, 4);
        assert!(is_inside_domain(&topology, 1.0, Point::new(2.0, 0.0, 4.0)));
        assert!(!is_inside_domain(&topology, 1.0, Point::new(2.1, 0.0, 1.0)));
        assert!(!is_inside_domain(&topology, 1.0, Point::new(1.0, -0.1, 1.0)));
    }
}
