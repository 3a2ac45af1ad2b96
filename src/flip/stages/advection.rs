use super::super::gridtopology::GridTopology;
use super::super::markerparticles::{clamp_point, MarkerParticles};
use super::super::sampling::sample_velocity;
use crate::units::*;
use rayon::prelude::*;

/// Moves every particle with the interpolated grid velocity (explicit Euler), then clamps it into the domain box.
pub fn advect_particles(particles: &mut MarkerParticles, velocities: &[Vector], topology: &GridTopology, cell_width: Real, dt: Real) {
    microprofile::scope!("stages", "advect_particles");
    let extent = topology.extent(cell_width);
    particles.positions.par_iter_mut().for_each(|position| {
        let velocity = sample_velocity(topology, velocities, cell_width, *position);
        *position = clamp_point(*position + velocity * dt, extent);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::prelude::*;
    use more_asserts::*;

    #[test]
    fn particles_follow_uniform_field() {
        let topology = GridTopology::new(4, 4, 4);
        let velocities = vec![Vector::new(0.5, 0.0, -0.25); topology.num_cells()];
        let mut particles = MarkerParticles {
            positions: vec![Point::new(2.0, 2.0, 2.0)],
        };
        advect_particles(&mut particles, &velocities, &topology, 1.0, 0.5);
        assert_lt!((particles.positions[0] - Point::new(2.25, 2.0, 1.875)).magnitude(), 1.0e-6);
    }

    #[test]
    fn particles_never_leave_the_domain() {
        let topology = GridTopology::new(4, 4, 4);
        let velocities = vec![Vector::new(100.0, -100.0, Real::NAN); topology.num_cells()];
        let mut particles = MarkerParticles {
            positions: vec![Point::new(3.5, 0.5, 2.0), Point::new(1.0, 1.0, 1.0)],
        };
        advect_particles(&mut particles, &velocities, &topology, 1.0, 1.0);
        for p in particles.positions() {
            for axis in 0..3 {
                assert_ge!(p[axis], 0.0);
                assert_le!(p[axis], 4.0);
            }
        }
        assert_eq!(particles.positions[0].x, 4.0);
        assert_eq!(particles.positions[0].y, 0.0);
    }
}
