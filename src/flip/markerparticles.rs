use super::config::SpawnRegion;
use crate::units::*;
use cgmath::prelude::*;
use rand::Rng;

/// Massless tracer particles. They mark which cells hold water and are moved along the grid velocity.
#[derive(Default)]
pub struct MarkerParticles {
    pub positions: Vec<Point>,
}

impl MarkerParticles {
    pub fn new() -> MarkerParticles {
        MarkerParticles { positions: Vec::new() }
    }

    /// `count` particles uniformly distributed in `region`.
    pub fn new_random(count: usize, region: &SpawnRegion, rng: &mut impl Rng) -> MarkerParticles {
        let mut particles = MarkerParticles::new();
        particles.add_random(count, region, rng);
        particles
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn add_random(&mut self, count: usize, region: &SpawnRegion, rng: &mut impl Rng) {
        let min = Vector::from(region.min);
        let size = Vector::from(region.max) - min;
        self.positions.reserve(count);
        for _ in 0..count {
            let offset = rng.gen::<Vector>().mul_element_wise(size);
            self.positions.push(Point::from_vec(min + offset));
        }
    }

    /// Fills a box with a lattice of particles, `spacing` apart.
    /// - `jitter`: Amount of jitter. 0 for perfect lattice. >1 and particles are no longer in a strict lattice.
    pub fn add_fluid_box(&mut self, min: Point, max: Point, spacing: Real, jitter_amount: Real, rng: &mut impl Rng) {
        let size = max - min;
        let num_x = std::cmp::max(1, (size.x / spacing) as usize);
        let num_y = std::cmp::max(1, (size.y / spacing) as usize);
        let num_z = std::cmp::max(1, (size.z / spacing) as usize);
        self.positions.reserve(num_x * num_y * num_z);

        let step = Vector::new(size.x / num_x as Real, size.y / num_y as Real, size.z / num_z as Real);
        for z in 0..num_z {
            for y in 0..num_y {
                for x in 0..num_x {
                    // centered in its lattice cell, then jittered within it
                    let jitter = (rng.gen::<Vector>() - Vector::new(0.5, 0.5, 0.5)).mul_element_wise(step) * jitter_amount;
                    let lattice = Vector::new(x as Real + 0.5, y as Real + 0.5, z as Real + 0.5).mul_element_wise(step);
                    self.positions.push(min + lattice + jitter);
                }
            }
        }
    }

    /// Clamps every particle into [0, extent]. Non-finite coordinates end up at 0.
    pub fn clamp_to_domain(&mut self, extent: Vector) {
        for position in self.positions.iter_mut() {
            *position = clamp_point(*position, extent);
        }
    }
}

#[inline]
pub(crate) fn clamp_point(position: Point, extent: Vector) -> Point {
    Point::new(
        clamp(position.x, 0.0, extent.x),
        clamp(position.y, 0.0, extent.y),
        clamp(position.z, 0.0, extent.z),
    )
}

// Unlike Real::clamp, NaN maps to min.
#[inline]
fn clamp(v: Real, min: Real, max: Real) -> Real {
    if !(v >= min) {
        min
    } else if v > max {
        max
    } else {
        v
    }
}
