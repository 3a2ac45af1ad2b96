use super::super::cellfield::{CellField, Phase, LAYER_UNKNOWN};
use super::super::gridtopology::GridTopology;
use crate::units::*;
use cgmath::prelude::*;
use rayon::prelude::*;

/// Extends the velocity field outwards from the water region, one layer of cells per pass.
///
/// Water cells are layer 0. In pass `k`, every cell without a layer that touches a cell with a layer gets the
/// average velocity of those neighbors and becomes layer `k`. Cells further than `passes` steps away keep their velocity.
/// Solid cells take part as well, the solver zeroes them afterwards.
pub fn extrapolate_velocities(cells: &mut CellField, topology: &GridTopology, passes: usize) {
    microprofile::scope!("stages", "extrapolate_velocities");

    cells
        .layers
        .par_iter_mut()
        .zip(cells.phases.par_iter())
        .for_each(|(layer, &phase)| *layer = if phase == Phase::Water { 0 } else { LAYER_UNKNOWN });

    let mut next_layers = cells.layers.clone();
    for pass in 1..=passes {
        let layers = &cells.layers;
        let velocities = &cells.velocities;
        cells
            .next_velocities
            .par_iter_mut()
            .zip(next_layers.par_iter_mut())
            .enumerate()
            .for_each(|(i, (next_velocity, next_layer))| {
                *next_velocity = velocities[i];
                *next_layer = layers[i];
                if layers[i] != LAYER_UNKNOWN {
                    return;
                }

                let (x, y, z) = topology.coordinates(i);
                let mut sum = Vector::zero();
                let mut count = 0;
                for direction in 0..6 {
                    if let Some(n) = topology.neighbor(x, y, z, direction) {
                        if layers[n] != LAYER_UNKNOWN {
                            sum += velocities[n];
                            count += 1;
                        }
                    }
                }
                if count > 0 {
                    *next_velocity = sum / count as Real;
                    *next_layer = pass as u32;
                }
            });

        std::mem::swap(&mut cells.layers, &mut next_layers);
        cells.swap_velocities();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manhattan_distance(a: (usize, usize, usize), b: (usize, usize, usize)) -> usize {
        let d = |a: usize, b: usize| if a > b { a - b } else { b - a };
        d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
    }

    #[test]
    fn velocity_spreads_one_layer_per_pass() {
        let topology = GridTopology::new(9, 9, 9);
        let mut cells = CellField::new(topology.num_cells());
        let source = (4, 4, 4);
        let water = topology.index(source.0, source.1, source.2);
        cells.phases[water] = Phase::Water;
        cells.velocities[water] = Vector::new(0.0, -2.0, 1.0);

        extrapolate_velocities(&mut cells, &topology, 2);

        for i in 0..topology.num_cells() {
            let distance = manhattan_distance(topology.coordinates(i), source);
            if distance <= 2 {
                assert_eq!(cells.layers[i], distance as u32);
                assert_ne!(cells.velocities[i], Vector::zero(), "cell {:?}", topology.coordinates(i));
            } else {
                assert_eq!(cells.layers[i], LAYER_UNKNOWN);
                assert_eq!(cells.velocities[i], Vector::zero());
            }
        }
        // first layer only sees the source
        assert_eq!(cells.velocities[topology.index(5, 4, 4)], Vector::new(0.0, -2.0, 1.0));
    }

    #[test]
    fn water_velocities_are_untouched() {
        let topology = GridTopology::new(4, 4, 4);
        let mut cells = CellField::new(topology.num_cells());
        let a = topology.index(1, 1, 1);
        let b = topology.index(2, 1, 1);
        cells.phases[a] = Phase::Water;
        cells.phases[b] = Phase::Water;
        cells.velocities[a] = Vector::new(1.0, 0.0, 0.0);
        cells.velocities[b] = Vector::new(3.0, 0.0, 0.0);

        extrapolate_velocities(&mut cells, &topology, 3);

        assert_eq!(cells.velocities[a], Vector::new(1.0, 0.0, 0.0));
        assert_eq!(cells.velocities[b], Vector::new(3.0, 0.0, 0.0));
        // (1, 1, 0) touches only a
        assert_eq!(cells.velocities[topology.index(1, 1, 0)], Vector::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn zero_passes_is_a_no_op() {
        let topology = GridTopology::new(3, 3, 3);
        let mut cells = CellField::new(topology.num_cells());
        cells.phases[13] = Phase::Water;
        cells.velocities[13] = Vector::new(1.0, 1.0, 1.0);
        extrapolate_velocities(&mut cells, &topology, 0);
        assert_eq!(cells.velocities.iter().filter(|v| **v != Vector::zero()).count(), 1);
    }
}
