use super::gridtopology::GridTopology;
use crate::units::*;

pub type ColumnIndex = u32;

/// Column sentinel for a stencil entry without neighbor (grid border or solid).
pub const NO_NEIGHBOR: ColumnIndex = ColumnIndex::MAX;

/// Diagonal first, then one coefficient per stencil direction.
pub const COEFFS_PER_ROW: usize = 7;
pub const NEIGHBORS_PER_ROW: usize = 6;

/// Linear system `A x = b` of the pressure Poisson problem on one grid level.
///
/// `A` is stored row-major as a fixed 7-point stencil:
/// `coeffs[row * 7]` is the diagonal, `coeffs[row * 7 + 1 + k]` belongs to column `col_index[row * 6 + k]`.
pub struct SparseSystem {
    level: usize,
    topology: GridTopology,

    pub coeffs: Vec<Real>,
    pub col_index: Vec<ColumnIndex>,
    pub rhs: Vec<Real>,
    pub solution: Vec<Real>,
}

impl SparseSystem {
    pub fn new(level: usize, topology: GridTopology) -> SparseSystem {
        let num_rows = topology.num_cells();
        assert!(num_rows < NO_NEIGHBOR as usize);
        let mut system = SparseSystem {
            level,
            topology,
            coeffs: vec![0.0; num_rows * COEFFS_PER_ROW],
            col_index: vec![NO_NEIGHBOR; num_rows * NEIGHBORS_PER_ROW],
            rhs: vec![0.0; num_rows],
            solution: vec![0.0; num_rows],
        };
        for row in 0..num_rows {
            system.coeffs[row * COEFFS_PER_ROW] = 1.0;
        }
        system
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    pub fn num_rows(&self) -> usize {
        self.rhs.len()
    }

    pub fn diagonal(&self, row: usize) -> Real {
        self.coeffs[row * COEFFS_PER_ROW]
    }

    /// Cold start for the next solve.
    pub fn zero_solution(&mut self) {
        self.solution.iter_mut().for_each(|x| *x = 0.0);
    }

    #[inline]
    fn off_diagonal_product(coeffs: &[Real], columns: &[ColumnIndex], x: &[Real]) -> Real {
        let mut sum = 0.0;
        for (coefficient, &column) in coeffs.iter().zip(columns.iter()) {
            if column != NO_NEIGHBOR {
                sum += coefficient * x[column as usize];
            }
        }
        sum
    }

    /// One in-place sweep in row order. Later rows see the values earlier rows wrote during the same sweep.
    pub fn gauss_seidel_sweep(&mut self) {
        for row in 0..self.num_rows() {
            let coeffs = &self.coeffs[row * COEFFS_PER_ROW..(row + 1) * COEFFS_PER_ROW];
            let columns = &self.col_index[row * NEIGHBORS_PER_ROW..(row + 1) * NEIGHBORS_PER_ROW];
            debug_assert!(coeffs[0] >= 1.0);
            let sum = Self::off_diagonal_product(&coeffs[1..], columns, &self.solution);
            self.solution[row] = (self.rhs[row] - sum) / coeffs[0];
        }
    }

    /// Runs exactly `iterations` sweeps. There is no convergence check.
    pub fn gauss_seidel(&mut self, iterations: usize) {
        microprofile::scope!("SparseSystem", "gauss_seidel");
        for _ in 0..iterations {
            self.gauss_seidel_sweep();
        }
    }

    /// Euclidean norm of `b - A x` for the current solution.
    pub fn residual_norm(&self) -> Real {
        let mut sum_sq = 0.0;
        for row in 0..self.num_rows() {
            let coeffs = &self.coeffs[row * COEFFS_PER_ROW..(row + 1) * COEFFS_PER_ROW];
            let columns = &self.col_index[row * NEIGHBORS_PER_ROW..(row + 1) * NEIGHBORS_PER_ROW];
            let ax = coeffs[0] * self.solution[row] + Self::off_diagonal_product(&coeffs[1..], columns, &self.solution);
            let r = self.rhs[row] - ax;
            sum_sq += r * r;
        }
        sum_sq.sqrt()
    }
}
