use crate::units::*;

/// Offsets of the 6-point stencil.
/// The order (-x, +x, -y, +y, -z, +z) is also the column order of the pressure matrix rows.
pub const NEIGHBOR_OFFSETS: [[i32; 3]; 6] = [[-1, 0, 0], [1, 0, 0], [0, -1, 0], [0, 1, 0], [0, 0, -1], [0, 0, 1]];

/// Maps integer cell coordinates to linear cell indices and back.
///
/// Cells are laid out x-fastest, then y, then z:
/// `index = z * (size_x * size_y) + y * size_x + x`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridTopology {
    size_x: usize,
    size_y: usize,
    size_z: usize,
}

impl GridTopology {
    pub fn new(size_x: usize, size_y: usize, size_z: usize) -> GridTopology {
        assert!(size_x > 0 && size_y > 0 && size_z > 0, "grid dimensions need to be positive");
        GridTopology { size_x, size_y, size_z }
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    pub fn size_z(&self) -> usize {
        self.size_z
    }

    pub fn size(&self) -> [usize; 3] {
        [self.size_x, self.size_y, self.size_z]
    }

    pub fn num_cells(&self) -> usize {
        self.size_x * self.size_y * self.size_z
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        assert!(
            x < self.size_x && y < self.size_y && z < self.size_z,
            "cell ({}, {}, {}) is out of range for a {}x{}x{} grid",
            x,
            y,
            z,
            self.size_x,
            self.size_y,
            self.size_z
        );
        z * (self.size_x * self.size_y) + y * self.size_x + x
    }

    #[inline]
    pub fn coordinates(&self, index: usize) -> (usize, usize, usize) {
        assert!(
            index < self.num_cells(),
            "cell index {} is out of range for a grid with {} cells",
            index,
            self.num_cells()
        );
        let slice = self.size_x * self.size_y;
        let z = index / slice;
        let rest = index - z * slice;
        let y = rest / self.size_x;
        let x = rest % self.size_x;
        (x, y, z)
    }

    /// Linear index of the neighbor in stencil direction `direction` (see [`NEIGHBOR_OFFSETS`]).
    /// None if the neighbor lies outside of the grid.
    #[inline]
    pub fn neighbor(&self, x: usize, y: usize, z: usize, direction: usize) -> Option<usize> {
        let [dx, dy, dz] = NEIGHBOR_OFFSETS[direction];
        let nx = Self::offset(x, dx, self.size_x)?;
        let ny = Self::offset(y, dy, self.size_y)?;
        let nz = Self::offset(z, dz, self.size_z)?;
        Some(self.index(nx, ny, nz))
    }

    #[inline]
    fn offset(coordinate: usize, delta: i32, size: usize) -> Option<usize> {
        let shifted = coordinate as i64 + delta as i64;
        if shifted < 0 || shifted >= size as i64 {
            None
        } else {
            Some(shifted as usize)
        }
    }

    /// True for cells on the outer shell of the grid.
    pub fn is_on_shell(&self, x: usize, y: usize, z: usize) -> bool {
        x == 0 || y == 0 || z == 0 || x + 1 == self.size_x || y + 1 == self.size_y || z + 1 == self.size_z
    }

    /// World space extent of the grid, i.e. the upper corner of the domain.
    pub fn extent(&self, cell_width: Real) -> Vector {
        Vector::new(
            self.size_x as Real * cell_width,
            self.size_y as Real * cell_width,
            self.size_z as Real * cell_width,
        )
    }

    pub fn cell_center(&self, x: usize, y: usize, z: usize, cell_width: Real) -> Point {
        Point::new(
            (x as Real + 0.5) * cell_width,
            (y as Real + 0.5) * cell_width,
            (z as Real + 0.5) * cell_width,
        )
    }

    /// Cell containing a world space position, clamped to the grid.
    #[inline]
    pub fn cell_of_position(&self, position: Point, cell_width: Real) -> (usize, usize, usize) {
        let clamp_axis = |p: Real, size: usize| -> usize {
            let cell = (p / cell_width).floor();
            // NaN fails both comparisons and ends up in cell 0
            if cell >= size as Real {
                size - 1
            } else if cell >= 0.0 {
                cell as usize
            } else {
                0
            }
        };
        (
            clamp_axis(position.x, self.size_x),
            clamp_axis(position.y, self.size_y),
            clamp_axis(position.z, self.size_z),
        )
    }

    /// Topology of the next coarser grid level (every dimension halved, at least one cell).
    pub fn coarsened(&self) -> GridTopology {
        GridTopology::new(
            std::cmp::max(1, self.size_x / 2),
            std::cmp::max(1, self.size_y / 2),
            std::cmp::max(1, self.size_z / 2),
        )
    }
}
