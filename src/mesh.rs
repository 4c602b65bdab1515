// src/mesh.rs
//
// Cuboid lattice of simulation sites.
//
// Sites are cell centers, enumerated row-major with x fastest, then y, then z.
// Positions are in mesh units (multiples of dx/dy/dz); `unit_length` converts
// them to meters where physical distances matter (dipolar sums, OVF output).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("cell counts must be positive: nx={nx}, ny={ny}, nz={nz}")]
    BadCounts { nx: usize, ny: usize, nz: usize },
    #[error("cell spacings must be positive and finite: dx={dx}, dy={dy}, dz={dz}")]
    BadSpacings { dx: f64, dy: f64, dz: f64 },
    #[error("unit length must be positive and finite: {0}")]
    BadUnitLength(f64),
}

/// Simple 3D cuboid mesh.
#[derive(Debug, Clone, Copy)]
pub struct CuboidMesh {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    /// Length of one mesh unit in meters (e.g. 1e-9 for nm-scaled meshes).
    pub unit_length: f64,
}

/// Unit bond directions for the six nearest neighbours, in the slot order
/// returned by [`CuboidMesh::neighbors`]: -x, +x, -y, +y, -z, +z.
pub const BOND_DIRS: [[f64; 3]; 6] = [
    [-1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, -1.0],
    [0.0, 0.0, 1.0],
];

impl CuboidMesh {
    /// Create a new mesh with nx × ny × nz cells, spacings dx, dy, dz and a
    /// unit-length scale. All inputs are validated up front.
    pub fn new(
        nx: usize,
        ny: usize,
        nz: usize,
        dx: f64,
        dy: f64,
        dz: f64,
        unit_length: f64,
    ) -> Result<Self, MeshError> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(MeshError::BadCounts { nx, ny, nz });
        }
        if !(dx > 0.0 && dx.is_finite() && dy > 0.0 && dy.is_finite() && dz > 0.0 && dz.is_finite())
        {
            return Err(MeshError::BadSpacings { dx, dy, dz });
        }
        if !(unit_length > 0.0 && unit_length.is_finite()) {
            return Err(MeshError::BadUnitLength(unit_length));
        }
        Ok(Self {
            nx,
            ny,
            nz,
            dx,
            dy,
            dz,
            unit_length,
        })
    }

    /// Total number of sites.
    pub fn n_sites(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Convert (i, j, k) indices to a flat index into a 1D array.
    #[inline]
    pub fn idx(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(i < self.nx && j < self.ny && k < self.nz);
        (k * self.ny + j) * self.nx + i
    }

    /// Inverse of [`idx`](Self::idx).
    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize, usize) {
        debug_assert!(idx < self.n_sites());
        let i = idx % self.nx;
        let j = (idx / self.nx) % self.ny;
        let k = idx / (self.nx * self.ny);
        (i, j, k)
    }

    /// Cell-center position of site (i, j, k) in mesh units.
    #[inline]
    pub fn pos(&self, i: usize, j: usize, k: usize) -> [f64; 3] {
        [
            (i as f64 + 0.5) * self.dx,
            (j as f64 + 0.5) * self.dy,
            (k as f64 + 0.5) * self.dz,
        ]
    }

    /// Cell-center position of a flat site index in mesh units.
    #[inline]
    pub fn pos_of(&self, idx: usize) -> [f64; 3] {
        let (i, j, k) = self.coords(idx);
        self.pos(i, j, k)
    }

    /// Flat indices of the six nearest neighbours of `idx` (open boundaries),
    /// slot order -x, +x, -y, +y, -z, +z to match [`BOND_DIRS`].
    #[inline]
    pub fn neighbors(&self, idx: usize) -> [Option<usize>; 6] {
        let (i, j, k) = self.coords(idx);
        [
            (i > 0).then(|| self.idx(i - 1, j, k)),
            (i + 1 < self.nx).then(|| self.idx(i + 1, j, k)),
            (j > 0).then(|| self.idx(i, j - 1, k)),
            (j + 1 < self.ny).then(|| self.idx(i, j + 1, k)),
            (k > 0).then(|| self.idx(i, j, k - 1)),
            (k + 1 < self.nz).then(|| self.idx(i, j, k + 1)),
        ]
    }
}
