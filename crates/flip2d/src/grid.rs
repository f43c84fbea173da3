//! 2D MAC (Marker-and-Cell) staggered grid for the tank.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Cell classification for pressure solve.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum CellType {
    /// Contains fluid particles
    Fluid,
    /// Empty air
    #[default]
    Air,
    /// Solid wall or obstacle (no flow)
    Solid,
}

/// 2D MAC grid with staggered velocities.
///
/// Velocity components are stored on cell faces, one entry per cell:
/// - `u[i,j]` (X-velocity) on the left face of cell (i,j), at x = i * h
/// - `v[i,j]` (Y-velocity) on the bottom face of cell (i,j), at y = j * h
///
/// The faces on the far right and top edge of the domain have no entry. They
/// belong to the border ring, which is always solid, so nothing reads them.
///
/// Pressure, openness, cell type and color are stored at cell centers.
/// All arrays are row-major: `index = j * nx + i`.
#[derive(Clone, Debug)]
pub struct Grid {
    /// Number of cells in X direction
    pub nx: usize,
    /// Number of cells in Y direction
    pub ny: usize,
    /// Edge length of a (square) cell
    pub h: f32,
    inv_h: f32,

    /// U velocity on left faces
    pub u: Vec<f32>,
    /// V velocity on bottom faces
    pub v: Vec<f32>,
    /// Snapshot of `u` taken before a transfer or pressure solve
    pub prev_u: Vec<f32>,
    /// Snapshot of `v` taken before a transfer or pressure solve
    pub prev_v: Vec<f32>,
    /// Accumulated P2G weights for `u`
    pub du: Vec<f32>,
    /// Accumulated P2G weights for `v`
    pub dv: Vec<f32>,

    /// Pressure at cell centers
    pub p: Vec<f32>,
    /// Openness per cell: 0.0 = solid, 1.0 = open
    pub s: Vec<f32>,
    /// Cell classification (Fluid/Air/Solid)
    pub cell_type: Vec<CellType>,
    /// Visualization color per cell
    pub cell_color: Vec<Vec3>,
}

impl Grid {
    /// Create a grid covering a `width` x `height` tank with the requested
    /// target spacing.
    ///
    /// The cell count per axis is `floor(dim / spacing) + 1` and the actual
    /// spacing is widened to `max(width / nx, height / ny)` so cells stay square.
    /// All cells start open; call [`Grid::seal_border`] to build the tank walls.
    pub fn for_tank(width: f32, height: f32, spacing: f32) -> SimResult<Self> {
        if !(width > 0.0 && width.is_finite()) {
            return Err(SimError::NonPositiveDimension {
                name: "width",
                value: width,
            });
        }
        if !(height > 0.0 && height.is_finite()) {
            return Err(SimError::NonPositiveDimension {
                name: "height",
                value: height,
            });
        }
        if !(spacing > 0.0 && spacing.is_finite()) {
            return Err(SimError::InvalidSpacing(spacing));
        }

        let nx = (width / spacing).floor() as usize + 1;
        let ny = (height / spacing).floor() as usize + 1;
        let h = (width / nx as f32).max(height / ny as f32);
        Self::new(nx, ny, h)
    }

    /// Create a grid with explicit cell counts and cell size.
    pub fn new(nx: usize, ny: usize, h: f32) -> SimResult<Self> {
        if !(h > 0.0 && h.is_finite()) {
            return Err(SimError::InvalidSpacing(h));
        }
        if nx < 3 || ny < 3 {
            return Err(SimError::GridTooSmall { nx, ny });
        }

        let cell_count = nx * ny;
        Ok(Self {
            nx,
            ny,
            h,
            inv_h: 1.0 / h,
            u: vec![0.0; cell_count],
            v: vec![0.0; cell_count],
            prev_u: vec![0.0; cell_count],
            prev_v: vec![0.0; cell_count],
            du: vec![0.0; cell_count],
            dv: vec![0.0; cell_count],
            p: vec![0.0; cell_count],
            s: vec![1.0; cell_count],
            cell_type: vec![CellType::Air; cell_count],
            cell_color: vec![Vec3::ZERO; cell_count],
        })
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny
    }

    #[inline]
    pub fn inv_h(&self) -> f32 {
        self.inv_h
    }

    /// World size of the lattice.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.nx as f32 * self.h, self.ny as f32 * self.h)
    }

    /// Index into cell-centered and face arrays.
    #[inline]
    pub fn cell_index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.nx && j < self.ny);
        j * self.nx + i
    }

    #[inline]
    pub fn is_border(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i == self.nx - 1 || j == self.ny - 1
    }

    /// Center of cell (i,j) in world space.
    #[inline]
    pub fn cell_center(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new((i as f32 + 0.5) * self.h, (j as f32 + 0.5) * self.h)
    }

    /// Nearest cell containing `pos`, clamped into the lattice.
    #[inline]
    pub fn pos_to_cell(&self, pos: Vec2) -> (usize, usize) {
        let i = ((pos.x * self.inv_h).floor() as i64).clamp(0, self.nx as i64 - 1);
        let j = ((pos.y * self.inv_h).floor() as i64).clamp(0, self.ny as i64 - 1);
        (i as usize, j as usize)
    }

    /// Close the border ring. Border cells stay solid for the grid's lifetime.
    pub fn seal_border(&mut self) {
        for j in 0..self.ny {
            for i in 0..self.nx {
                let idx = self.cell_index(i, j);
                self.s[idx] = if self.is_border(i, j) { 0.0 } else { 1.0 };
            }
        }
    }

    #[inline]
    pub fn is_solid(&self, i: usize, j: usize) -> bool {
        self.s[self.cell_index(i, j)] == 0.0
    }

    /// Reset every cell to Solid or Air from its openness.
    pub fn reset_cell_types(&mut self) {
        for (cell, &s) in self.cell_type.iter_mut().zip(&self.s) {
            *cell = if s == 0.0 { CellType::Solid } else { CellType::Air };
        }
    }

    /// Promote the cell containing `pos` to Fluid if it is Air.
    ///
    /// Solid cells are never promoted.
    #[inline]
    pub fn mark_fluid(&mut self, pos: Vec2) {
        let (i, j) = self.pos_to_cell(pos);
        let idx = self.cell_index(i, j);
        if self.cell_type[idx] == CellType::Air {
            self.cell_type[idx] = CellType::Fluid;
        }
    }

    /// Copy the current face velocities into `prev_u` / `prev_v`.
    pub fn store_old_velocities(&mut self) {
        self.prev_u.copy_from_slice(&self.u);
        self.prev_v.copy_from_slice(&self.v);
    }

    /// Number of cells currently classified as Fluid.
    pub fn fluid_cell_count(&self) -> usize {
        self.cell_type
            .iter()
            .filter(|&&c| c == CellType::Fluid)
            .count()
    }
}
