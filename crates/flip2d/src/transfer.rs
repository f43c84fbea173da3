//! Particle <-> grid velocity transfer (PIC/FLIP).
//!
//! P2G: splat each velocity component onto its staggered faces with bilinear
//! weights, then normalize by the accumulated weight.
//! G2P: interpolate the new grid velocity (PIC) and the change since the last
//! snapshot (FLIP), and blend the two by `flip_ratio`.
//!
//! Sample locations for each component:
//! - U: at (i*h, (j+0.5)*h), the left face of cell (i,j)
//! - V: at ((i+0.5)*h, j*h), the bottom face of cell (i,j)

use glam::Vec2;

use crate::grid::{CellType, Grid};
use crate::particle::Particles;

/// Which way velocities flow in [`transfer_velocities`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransferDirection {
    /// Rebuild the grid velocity field from the particles.
    ToGrid,
    /// Update particle velocities from the grid.
    ToParticles { flip_ratio: f32 },
}

/// Velocity component handled in one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Component {
    U,
    V,
}

impl Component {
    /// Offset of the sample lattice from the cell corner, in units of h.
    fn sample_offset(self) -> Vec2 {
        match self {
            Component::U => Vec2::new(0.0, 0.5),
            Component::V => Vec2::new(0.5, 0.0),
        }
    }

    /// Index step to the cell on the other side of this component's face.
    fn across(self, nx: usize) -> usize {
        match self {
            Component::U => 1,
            Component::V => nx,
        }
    }
}

/// Four lattice nodes surrounding a point and their bilinear weights.
///
/// Node order is (x0,y0), (x1,y0), (x1,y1), (x0,y1).
#[derive(Clone, Copy, Debug)]
pub struct Stencil {
    pub nodes: [usize; 4],
    pub weights: [f32; 4],
}

impl Stencil {
    /// Locate `pos` on a lattice shifted by `offset` (in units of h).
    ///
    /// The point is first clamped into `[h, (n-1)h]` on each axis and node
    /// indices are capped at `n-2`. For the face lattices this keeps the cell
    /// across each sampled face inside the grid.
    pub fn locate(grid: &Grid, pos: Vec2, offset: Vec2) -> Self {
        let h = grid.h;
        let inv_h = grid.inv_h();
        let (nx, ny) = (grid.nx, grid.ny);

        let x = pos.x.clamp(h, (nx - 1) as f32 * h) - offset.x * h;
        let y = pos.y.clamp(h, (ny - 1) as f32 * h) - offset.y * h;

        let x0 = ((x * inv_h).floor() as usize).min(nx - 2);
        let tx = (x - x0 as f32 * h) * inv_h;
        let x1 = (x0 + 1).min(nx - 2);

        let y0 = ((y * inv_h).floor() as usize).min(ny - 2);
        let ty = (y - y0 as f32 * h) * inv_h;
        let y1 = (y0 + 1).min(ny - 2);

        let sx = 1.0 - tx;
        let sy = 1.0 - ty;

        Self {
            nodes: [y0 * nx + x0, y0 * nx + x1, y1 * nx + x1, y1 * nx + x0],
            weights: [sx * sy, tx * sy, tx * ty, sx * ty],
        }
    }
}

/// Rebuild cell types for a new transfer.
///
/// Closed cells become Solid, everything else Air, then any Air cell holding
/// a particle becomes Fluid.
pub fn classify_cells(grid: &mut Grid, particles: &Particles) {
    grid.reset_cell_types();
    for &pos in &particles.positions {
        grid.mark_fluid(pos);
    }
}

/// Move velocities between particles and grid in the given direction.
pub fn transfer_velocities(grid: &mut Grid, particles: &mut Particles, direction: TransferDirection) {
    match direction {
        TransferDirection::ToGrid => particles_to_grid(grid, particles),
        TransferDirection::ToParticles { flip_ratio } => {
            grid_to_particles(grid, particles, flip_ratio)
        }
    }
}

/// P2G. Leaves the pre-transfer field in `prev_u` / `prev_v`.
fn particles_to_grid(grid: &mut Grid, particles: &Particles) {
    grid.store_old_velocities();
    grid.u.fill(0.0);
    grid.v.fill(0.0);
    grid.du.fill(0.0);
    grid.dv.fill(0.0);

    classify_cells(grid, particles);

    for component in [Component::U, Component::V] {
        let offset = component.sample_offset();
        for (&pos, &vel) in particles.positions.iter().zip(&particles.velocities) {
            let stencil = Stencil::locate(grid, pos, offset);
            let (field, weights, value) = match component {
                Component::U => (&mut grid.u, &mut grid.du, vel.x),
                Component::V => (&mut grid.v, &mut grid.dv, vel.y),
            };
            for (&node, &w) in stencil.nodes.iter().zip(&stencil.weights) {
                field[node] += value * w;
                weights[node] += w;
            }
        }
    }

    for (f, &w) in grid.u.iter_mut().zip(&grid.du) {
        if w > 0.0 {
            *f /= w;
        }
    }
    for (f, &w) in grid.v.iter_mut().zip(&grid.dv) {
        if w > 0.0 {
            *f /= w;
        }
    }

    restore_solid_faces(grid);
}

/// Faces touching a solid cell keep their pre-transfer velocity.
///
/// This is what carries the obstacle's stamped velocity through P2G.
fn restore_solid_faces(grid: &mut Grid) {
    let nx = grid.nx;
    for j in 0..grid.ny {
        for i in 0..nx {
            let idx = grid.cell_index(i, j);
            let solid = grid.cell_type[idx] == CellType::Solid;
            if solid || (i > 0 && grid.cell_type[idx - 1] == CellType::Solid) {
                grid.u[idx] = grid.prev_u[idx];
            }
            if solid || (j > 0 && grid.cell_type[idx - nx] == CellType::Solid) {
                grid.v[idx] = grid.prev_v[idx];
            }
        }
    }
}

/// G2P with PIC/FLIP blending.
///
/// A face sample counts only if one of the two cells sharing that face is not
/// Air. A particle with no valid sample keeps its velocity component.
fn grid_to_particles(grid: &Grid, particles: &mut Particles, flip_ratio: f32) {
    let nx = grid.nx;

    for component in [Component::U, Component::V] {
        let offset = component.sample_offset();
        let across = component.across(nx);
        let (field, prev) = match component {
            Component::U => (&grid.u, &grid.prev_u),
            Component::V => (&grid.v, &grid.prev_v),
        };

        for (&pos, vel) in particles
            .positions
            .iter()
            .zip(particles.velocities.iter_mut())
        {
            let stencil = Stencil::locate(grid, pos, offset);

            let mut total = 0.0;
            let mut pic = 0.0;
            let mut delta = 0.0;
            for (&node, &w) in stencil.nodes.iter().zip(&stencil.weights) {
                let valid = grid.cell_type[node] != CellType::Air
                    || grid.cell_type[node - across] != CellType::Air;
                if !valid {
                    continue;
                }
                total += w;
                pic += w * field[node];
                delta += w * (field[node] - prev[node]);
            }

            if total > 0.0 {
                let v = match component {
                    Component::U => &mut vel.x,
                    Component::V => &mut vel.y,
                };
                let pic_v = pic / total;
                let flip_v = *v + delta / total;
                *v = (1.0 - flip_ratio) * pic_v + flip_ratio * flip_v;
            }
        }
    }
}
