//! Pressure projection for 2D incompressible flow.
//!
//! Gauss-Seidel relaxation with over-relaxation, a fixed iteration count, and
//! no convergence check. Each Fluid cell's divergence is removed by pushing
//! the correction onto its four faces, weighted by the openness of the cell
//! behind each face, so faces shared with solids never move.

use crate::density::DensityTracker;
use crate::grid::{CellType, Grid};

/// Settings for one [`solve_incompressibility`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressureSettings {
    pub iterations: usize,
    pub dt: f32,
    pub over_relaxation: f32,
    /// Subtract excess particle density from the divergence
    pub compensate_drift: bool,
    /// Fluid density (kg/m³), only scales the reported pressure
    pub fluid_density: f32,
}

/// Make the face velocity field approximately divergence free.
///
/// Pressure is zeroed and the current velocities are snapshotted into
/// `prev_u` / `prev_v` first, so after the solve the difference between the
/// two is exactly the pressure correction.
pub fn solve_incompressibility(
    grid: &mut Grid,
    density: &DensityTracker,
    settings: &PressureSettings,
) {
    grid.p.fill(0.0);
    grid.store_old_velocities();

    let nx = grid.nx;
    let cp = settings.fluid_density * grid.h / settings.dt;
    let rest_density = if settings.compensate_drift {
        density.rest_density()
    } else {
        None
    };

    for _ in 0..settings.iterations {
        for j in 1..grid.ny - 1 {
            for i in 1..nx - 1 {
                let center = grid.cell_index(i, j);
                if grid.cell_type[center] != CellType::Fluid {
                    continue;
                }

                let left = center - 1;
                let right = center + 1;
                let bottom = center - nx;
                let top = center + nx;

                let sx0 = grid.s[left];
                let sx1 = grid.s[right];
                let sy0 = grid.s[bottom];
                let sy1 = grid.s[top];
                let s = sx0 + sx1 + sy0 + sy1;
                if s == 0.0 {
                    continue;
                }

                let mut div = grid.u[right] - grid.u[center] + grid.v[top] - grid.v[center];

                // Only over-compression is corrected
                if let Some(rest) = rest_density {
                    let compression = density.density[center] - rest;
                    if compression > 0.0 {
                        div -= compression;
                    }
                }

                let p = -div / s * settings.over_relaxation;
                grid.p[center] += cp * p;

                grid.u[center] -= sx0 * p;
                grid.u[right] += sx1 * p;
                grid.v[center] -= sy0 * p;
                grid.v[top] += sy1 * p;
            }
        }
    }
}

/// Velocity divergence of an interior cell, in face-velocity units.
#[inline]
pub fn cell_divergence(grid: &Grid, i: usize, j: usize) -> f32 {
    let c = grid.cell_index(i, j);
    grid.u[c + 1] - grid.u[c] + grid.v[c + grid.nx] - grid.v[c]
}

/// Sum of absolute divergence over interior Fluid cells.
pub fn fluid_divergence(grid: &Grid) -> f32 {
    let mut total = 0.0;
    for j in 1..grid.ny - 1 {
        for i in 1..grid.nx - 1 {
            if grid.cell_type[grid.cell_index(i, j)] == CellType::Fluid {
                total += cell_divergence(grid, i, j).abs();
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(iterations: usize) -> PressureSettings {
        PressureSettings {
            iterations,
            dt: 1.0 / 60.0,
            over_relaxation: 1.0,
            compensate_drift: false,
            fluid_density: 1000.0,
        }
    }

    fn single_fluid_cell() -> (Grid, DensityTracker) {
        let mut grid = Grid::new(5, 5, 1.0).unwrap();
        grid.seal_border();
        grid.reset_cell_types();
        let c = grid.cell_index(2, 2);
        grid.cell_type[c] = CellType::Fluid;
        let tracker = DensityTracker::new(grid.cell_count());
        (grid, tracker)
    }

    #[test]
    fn test_single_cell_outflow_is_removed() {
        let (mut grid, tracker) = single_fluid_cell();
        let c = grid.cell_index(2, 2);
        grid.u[c + 1] = 1.0;

        solve_incompressibility(&mut grid, &tracker, &settings(1));

        assert!(cell_divergence(&grid, 2, 2).abs() < 1e-6);
        // The correction is split over four open faces
        assert!((grid.u[c + 1] - 0.75).abs() < 1e-6);
        assert!((grid.u[c] - 0.25).abs() < 1e-6);
        assert!(grid.p[c] < 0.0);
        // FLIP delta is the correction alone
        assert_eq!(grid.prev_u[c + 1], 1.0);
    }

    #[test]
    fn test_closed_cell_is_skipped() {
        let (mut grid, tracker) = single_fluid_cell();
        for (i, j) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            let idx = grid.cell_index(i, j);
            grid.s[idx] = 0.0;
        }
        let c = grid.cell_index(2, 2);
        grid.u[c + 1] = 1.0;

        solve_incompressibility(&mut grid, &tracker, &settings(10));

        assert_eq!(grid.u[c + 1], 1.0);
        assert_eq!(grid.p[c], 0.0);
    }

    #[test]
    fn test_drift_compensation_only_pushes_outward() {
        use crate::particle::Particles;
        use glam::Vec2;

        let (mut grid, mut tracker) = single_fluid_cell();
        let c = grid.cell_index(2, 2);
        let mut particles = Particles::new(1, 0.1).unwrap();
        particles.spawn_at(Vec2::new(2.5, 2.5)).unwrap();
        tracker.update(&grid, &particles);
        assert_eq!(tracker.rest_density(), Some(1.0));

        let mut s = settings(1);
        s.compensate_drift = true;

        // Under-dense: nothing to correct
        tracker.density[c] = 0.5;
        solve_incompressibility(&mut grid, &tracker, &s);
        assert_eq!(grid.u[c + 1], 0.0);

        // Over-dense by 2: faces open outward
        tracker.density[c] = 3.0;
        solve_incompressibility(&mut grid, &tracker, &s);
        assert!((grid.u[c + 1] - 0.5).abs() < 1e-6);
        assert!((grid.u[c] + 0.5).abs() < 1e-6);
    }
}
