//! Per-cell particle density and rest-density calibration.

use glam::Vec2;

use crate::grid::{CellType, Grid};
use crate::particle::Particles;
use crate::transfer::Stencil;

/// Cell-centered lattice offset, in units of h.
const CELL_CENTER: Vec2 = Vec2::new(0.5, 0.5);

/// Particle density estimate on cell centers.
///
/// `rest_density` starts unset and is fixed by the first [`update`] that sees
/// a nonzero density over Fluid cells. It is never recalibrated afterwards.
///
/// [`update`]: DensityTracker::update
#[derive(Clone, Debug)]
pub struct DensityTracker {
    /// Summed bilinear particle weight per cell
    pub density: Vec<f32>,
    rest_density: Option<f32>,
}

impl DensityTracker {
    pub fn new(cell_count: usize) -> Self {
        Self {
            density: vec![0.0; cell_count],
            rest_density: None,
        }
    }

    /// Calibrated rest density, if it has been measured.
    #[inline]
    pub fn rest_density(&self) -> Option<f32> {
        self.rest_density
    }

    /// Density of a cell relative to rest density, or the raw density while
    /// rest density is unset.
    #[inline]
    pub fn relative(&self, idx: usize) -> f32 {
        match self.rest_density {
            Some(rest) => self.density[idx] / rest,
            None => self.density[idx],
        }
    }

    /// Re-splat all particles. Cell types must be current.
    pub fn update(&mut self, grid: &Grid, particles: &Particles) {
        self.density.fill(0.0);

        for &pos in &particles.positions {
            let stencil = Stencil::locate(grid, pos, CELL_CENTER);
            for (&node, &w) in stencil.nodes.iter().zip(&stencil.weights) {
                self.density[node] += w;
            }
        }

        if self.rest_density.is_none() {
            self.calibrate(grid);
        }
    }

    fn calibrate(&mut self, grid: &Grid) {
        let mut sum = 0.0;
        let mut fluid_cells = 0usize;
        for (&d, &cell) in self.density.iter().zip(&grid.cell_type) {
            if cell == CellType::Fluid {
                sum += d;
                fluid_cells += 1;
            }
        }

        if fluid_cells > 0 && sum > 0.0 {
            let rest = sum / fluid_cells as f32;
            log::debug!(
                "rest density calibrated to {:.4} over {} fluid cells",
                rest,
                fluid_cells
            );
            self.rest_density = Some(rest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::classify_cells;

    fn setup(positions: &[Vec2]) -> (Grid, Particles) {
        let mut grid = Grid::new(8, 8, 1.0).unwrap();
        grid.seal_border();
        let mut particles = Particles::new(positions.len().max(1), 0.1).unwrap();
        for &p in positions {
            particles.spawn_at(p).unwrap();
        }
        classify_cells(&mut grid, &particles);
        (grid, particles)
    }

    #[test]
    fn test_particle_at_cell_center_lands_in_one_cell() {
        let (grid, particles) = setup(&[Vec2::new(3.5, 4.5)]);
        let mut tracker = DensityTracker::new(grid.cell_count());
        tracker.update(&grid, &particles);

        assert!((tracker.density[grid.cell_index(3, 4)] - 1.0).abs() < 1e-6);
        let total: f32 = tracker.density.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rest_density_is_set_once() {
        let (grid, particles) = setup(&[Vec2::new(3.5, 4.5), Vec2::new(3.6, 4.5)]);
        let mut tracker = DensityTracker::new(grid.cell_count());
        assert_eq!(tracker.rest_density(), None);

        tracker.update(&grid, &particles);
        let first = tracker.rest_density().unwrap();
        assert!(first > 0.0);

        let (grid, particles) = setup(&[Vec2::new(2.5, 2.5)]);
        tracker.update(&grid, &particles);
        assert_eq!(tracker.rest_density(), Some(first));
    }

    #[test]
    fn test_no_fluid_leaves_rest_density_unset() {
        let (grid, _) = setup(&[]);
        let particles = Particles::new(1, 0.1).unwrap();
        let mut tracker = DensityTracker::new(grid.cell_count());
        tracker.update(&grid, &particles);

        assert_eq!(tracker.rest_density(), None);
        assert_eq!(tracker.relative(grid.cell_index(3, 3)), 0.0);
    }
}
