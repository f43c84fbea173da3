//! Density-driven visualization colors. Nothing here feeds back into physics.

use glam::Vec3;

use crate::constants::{CELL_RAMP_MAX, COLOR_DECAY_STEP, SOLID_CELL_COLOR, SURFACE_TINT};
use crate::density::DensityTracker;
use crate::grid::{CellType, Grid};
use crate::particle::Particles;

/// Drift particle colors toward blue and tint particles in thin regions.
///
/// Particles whose cell density is below `surface_threshold` times rest
/// density are set to the surface tint. Before rest density is known only the
/// drift applies.
pub fn update_particle_colors(
    particles: &mut Particles,
    grid: &Grid,
    density: &DensityTracker,
    surface_threshold: f32,
) {
    let step = Vec3::new(-COLOR_DECAY_STEP, -COLOR_DECAY_STEP, COLOR_DECAY_STEP);
    let rest = density.rest_density();
    let inv_h = grid.inv_h();

    for (color, &pos) in particles.colors.iter_mut().zip(&particles.positions) {
        *color = (*color + step).clamp(Vec3::ZERO, Vec3::ONE);

        let Some(rest) = rest else { continue };
        let i = ((pos.x * inv_h).floor() as i64).clamp(1, grid.nx as i64 - 1) as usize;
        let j = ((pos.y * inv_h).floor() as i64).clamp(1, grid.ny as i64 - 1) as usize;
        if density.density[grid.cell_index(i, j)] / rest < surface_threshold {
            *color = Vec3::from(SURFACE_TINT);
        }
    }
}

/// Color cells by type: Solid gray, Fluid on the density ramp, Air black.
pub fn update_cell_colors(grid: &mut Grid, density: &DensityTracker) {
    for (idx, color) in grid.cell_color.iter_mut().enumerate() {
        *color = match grid.cell_type[idx] {
            CellType::Solid => Vec3::from(SOLID_CELL_COLOR),
            CellType::Fluid => sci_color(density.relative(idx), 0.0, CELL_RAMP_MAX),
            CellType::Air => Vec3::ZERO,
        };
    }
}

/// Four-band scientific ramp: blue, cyan, green, yellow, red.
pub fn sci_color(value: f32, min: f32, max: f32) -> Vec3 {
    let value = value.max(min).min(max - 0.0001);
    let range = max - min;
    let t = if range == 0.0 { 0.5 } else { (value - min) / range };

    let band = (t / 0.25).floor();
    let s = (t - band * 0.25) / 0.25;

    match band as i32 {
        0 => Vec3::new(0.0, s, 1.0),
        1 => Vec3::new(0.0, 1.0, 1.0 - s),
        2 => Vec3::new(s, 1.0, 0.0),
        _ => Vec3::new(1.0, 1.0 - s, 0.0),
    }
}
