//! Read-only view of simulation output for a renderer.
//!
//! Buffers are exposed as flat `f32` slices ready for a vertex upload. The
//! view borrows the simulator, so it cannot step while a draw holds one.

use crate::obstacle::Obstacle;
use crate::FluidSimulator;

#[derive(Clone, Copy, Debug)]
pub struct RenderView<'a> {
    /// x, y per particle
    pub positions: &'a [f32],
    /// r, g, b per particle
    pub particle_colors: &'a [f32],
    /// r, g, b per cell, row-major
    pub cell_colors: &'a [f32],
    pub particle_count: usize,
    pub particle_radius: f32,
    pub nx: usize,
    pub ny: usize,
    pub h: f32,
    pub obstacle: Obstacle,
}

impl<'a> RenderView<'a> {
    pub fn new(sim: &'a FluidSimulator) -> Self {
        Self {
            positions: bytemuck::cast_slice(&sim.particles.positions),
            particle_colors: bytemuck::cast_slice(&sim.particles.colors),
            cell_colors: bytemuck::cast_slice(&sim.grid.cell_color),
            particle_count: sim.particle_count(),
            particle_radius: sim.particles.radius(),
            nx: sim.grid.nx,
            ny: sim.grid.ny,
            h: sim.grid.h,
            obstacle: sim.obstacle,
        }
    }
}
