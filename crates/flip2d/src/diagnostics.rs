//! Diagnostic measurements used by tests and the frame runner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::particle::Particles;
use crate::pressure::fluid_divergence;
use crate::FluidSimulator;

/// Mean particle position, or `None` without particles.
pub fn centroid(particles: &Particles) -> Option<Vec2> {
    if particles.is_empty() {
        return None;
    }
    let sum: Vec2 = particles.positions.iter().copied().sum();
    Some(sum / particles.len() as f32)
}

/// Total kinetic energy with unit particle mass: KE = 1/2 * sum(|v|^2)
pub fn kinetic_energy(particles: &Particles) -> f32 {
    particles
        .velocities
        .iter()
        .map(|v| 0.5 * v.length_squared())
        .sum()
}

/// Largest particle speed.
pub fn max_speed(particles: &Particles) -> f32 {
    particles
        .velocities
        .iter()
        .map(|v| v.length())
        .fold(0.0, f32::max)
}

/// Snapshot of simulation health after a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    pub frame: u64,
    pub particle_count: usize,
    pub fluid_cells: usize,
    pub centroid: [f32; 2],
    pub kinetic_energy: f32,
    pub max_speed: f32,
    /// Sum of |divergence| over Fluid cells
    pub divergence: f32,
    pub rest_density: Option<f32>,
}

impl FrameStats {
    pub fn measure(sim: &FluidSimulator, frame: u64) -> Self {
        let centroid = centroid(&sim.particles).unwrap_or(Vec2::ZERO);
        Self {
            frame,
            particle_count: sim.particle_count(),
            fluid_cells: sim.grid.fluid_cell_count(),
            centroid: centroid.to_array(),
            kinetic_energy: kinetic_energy(&sim.particles),
            max_speed: max_speed(&sim.particles),
            divergence: fluid_divergence(&sim.grid),
            rest_density: sim.density.rest_density(),
        }
    }
}
