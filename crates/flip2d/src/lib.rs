//! 2D PIC/FLIP Fluid Simulation
//!
//! An incompressible fluid in a closed tank, simulated with particles on a
//! staggered MAC grid and stirred by a movable circular obstacle.
//!
//! # Example
//!
//! ```
//! use flip2d::{FluidSimulator, SimParams, Vec2};
//!
//! let mut sim = FluidSimulator::new(1000.0, 1.0, 1.0, 0.1, 0.03, 16).unwrap();
//!
//! // A small block of water in the lower left corner
//! for i in 0..4 {
//!     for j in 0..4 {
//!         let pos = Vec2::new(0.2 + 0.06 * i as f32, 0.2 + 0.06 * j as f32);
//!         sim.particles.spawn_at(pos).unwrap();
//!     }
//! }
//! let params = SimParams {
//!     obstacle_radius: 0.1,
//!     ..SimParams::default()
//! };
//! sim.set_obstacle(Vec2::new(0.7, 0.7), params.obstacle_radius, true, params.dt);
//! sim.simulate(&params);
//! assert_eq!(sim.particle_count(), 16);
//! ```

pub mod advection;
pub mod color;
pub mod config;
pub mod constants;
pub mod density;
pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod obstacle;
pub mod particle;
pub mod pressure;
pub mod render;
pub mod scene;
pub mod separation;
pub mod spatial;
pub mod transfer;

pub use config::{SceneConfig, SimParams, TankConfig};
pub use density::DensityTracker;
pub use diagnostics::FrameStats;
pub use error::{SimError, SimResult};
pub use glam::{Vec2, Vec3};
pub use grid::{CellType, Grid};
pub use obstacle::Obstacle;
pub use particle::Particles;
pub use render::RenderView;
pub use scene::Scene;
pub use spatial::SpatialHash;
pub use transfer::TransferDirection;

use pressure::PressureSettings;

/// 2D FLIP fluid simulation.
///
/// All buffers are sized at construction. Stepping never allocates and never
/// fails.
#[derive(Clone, Debug)]
pub struct FluidSimulator {
    /// The MAC grid for pressure and velocity
    pub grid: Grid,
    /// Fluid particles
    pub particles: Particles,
    /// Particle density per cell and rest density
    pub density: DensityTracker,
    /// Current obstacle state
    pub obstacle: Obstacle,
    hash: SpatialHash,
    /// Fluid density (kg/m³)
    fluid_density: f32,
}

impl FluidSimulator {
    /// Create a sealed `width` x `height` tank with room for `capacity`
    /// particles of `particle_radius`.
    pub fn new(
        fluid_density: f32,
        width: f32,
        height: f32,
        spacing: f32,
        particle_radius: f32,
        capacity: usize,
    ) -> SimResult<Self> {
        if !(fluid_density > 0.0 && fluid_density.is_finite()) {
            return Err(SimError::param(
                "density",
                fluid_density,
                "must be positive",
            ));
        }

        let mut grid = Grid::for_tank(width, height, spacing)?;
        grid.seal_border();
        let particles = Particles::new(capacity, particle_radius)?;
        let hash = SpatialHash::new(grid.world_size(), particle_radius, capacity);
        let density = DensityTracker::new(grid.cell_count());

        log::info!(
            "fluid simulator: {}x{} cells, h = {:.4}, capacity {}, radius {:.4}",
            grid.nx,
            grid.ny,
            grid.h,
            capacity,
            particle_radius
        );

        Ok(Self {
            grid,
            particles,
            density,
            obstacle: Obstacle::new(Vec2::ZERO, 0.0),
            hash,
            fluid_density,
        })
    }

    /// Number of live particles.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn fluid_density(&self) -> f32 {
        self.fluid_density
    }

    /// Move the obstacle, resize it to `radius`, and stamp it into the grid.
    ///
    /// Without `reset` the obstacle's velocity is its displacement over `dt`;
    /// with `reset` it teleports at rest.
    pub fn set_obstacle(&mut self, position: Vec2, radius: f32, reset: bool, dt: f32) {
        self.obstacle.radius = radius;
        self.obstacle.move_to(position, reset, dt);
        obstacle::stamp(&mut self.grid, &self.obstacle);
    }

    /// Advance one frame.
    ///
    /// Each substep runs: gravity and advection, particle separation,
    /// obstacle and wall collisions, P2G, density, pressure projection, G2P.
    /// Colors are refreshed once at the end of the frame.
    pub fn simulate(&mut self, params: &SimParams) {
        let substeps = params.substeps.max(1);
        let sdt = params.substep_dt();

        // Collisions and the stamped cells must see the same disc
        if self.obstacle.radius != params.obstacle_radius {
            self.obstacle.radius = params.obstacle_radius;
            obstacle::stamp(&mut self.grid, &self.obstacle);
        }

        let pressure_settings = PressureSettings {
            iterations: params.pressure_iterations,
            dt: sdt,
            over_relaxation: params.over_relaxation,
            compensate_drift: params.compensate_drift,
            fluid_density: self.fluid_density,
        };

        for _ in 0..substeps {
            advection::integrate_particles(&mut self.particles, sdt, params.gravity);

            if params.separate_particles {
                separation::push_particles_apart(
                    &mut self.particles,
                    &mut self.hash,
                    params.separation_iterations,
                    params.color_diffusion,
                );
            }

            advection::handle_collisions(
                &mut self.particles,
                &self.grid,
                &self.obstacle,
                params.obstacle_force_fade,
            );

            transfer::transfer_velocities(
                &mut self.grid,
                &mut self.particles,
                TransferDirection::ToGrid,
            );
            self.density.update(&self.grid, &self.particles);
            pressure::solve_incompressibility(&mut self.grid, &self.density, &pressure_settings);
            transfer::transfer_velocities(
                &mut self.grid,
                &mut self.particles,
                TransferDirection::ToParticles {
                    flip_ratio: params.flip_ratio,
                },
            );
        }

        color::update_particle_colors(
            &mut self.particles,
            &self.grid,
            &self.density,
            params.surface_density_threshold,
        );
        color::update_cell_colors(&mut self.grid, &self.density);

        log::trace!(
            "frame: {} substeps of {:.5}s, {} particles, {} fluid cells",
            substeps,
            sdt,
            self.particles.len(),
            self.grid.fluid_cell_count()
        );
    }

    /// Borrow the output buffers for drawing.
    pub fn render_view(&self) -> RenderView<'_> {
        RenderView::new(self)
    }
}
