//! Scene setup and the per-frame entry point.
//!
//! A [`Scene`] owns the simulator together with the parameters it is stepped
//! with. The frame driver calls [`Scene::step`] once per tick; pointer input
//! goes through [`Scene::set_obstacle`].

use glam::Vec2;

use crate::config::{SceneConfig, SimParams, TankConfig};
use crate::error::SimResult;
use crate::FluidSimulator;

/// Build the dam-break setup: a hex-packed water block in the lower left
/// corner of a sealed tank.
pub fn dam_break(tank: &TankConfig) -> SimResult<FluidSimulator> {
    tank.validate()?;

    let h = tank.spacing();
    let r = tank.particle_radius();
    let dx = 2.0 * r;
    let dy = 3.0f32.sqrt() / 2.0 * dx;

    let num_x = block_count(tank.rel_water_width * tank.tank_width, h, r, dx);
    let num_y = block_count(tank.rel_water_height * tank.tank_height, h, r, dy);
    let capacity = (num_x * num_y).max(1);

    let mut sim = FluidSimulator::new(
        tank.density,
        tank.tank_width,
        tank.tank_height,
        h,
        r,
        capacity,
    )?;

    for i in 0..num_x {
        for j in 0..num_y {
            let row_shift = if j % 2 == 0 { 0.0 } else { r };
            let pos = Vec2::new(h + r + dx * i as f32 + row_shift, h + r + dy * j as f32);
            sim.particles.spawn_at(pos)?;
        }
    }

    log::info!(
        "dam break: {}x{} particle block, {} particles",
        num_x,
        num_y,
        sim.particle_count()
    );
    Ok(sim)
}

/// Particles that fit along `extent` after leaving room for the wall.
fn block_count(extent: f32, h: f32, r: f32, step: f32) -> usize {
    let n = ((extent - 2.0 * h - 2.0 * r) / step).floor();
    if n > 0.0 {
        n as usize
    } else {
        0
    }
}

/// Simulator plus the state its frame driver needs.
pub struct Scene {
    pub sim: FluidSimulator,
    pub config: SceneConfig,
    /// Checked between frames; a paused scene does not step
    pub paused: bool,
    /// Frames simulated since the last reset
    pub frame: u64,
}

impl Scene {
    pub fn from_config(config: SceneConfig) -> SimResult<Self> {
        config.validate()?;
        let sim = dam_break(&config.tank)?;
        let mut scene = Self {
            sim,
            config,
            paused: false,
            frame: 0,
        };
        scene.place_obstacle_at_start();
        Ok(scene)
    }

    /// Rebuild grid and particles from the configuration.
    pub fn reset(&mut self) -> SimResult<()> {
        self.sim = dam_break(&self.config.tank)?;
        self.frame = 0;
        self.place_obstacle_at_start();
        log::info!("scene reset");
        Ok(())
    }

    fn place_obstacle_at_start(&mut self) {
        let [x, y] = self.config.tank.obstacle_start;
        self.set_obstacle(x, y, true);
    }

    pub fn params(&self) -> &SimParams {
        &self.config.params
    }

    pub fn params_mut(&mut self) -> &mut SimParams {
        &mut self.config.params
    }

    /// Move the obstacle to (x, y) in simulation space.
    ///
    /// Velocity is derived from the move over one frame `dt` unless `reset`.
    pub fn set_obstacle(&mut self, x: f32, y: f32, reset: bool) {
        let params = &self.config.params;
        self.sim
            .set_obstacle(Vec2::new(x, y), params.obstacle_radius, reset, params.dt);
    }

    /// Change the obstacle radius. Takes effect at the next move or step.
    pub fn set_obstacle_radius(&mut self, radius: f32) {
        self.config.params.obstacle_radius = radius;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Run one frame unless paused. Returns whether the simulation advanced.
    pub fn step(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.sim.simulate(&self.config.params);
        self.frame += 1;
        true
    }
}
