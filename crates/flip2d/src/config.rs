//! Scene and step configuration, loadable from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    COLOR_DIFFUSION_COEFF, EARTH_GRAVITY, OBSTACLE_FORCE_FADE, SURFACE_DENSITY_THRESHOLD,
    WATER_DENSITY,
};
use crate::error::{SimError, SimResult};

/// Tank geometry and initial water block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    pub tank_width: f32,
    pub tank_height: f32,
    /// Cells across the tank height; target spacing is `tank_height / resolution`
    pub resolution: u32,
    /// Fraction of the tank width filled with water at start
    pub rel_water_width: f32,
    /// Fraction of the tank height filled with water at start
    pub rel_water_height: f32,
    /// Particle radius as a fraction of the target spacing
    pub particle_radius_factor: f32,
    /// Fluid density (kg/m³)
    pub density: f32,
    /// Obstacle center at scene start
    pub obstacle_start: [f32; 2],
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            tank_width: 4.0,
            tank_height: 3.0,
            resolution: 100,
            rel_water_width: 0.7,
            rel_water_height: 0.8,
            particle_radius_factor: 0.3,
            density: WATER_DENSITY,
            obstacle_start: [2.0, 2.0],
        }
    }
}

impl TankConfig {
    /// Target cell spacing.
    pub fn spacing(&self) -> f32 {
        self.tank_height / self.resolution as f32
    }

    pub fn particle_radius(&self) -> f32 {
        self.particle_radius_factor * self.spacing()
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.tank_width > 0.0 && self.tank_width.is_finite()) {
            return Err(SimError::NonPositiveDimension {
                name: "width",
                value: self.tank_width,
            });
        }
        if !(self.tank_height > 0.0 && self.tank_height.is_finite()) {
            return Err(SimError::NonPositiveDimension {
                name: "height",
                value: self.tank_height,
            });
        }
        if self.resolution == 0 {
            return Err(SimError::InvalidSpacing(f32::INFINITY));
        }
        for (name, value) in [
            ("rel_water_width", self.rel_water_width),
            ("rel_water_height", self.rel_water_height),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::param(name, value, "must lie in [0, 1]"));
            }
        }
        if !(self.particle_radius_factor > 0.0 && self.particle_radius_factor.is_finite()) {
            return Err(SimError::InvalidParticleRadius(self.particle_radius()));
        }
        if !(self.density > 0.0) {
            return Err(SimError::param("density", self.density, "must be positive"));
        }
        Ok(())
    }
}

/// Per-frame stepping parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Frame time step (s)
    pub dt: f32,
    /// Substeps per frame, each advancing `dt / substeps`
    pub substeps: u32,
    /// Vertical acceleration (m/s^2), negative is down
    pub gravity: f32,
    /// 0 = pure PIC, 1 = pure FLIP
    pub flip_ratio: f32,
    pub pressure_iterations: usize,
    pub separation_iterations: usize,
    pub over_relaxation: f32,
    pub compensate_drift: bool,
    pub separate_particles: bool,
    pub obstacle_radius: f32,
    /// Color exchanged per separation contact
    pub color_diffusion: f32,
    /// Relative density below which particles get the surface tint
    pub surface_density_threshold: f32,
    /// Obstacle kick reaches zero at this multiple of the contact distance
    pub obstacle_force_fade: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            substeps: 1,
            gravity: EARTH_GRAVITY,
            flip_ratio: 0.9,
            pressure_iterations: 50,
            separation_iterations: 2,
            over_relaxation: 1.9,
            compensate_drift: true,
            separate_particles: true,
            obstacle_radius: 0.15,
            color_diffusion: COLOR_DIFFUSION_COEFF,
            surface_density_threshold: SURFACE_DENSITY_THRESHOLD,
            obstacle_force_fade: OBSTACLE_FORCE_FADE,
        }
    }
}

impl SimParams {
    /// Length of one substep.
    pub fn substep_dt(&self) -> f32 {
        self.dt / self.substeps.max(1) as f32
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(SimError::param("dt", self.dt, "must be positive"));
        }
        if self.substeps == 0 {
            return Err(SimError::param("substeps", 0.0, "must be at least 1"));
        }
        if !self.gravity.is_finite() {
            return Err(SimError::param("gravity", self.gravity, "must be finite"));
        }
        if !(0.0..=1.0).contains(&self.flip_ratio) {
            return Err(SimError::param(
                "flip_ratio",
                self.flip_ratio,
                "must lie in [0, 1]",
            ));
        }
        if !(self.over_relaxation > 0.0 && self.over_relaxation < 2.0) {
            return Err(SimError::param(
                "over_relaxation",
                self.over_relaxation,
                "must lie in (0, 2)",
            ));
        }
        if !(self.obstacle_radius >= 0.0) {
            return Err(SimError::param(
                "obstacle_radius",
                self.obstacle_radius,
                "must not be negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.color_diffusion) {
            return Err(SimError::param(
                "color_diffusion",
                self.color_diffusion,
                "must lie in [0, 1]",
            ));
        }
        if !(self.obstacle_force_fade >= 0.0) {
            return Err(SimError::param(
                "obstacle_force_fade",
                self.obstacle_force_fade,
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// Everything needed to build and run a scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub tank: TankConfig,
    pub params: SimParams,
}

impl SceneConfig {
    pub fn validate(&self) -> SimResult<()> {
        self.tank.validate()?;
        self.params.validate()
    }

    /// Save configuration to a JSON file.
    pub fn save_json(&self, path: &Path) -> SimResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from a JSON file and validate it.
    pub fn load_json(path: &Path) -> SimResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SceneConfig::default();
        config.validate().unwrap();
        assert!((config.tank.spacing() - 0.03).abs() < 1e-6);
        assert!((config.tank.particle_radius() - 0.009).abs() < 1e-6);
        assert_eq!(config.params.pressure_iterations, 50);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            SceneConfig::from_json(r#"{ "params": { "flip_ratio": 0.5, "substeps": 4 } }"#)
                .unwrap();
        assert_eq!(config.params.flip_ratio, 0.5);
        assert_eq!(config.params.substeps, 4);
        assert_eq!(config.params.over_relaxation, 1.9);
        assert_eq!(config.tank, TankConfig::default());
        assert!((config.params.substep_dt() - 1.0 / 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = SceneConfig::from_json(r#"{ "params": { "flip_ratio": 1.5 } }"#).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidParam {
                name: "flip_ratio",
                ..
            }
        ));

        let err = SceneConfig::from_json(r#"{ "tank": { "tank_width": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, SimError::NonPositiveDimension { .. }));

        let mut params = SimParams::default();
        params.substeps = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            SceneConfig::from_json("{ not json"),
            Err(SimError::Json(_))
        ));
    }

    #[test]
    fn test_save_then_load_file() {
        let path = std::env::temp_dir().join(format!("flip2d_config_{}.json", std::process::id()));
        let mut config = SceneConfig::default();
        config.params.gravity = crate::constants::MOON_GRAVITY;
        config.save_json(&path).unwrap();

        let loaded = SceneConfig::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
