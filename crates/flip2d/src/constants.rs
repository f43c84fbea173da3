//! Physical constants and tuning values for the 2D tank.
//!
//! The three tuning values at the bottom have no physical derivation. They are
//! the defaults for the matching [`SimParams`](crate::config::SimParams) fields
//! and can be overridden per scene.

/// Earth gravity (m/s^2), negative Y is down.
pub const EARTH_GRAVITY: f32 = -9.807;

/// Alternative gravity presets.
pub const MARS_GRAVITY: f32 = -3.711;
pub const MOON_GRAVITY: f32 = -1.62;

/// Density of water (kg/m³)
pub const WATER_DENSITY: f32 = 1000.0;

/// Spatial hash bucket size as a multiple of the particle radius.
pub const HASH_SPACING_FACTOR: f32 = 2.2;

/// Per-step color drift toward blue.
pub const COLOR_DECAY_STEP: f32 = 0.01;

/// Tint applied to particles in under-dense (surface/spray) regions.
pub const SURFACE_TINT: [f32; 3] = [0.8, 0.8, 1.0];

/// Solid cells render as flat gray.
pub const SOLID_CELL_COLOR: [f32; 3] = [0.5, 0.5, 0.5];

/// Relative density range mapped by the cell color ramp.
pub const CELL_RAMP_MAX: f32 = 2.0;

// =============================================================================
// TUNING
// =============================================================================

/// Fraction of the pairwise color difference exchanged per separation contact.
pub const COLOR_DIFFUSION_COEFF: f32 = 0.001;

/// Relative density below which a particle is tinted as surface/spray.
pub const SURFACE_DENSITY_THRESHOLD: f32 = 0.7;

/// Obstacle velocity kick fades to zero at this multiple of the contact radius.
pub const OBSTACLE_FORCE_FADE: f32 = 5.0;
