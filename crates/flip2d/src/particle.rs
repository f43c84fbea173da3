//! Fixed-capacity particle storage for the 2D FLIP simulation.

use glam::{Vec2, Vec3};

use crate::error::{SimError, SimResult};

/// Color every particle starts with.
pub const INITIAL_COLOR: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Fluid particles stored as parallel arrays.
///
/// Capacity is fixed at construction and all buffers are allocated up front,
/// so stepping never grows them. Only the first `len()` entries are live.
#[derive(Clone, Debug)]
pub struct Particles {
    /// World positions
    pub positions: Vec<Vec2>,
    /// Current velocities
    pub velocities: Vec<Vec2>,
    /// RGB colors (cosmetic only)
    pub colors: Vec<Vec3>,
    radius: f32,
    capacity: usize,
}

impl Particles {
    /// Create an empty set able to hold `capacity` particles of `radius`.
    pub fn new(capacity: usize, radius: f32) -> SimResult<Self> {
        if capacity == 0 {
            return Err(SimError::ZeroCapacity);
        }
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(SimError::InvalidParticleRadius(radius));
        }

        Ok(Self {
            positions: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
            radius,
            capacity,
        })
    }

    /// Add a particle with the given position and velocity.
    ///
    /// Returns the new particle's index.
    pub fn spawn(&mut self, position: Vec2, velocity: Vec2) -> SimResult<usize> {
        if self.positions.len() >= self.capacity {
            log::warn!(
                "spawn at ({:.3}, {:.3}) refused, capacity {} reached",
                position.x,
                position.y,
                self.capacity
            );
            return Err(SimError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.positions.push(position);
        self.velocities.push(velocity);
        self.colors.push(INITIAL_COLOR);
        Ok(self.positions.len() - 1)
    }

    /// Add a stationary particle.
    pub fn spawn_at(&mut self, position: Vec2) -> SimResult<usize> {
        self.spawn(position, Vec2::ZERO)
    }

    /// Number of live particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Remove all particles, keeping the allocation.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.velocities.clear();
        self.colors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_until_full() {
        let mut particles = Particles::new(2, 0.1).unwrap();
        assert_eq!(particles.spawn_at(Vec2::ONE).unwrap(), 0);
        assert_eq!(
            particles.spawn(Vec2::new(2.0, 2.0), Vec2::X).unwrap(),
            1
        );

        let err = particles.spawn_at(Vec2::ZERO).unwrap_err();
        assert!(matches!(err, SimError::CapacityExceeded { capacity: 2 }));
        assert_eq!(particles.len(), 2);
        assert_eq!(particles.velocities[1], Vec2::X);
        assert_eq!(particles.colors[0], INITIAL_COLOR);
    }

    #[test]
    fn test_rejects_invalid_construction() {
        assert!(matches!(Particles::new(0, 0.1), Err(SimError::ZeroCapacity)));
        assert!(matches!(
            Particles::new(4, 0.0),
            Err(SimError::InvalidParticleRadius(_))
        ));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut particles = Particles::new(3, 0.1).unwrap();
        particles.spawn_at(Vec2::ONE).unwrap();
        particles.clear();
        assert!(particles.is_empty());
        assert_eq!(particles.capacity(), 3);
        assert!(particles.positions.capacity() >= 3);
    }
}
