//! Particle push-apart.
//!
//! The grid cannot keep particles from bunching up below its resolution, so
//! overlapping pairs are pushed apart directly. Algorithm from Matthias Müller:
//! for every pair closer than `2 * radius`, move both particles half the
//! overlap along their center line.
//!
//! Resolution is Gauss-Seidel: each push is written back immediately and later
//! pairs in the same sweep see the moved positions. A particle's own bucket
//! neighborhood and center are read once at the start of its visit. The index
//! is built once per call and not refreshed between iterations.

use crate::particle::Particles;
use crate::spatial::SpatialHash;

/// Push overlapping particles apart for `iterations` sweeps.
///
/// Each resolved contact also nudges both particle colors toward their average
/// by `color_diffusion`. Coincident particles (distance exactly zero) have no
/// separating direction and are left alone.
pub fn push_particles_apart(
    particles: &mut Particles,
    hash: &mut SpatialHash,
    iterations: usize,
    color_diffusion: f32,
) {
    let count = particles.len();
    if count < 2 || iterations == 0 {
        return;
    }

    hash.build(&particles.positions);

    let min_dist = 2.0 * particles.radius();
    let min_dist_sq = min_dist * min_dist;

    for _ in 0..iterations {
        for i in 0..count {
            let p = particles.positions[i];
            let (xs, ys) = hash.neighborhood(p);

            for yi in ys.clone() {
                for xi in xs.clone() {
                    for &id in hash.bucket(xi, yi) {
                        let id = id as usize;
                        if id == i {
                            continue;
                        }

                        let q = particles.positions[id];
                        let delta = q - p;
                        let dist_sq = delta.length_squared();
                        if dist_sq >= min_dist_sq || dist_sq == 0.0 {
                            continue;
                        }

                        let dist = dist_sq.sqrt();
                        let push = delta * (0.5 * (min_dist - dist) / dist);
                        particles.positions[i] -= push;
                        particles.positions[id] += push;

                        let c0 = particles.colors[i];
                        let c1 = particles.colors[id];
                        let mid = (c0 + c1) * 0.5;
                        particles.colors[i] = c0 + (mid - c0) * color_diffusion;
                        particles.colors[id] = c1 + (mid - c1) * color_diffusion;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    fn setup(positions: &[Vec2], radius: f32) -> (Particles, SpatialHash) {
        let mut particles = Particles::new(positions.len(), radius).unwrap();
        for &p in positions {
            particles.spawn_at(p).unwrap();
        }
        let hash = SpatialHash::new(Vec2::new(2.0, 2.0), radius, positions.len());
        (particles, hash)
    }

    #[test]
    fn test_pair_is_pushed_to_contact_distance() {
        let (mut particles, mut hash) =
            setup(&[Vec2::new(1.0, 1.0), Vec2::new(1.125, 1.0)], 0.25);

        push_particles_apart(&mut particles, &mut hash, 1, 0.0);

        assert_eq!(particles.positions[0], Vec2::new(0.8125, 1.0));
        assert_eq!(particles.positions[1], Vec2::new(1.3125, 1.0));
        let d = particles.positions[0].distance(particles.positions[1]);
        assert!((d - 0.5).abs() < 1e-6, "distance after push = {}", d);
    }

    #[test]
    fn test_undersized_hash_still_separates() {
        let mut particles = Particles::new(2, 0.25).unwrap();
        particles.spawn_at(Vec2::new(1.0, 1.0)).unwrap();
        particles.spawn_at(Vec2::new(1.125, 1.0)).unwrap();
        let mut hash = SpatialHash::new(Vec2::new(2.0, 2.0), 0.25, 1);

        push_particles_apart(&mut particles, &mut hash, 1, 0.0);

        assert_eq!(particles.positions[0], Vec2::new(0.8125, 1.0));
        assert_eq!(particles.positions[1], Vec2::new(1.3125, 1.0));
    }

    #[test]
    fn test_coincident_particles_are_untouched() {
        let (mut particles, mut hash) =
            setup(&[Vec2::new(0.5, 0.5), Vec2::new(0.5, 0.5)], 0.1);

        push_particles_apart(&mut particles, &mut hash, 5, 0.5);

        assert_eq!(particles.positions[0], Vec2::new(0.5, 0.5));
        assert_eq!(particles.positions[1], Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_distant_particles_are_untouched() {
        let start = [Vec2::new(0.2, 0.2), Vec2::new(0.9, 0.9)];
        let (mut particles, mut hash) = setup(&start, 0.05);

        push_particles_apart(&mut particles, &mut hash, 3, 0.001);

        assert_eq!(particles.positions[0], start[0]);
        assert_eq!(particles.positions[1], start[1]);
    }

    #[test]
    fn test_contact_diffuses_color() {
        let (mut particles, mut hash) =
            setup(&[Vec2::new(1.0, 1.0), Vec2::new(1.25, 1.0)], 0.25);
        particles.colors[0] = Vec3::new(1.0, 0.0, 0.0);
        particles.colors[1] = Vec3::new(0.0, 0.0, 1.0);

        push_particles_apart(&mut particles, &mut hash, 1, 0.1);

        let c0 = particles.colors[0];
        assert!((c0.x - 0.95).abs() < 1e-6);
        assert!((c0.z - 0.05).abs() < 1e-6);
        // Total color is conserved by the symmetric blend
        let sum = particles.colors[0] + particles.colors[1];
        assert!((sum - Vec3::new(1.0, 0.0, 1.0)).length() < 1e-6);
    }
}
