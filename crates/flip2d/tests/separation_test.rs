//! Particle separation tests
//!
//! Packed clusters relax to the contact distance and particle count is kept.

use flip2d::separation::push_particles_apart;
use flip2d::{Particles, SpatialHash, Vec2};

const RADIUS: f32 = 0.05;

fn cluster(n: usize, gap: f32) -> Particles {
    let mut particles = Particles::new(n * n, RADIUS).unwrap();
    for i in 0..n {
        for j in 0..n {
            let pos = Vec2::new(2.0 + i as f32 * gap * RADIUS, 2.0 + j as f32 * gap * RADIUS);
            particles.spawn_at(pos).unwrap();
        }
    }
    particles
}

fn min_pair_distance(particles: &Particles) -> f32 {
    let p = &particles.positions;
    let mut min = f32::MAX;
    for a in 0..p.len() {
        for b in a + 1..p.len() {
            min = min.min(p[a].distance(p[b]));
        }
    }
    min
}

/// Overlapping clusters end up with every pair at least 2r apart.
#[test]
fn test_clusters_relax_to_contact_distance() {
    for (n, gap, iterations) in [(2, 1.0, 20), (3, 1.6, 50), (4, 1.5, 100), (5, 1.8, 100)] {
        let mut particles = cluster(n, gap);
        let mut hash = SpatialHash::new(Vec2::new(4.0, 4.0), RADIUS, particles.len());

        assert!(min_pair_distance(&particles) < 2.0 * RADIUS);
        push_particles_apart(&mut particles, &mut hash, iterations, 0.001);

        let min = min_pair_distance(&particles);
        assert!(
            min > 2.0 * RADIUS * (1.0 - 1e-3),
            "{}x{} cluster (gap {}r): closest pair {} after {} iterations",
            n,
            n,
            gap,
            min,
            iterations
        );
        assert_eq!(particles.len(), n * n);
    }
}

/// One sweep never moves a particle that has no neighbor in contact.
#[test]
fn test_isolated_particles_do_not_move() {
    let mut particles = Particles::new(3, RADIUS).unwrap();
    let start = [
        Vec2::new(0.5, 0.5),
        Vec2::new(1.5, 0.5),
        Vec2::new(0.5 + 2.0 * RADIUS, 0.5),
    ];
    for &p in &start {
        particles.spawn_at(p).unwrap();
    }
    let mut hash = SpatialHash::new(Vec2::new(4.0, 4.0), RADIUS, 3);

    push_particles_apart(&mut particles, &mut hash, 4, 0.001);

    assert_eq!(particles.positions[1], start[1]);
}

/// Zero iterations is a no-op.
#[test]
fn test_zero_iterations_is_noop() {
    let mut particles = cluster(3, 1.0);
    let before = particles.positions.clone();
    let mut hash = SpatialHash::new(Vec2::new(4.0, 4.0), RADIUS, particles.len());

    push_particles_apart(&mut particles, &mut hash, 0, 0.001);

    assert_eq!(particles.positions, before);
}

/// Pushes land in place, so a chain resolves front to back within one sweep.
///
/// Particle 1 is first pushed right by particle 0, then resolves against
/// particle 2 from that moved position. A batched update would instead leave
/// the chain at 0.875, 1.25, 1.625.
#[test]
fn test_chain_resolves_in_sweep_order() {
    let radius = 0.25;
    let mut particles = Particles::new(3, radius).unwrap();
    for x in [1.0, 1.25, 1.5] {
        particles.spawn_at(Vec2::new(x, 1.0)).unwrap();
    }
    let mut hash = SpatialHash::new(Vec2::new(2.0, 2.0), radius, 3);

    push_particles_apart(&mut particles, &mut hash, 1, 0.0);

    let xs: Vec<f32> = particles.positions.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.875, 1.1875, 1.6875]);
    for p in &particles.positions {
        assert_eq!(p.y, 1.0);
    }
}
