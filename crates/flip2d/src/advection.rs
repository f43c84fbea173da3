//! Particle integration and boundary handling.

use glam::Vec2;

use crate::grid::Grid;
use crate::obstacle::Obstacle;
use crate::particle::Particles;

/// Symplectic Euler: apply gravity to velocity, then move by the new velocity.
pub fn integrate_particles(particles: &mut Particles, dt: f32, gravity: f32) {
    let accel = Vec2::new(0.0, gravity * dt);
    for (pos, vel) in particles
        .positions
        .iter_mut()
        .zip(particles.velocities.iter_mut())
    {
        *vel += accel;
        *pos += *vel * dt;
    }
}

/// Resolve obstacle contact and clamp particles inside the tank walls.
///
/// A particle overlapping the obstacle picks up the obstacle's velocity,
/// scaled down linearly to nothing at `force_fade` times the contact distance,
/// and is moved onto the disc surface along the contact normal. Afterwards the
/// position is clamped to the interior of the solid border; a clamped axis
/// loses its velocity component.
pub fn handle_collisions(
    particles: &mut Particles,
    grid: &Grid,
    obstacle: &Obstacle,
    force_fade: f32,
) {
    let h = grid.h;
    let r = particles.radius();
    let min_dist = obstacle.radius + r;
    let min_dist_sq = min_dist * min_dist;
    let max_force_dist = min_dist * force_fade;

    let min = Vec2::splat(h + r);
    let max = Vec2::new(
        (grid.nx - 1) as f32 * h - r,
        (grid.ny - 1) as f32 * h - r,
    );

    for (pos, vel) in particles
        .positions
        .iter_mut()
        .zip(particles.velocities.iter_mut())
    {
        let offset = *pos - obstacle.position;
        let d2 = offset.length_squared();

        // Exactly at the center there is no normal to push along
        if d2 < min_dist_sq && d2 > 0.0 {
            let d = d2.sqrt();
            let falloff = if max_force_dist > 0.0 {
                ((max_force_dist - d) / max_force_dist).max(0.0)
            } else {
                0.0
            };
            *vel += obstacle.velocity * falloff;
            *pos += offset * ((min_dist - d) / d);
        }

        if pos.x < min.x {
            pos.x = min.x;
            vel.x = 0.0;
        }
        if pos.x > max.x {
            pos.x = max.x;
            vel.x = 0.0;
        }
        if pos.y < min.y {
            pos.y = min.y;
            vel.y = 0.0;
        }
        if pos.y > max.y {
            pos.y = max.y;
            vel.y = 0.0;
        }
    }
}
