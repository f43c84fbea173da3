//! Movable circular obstacle and its voxelization into the grid.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// A disc the user drags through the tank.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Disc center in simulation space
    pub position: Vec2,
    pub radius: f32,
    /// Velocity derived from the last move; zero after a reset
    pub velocity: Vec2,
}

impl Obstacle {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius,
            velocity: Vec2::ZERO,
        }
    }

    /// Move the disc to `position`.
    ///
    /// Velocity becomes the positional delta over `dt`. With `reset` the disc
    /// teleports and its velocity is zero regardless of how far it moved.
    pub fn move_to(&mut self, position: Vec2, reset: bool, dt: f32) {
        self.velocity = if reset || dt <= 0.0 {
            Vec2::ZERO
        } else {
            (position - self.position) / dt
        };
        self.position = position;
    }

    /// True if `point` lies strictly inside the disc.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance_squared(self.position) < self.radius * self.radius
    }
}

/// Write the obstacle into the grid's openness field.
///
/// Every interior cell is reopened unless its center lies inside the disc, in
/// which case it is closed and its four adjoining faces take the obstacle's
/// velocity. The border ring is not touched and stays solid.
pub fn stamp(grid: &mut Grid, obstacle: &Obstacle) {
    let nx = grid.nx;
    let vel = obstacle.velocity;

    for j in 1..grid.ny - 1 {
        for i in 1..nx - 1 {
            let idx = grid.cell_index(i, j);
            grid.s[idx] = 1.0;

            if obstacle.contains(grid.cell_center(i, j)) {
                grid.s[idx] = 0.0;
                grid.u[idx] = vel.x;
                grid.u[idx + 1] = vel.x;
                grid.v[idx] = vel.y;
                grid.v[idx + nx] = vel.y;
            }
        }
    }
}
