//! Dam break scenario
//!
//! A 10x10 hex-packed block collapses in a 0.6 m tank with h = 0.03. The
//! centroid drops, sloshes, and settles within a second of simulated time.

use flip2d::diagnostics::centroid;
use flip2d::{Scene, SceneConfig, SimParams, TankConfig};

fn dam_break_scene() -> Scene {
    let config = SceneConfig {
        tank: TankConfig {
            tank_width: 0.6,
            tank_height: 0.6,
            resolution: 20,
            rel_water_width: 0.45,
            rel_water_height: 0.4,
            ..TankConfig::default()
        },
        params: SimParams::default(),
    };
    Scene::from_config(config).unwrap()
}

#[test]
fn test_dam_break_settles() {
    let mut scene = dam_break_scene();
    assert_eq!(scene.sim.particle_count(), 100);
    assert_eq!(scene.sim.density.rest_density(), None);

    let start = centroid(&scene.sim.particles).unwrap().y;
    let mut heights = Vec::with_capacity(60);
    let mut rest = None;

    for frame in 0..60 {
        assert!(scene.step());
        heights.push(centroid(&scene.sim.particles).unwrap().y);

        let current = scene.sim.density.rest_density();
        assert!(current.is_some(), "rest density unset after frame {}", frame);
        match rest {
            None => rest = current,
            Some(r) => assert_eq!(current, Some(r), "rest density changed at frame {}", frame),
        }
    }

    assert!(rest.unwrap_or(0.0) > 0.0);
    assert_eq!(scene.sim.particle_count(), 100);

    // The block falls early on
    assert!(
        heights[14] < start - 0.03,
        "centroid {} at frame 15, started at {}",
        heights[14],
        start
    );
    // Never climbs much above its starting height
    let peak = heights.iter().cloned().fold(f32::MIN, f32::max);
    assert!(peak < start + 0.01, "peak {} vs start {}", peak, start);

    // And has settled by the end
    let last = &heights[50..];
    let lo = last.iter().cloned().fold(f32::MAX, f32::min);
    let hi = last.iter().cloned().fold(f32::MIN, f32::max);
    assert!(heights[59] < 0.075, "final centroid {}", heights[59]);
    assert!(hi - lo < 0.01, "centroid still moving: {}..{}", lo, hi);
}

#[test]
fn test_dam_break_keeps_particles_in_tank() {
    let mut scene = dam_break_scene();
    for _ in 0..30 {
        scene.step();
    }

    let grid = &scene.sim.grid;
    let r = scene.sim.particles.radius();
    let lo = grid.h + r - 1e-5;
    let hi_x = (grid.nx - 1) as f32 * grid.h - r + 1e-5;
    let hi_y = (grid.ny - 1) as f32 * grid.h - r + 1e-5;
    for (k, p) in scene.sim.particles.positions.iter().enumerate() {
        assert!(
            p.x >= lo && p.x <= hi_x && p.y >= lo && p.y <= hi_y,
            "particle {} escaped to {:?}",
            k,
            p
        );
    }
    for v in &scene.sim.particles.velocities {
        assert!(v.is_finite());
    }
}
