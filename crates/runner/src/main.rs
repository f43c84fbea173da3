//! Headless dam-break runner.
//!
//! Usage:
//!   dam_break [CONFIG.json] [--frames N] [--log-every N] [--stir]
//!             [--pause-file PATH] [--save-config PATH]
//!
//! Runs the scene for N frames and prints the final `FrameStats` as JSON.
//! While PATH given by `--pause-file` exists the scene is paused. `--stir`
//! drags the obstacle around a circle so the fluid has something to react to.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use flip2d::{FrameStats, Scene, SceneConfig};

struct Options {
    config: Option<PathBuf>,
    frames: u64,
    log_every: u64,
    stir: bool,
    pause_file: Option<PathBuf>,
    save_config: Option<PathBuf>,
}

fn parse_args() -> Result<Options, Box<dyn Error>> {
    let mut opts = Options {
        config: None,
        frames: 300,
        log_every: 60,
        stir: false,
        pause_file: None,
        save_config: None,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--frames" => opts.frames = next_value(&mut args, "--frames")?.parse()?,
            "--log-every" => opts.log_every = next_value(&mut args, "--log-every")?.parse()?,
            "--stir" => opts.stir = true,
            "--pause-file" => opts.pause_file = Some(next_value(&mut args, "--pause-file")?.into()),
            "--save-config" => {
                opts.save_config = Some(next_value(&mut args, "--save-config")?.into())
            }
            other if other.starts_with("--") => return Err(format!("unknown flag {}", other).into()),
            path => opts.config = Some(path.into()),
        }
    }
    Ok(opts)
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, Box<dyn Error>> {
    args.next()
        .ok_or_else(|| format!("{} needs a value", flag).into())
}

/// Obstacle position on the stirring circle at a given frame.
fn stir_position(config: &SceneConfig, frame: u64) -> (f32, f32) {
    let [cx, cy] = config.tank.obstacle_start;
    let radius = 0.25 * config.tank.tank_height;
    let angle = frame as f32 * config.params.dt * 1.5;
    (cx + radius * angle.cos(), cy + radius * angle.sin())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let opts = parse_args()?;

    let config = match &opts.config {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            SceneConfig::load_json(path)?
        }
        None => SceneConfig::default(),
    };

    if let Some(path) = &opts.save_config {
        config.save_json(path)?;
        log::info!("saved config to {}", path.display());
    }

    let mut scene = Scene::from_config(config)?;
    let log_every = opts.log_every.max(1);

    while scene.frame < opts.frames {
        if let Some(path) = &opts.pause_file {
            scene.paused = path.exists();
        }

        if opts.stir && !scene.paused {
            let (x, y) = stir_position(&scene.config, scene.frame + 1);
            scene.set_obstacle(x, y, false);
        }

        if !scene.step() {
            std::thread::sleep(Duration::from_millis(100));
            continue;
        }

        if scene.frame % log_every == 0 {
            let stats = FrameStats::measure(&scene.sim, scene.frame);
            log::info!(
                "frame {}: centroid ({:.4}, {:.4}), KE {:.4}, max speed {:.3}, |div| {:.3}",
                stats.frame,
                stats.centroid[0],
                stats.centroid[1],
                stats.kinetic_energy,
                stats.max_speed,
                stats.divergence
            );
        }
    }

    let stats = FrameStats::measure(&scene.sim, scene.frame);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
