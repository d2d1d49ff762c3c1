use std::path::PathBuf;

use anyhow::{Context, Result};

mod config;
mod input;
mod walkthrough;

use config::DemoConfig;

const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/crypt.json");

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    log::info!("Starting Gloom walkthrough with {}", config_path.display());

    let config = DemoConfig::load(&config_path)?;
    let scene_name = config_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scene".to_string());

    let mut scene = walkthrough::build_scene(&scene_name, &config)
        .with_context(|| format!("Failed to build scene from {}", config_path.display()))?;
    let summary = walkthrough::run(&mut scene, &config)?;

    log::info!(
        "Ran {} frames, {} blocked; camera at ({:.2}, {:.2}, {:.2})",
        summary.frames,
        summary.blocked_frames,
        summary.final_position.x,
        summary.final_position.y,
        summary.final_position.z
    );
    log::info!("{} draw calls per frame", summary.draw_calls);
    if !summary.world_bounds.is_empty() {
        let (min, max) = (summary.world_bounds.min(), summary.world_bounds.max());
        log::info!(
            "World bounds: ({:.2}, {:.2}, {:.2}) to ({:.2}, {:.2}, {:.2})",
            min.x,
            min.y,
            min.z,
            max.x,
            max.y,
            max.z
        );
    }

    Ok(())
}
