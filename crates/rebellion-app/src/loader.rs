//! Config and content loading.
//!
//! Content is either the built-in campaign or a directory holding the three
//! JSON documents. Anything malformed is rejected here with the offending
//! path in the error chain.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use rebellion_core::content::ContentLibrary;
use rebellion_sim::scenario::default_content;
use rebellion_sim::SimConfig;

pub const ENEMIES_FILE: &str = "enemies.json";
pub const POWERUPS_FILE: &str = "powerups.json";
pub const STAGES_FILE: &str = "stages.json";

/// Read a `SimConfig` JSON file. Missing fields take their defaults.
pub fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed reading config {}", path.display()))?;
    let config: SimConfig = serde_json::from_str(&json)
        .with_context(|| format!("failed parsing config {}", path.display()))?;
    log::info!("config loaded from {} (seed {})", path.display(), config.seed);
    Ok(config)
}

/// Load and validate campaign content.
pub fn load_content(dir: Option<&Path>) -> Result<ContentLibrary> {
    let Some(dir) = dir else {
        return default_content().context("built-in content failed validation");
    };

    let read = |name: &str| {
        let path = dir.join(name);
        fs::read_to_string(&path).with_context(|| format!("failed reading {}", path.display()))
    };
    let enemies = read(ENEMIES_FILE)?;
    let powerups = read(POWERUPS_FILE)?;
    let stages = read(STAGES_FILE)?;

    let content = ContentLibrary::from_json_parts(&enemies, &powerups, &stages)
        .with_context(|| format!("invalid content in {}", dir.display()))?;
    log::info!(
        "content loaded from {}: {} enemy types, {} stages",
        dir.display(),
        content.enemies.len(),
        content.stages.len()
    );
    Ok(content)
}
