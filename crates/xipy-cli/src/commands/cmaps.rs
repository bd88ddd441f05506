//! Colormap listing command

use crate::CmapsArgs;
use anyhow::{Context, Result};
use xipy_scene::SceneConfig;

pub fn run(args: CmapsArgs, config: &SceneConfig) -> Result<()> {
    let registry = config.registry().context("Failed to build colormaps")?;
    let names: Vec<&str> = registry
        .names()
        .filter(|n| args.all || !n.ends_with("_r"))
        .collect();
    for name in &names {
        println!("{name}");
    }
    tracing::info!(count = names.len(), table_size = config.table_size, "colormaps");
    Ok(())
}
