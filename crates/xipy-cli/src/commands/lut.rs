//! Colormap table printing command

use crate::LutArgs;
use anyhow::{Context, Result, bail};
use tracing::debug;
use xipy_lut::{Alpha, Colormap, ControlPoints, build_colormap};
use xipy_scene::SceneConfig;

pub fn run(args: LutArgs, config: &SceneConfig) -> Result<()> {
    let size = args.size.unwrap_or(config.table_size);
    let gamma = args.gamma.unwrap_or(config.gamma);
    let cmap = resolve(&args, config, size, gamma)?;
    let alpha = Alpha::Uniform(args.alpha);
    debug!(name = cmap.name(), size, gamma, alpha = args.alpha, "printing colormap");

    let rows: Vec<usize> = (0..size + 3).collect();
    if args.bytes {
        for (row, rgba) in rows.iter().zip(cmap.lookup_all_bytes(&rows, &alpha)?) {
            println!("{:>6} {:3} {:3} {:3} {:3}", label(&cmap, *row), rgba[0], rgba[1], rgba[2], rgba[3]);
        }
    } else {
        for (row, rgba) in rows.iter().zip(cmap.lookup_all(&rows, &alpha)?) {
            println!(
                "{:>6} {:.5} {:.5} {:.5} {:.5}",
                label(&cmap, *row),
                rgba[0],
                rgba[1],
                rgba[2],
                rgba[3]
            );
        }
    }
    Ok(())
}

fn resolve(args: &LutArgs, config: &SceneConfig, size: usize, gamma: f32) -> Result<Colormap> {
    if !args.colors.is_empty() {
        let names: Vec<&str> = args.colors.iter().map(String::as_str).collect();
        let points = ControlPoints::from_names(&names)?;
        return Ok(build_colormap(&args.name, points, size, gamma)?);
    }

    let registry = config.registry().context("Failed to build colormaps")?;
    let Some(base) = registry.get(&args.name) else {
        bail!("Unknown colormap: {} (see `xipy cmaps --all`)", args.name);
    };
    if base.table_size() == size && base.gamma() == gamma {
        return Ok(base.clone());
    }
    Ok(Colormap::from_segments(&args.name, base.segments().clone(), size, gamma)?)
}

fn label(cmap: &Colormap, row: usize) -> String {
    if row == cmap.under_index() {
        "under".into()
    } else if row == cmap.over_index() {
        "over".into()
    } else if row == cmap.bad_index() {
        "bad".into()
    } else {
        row.to_string()
    }
}
