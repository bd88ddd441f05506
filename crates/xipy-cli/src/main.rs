//! xipy - colormap and cut-plane scene tool
//!
//! Inspects colormap tables, solves plane intersections, and runs the
//! orthogonal-view pipeline on a synthetic phantom.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use xipy_scene::CutPlane;

mod commands;

#[derive(Parser)]
#[command(name = "xipy")]
#[command(author, version, about = "Colormap and orthogonal cut-plane scene tool")]
#[command(long_about = "
Inspect indexed alpha colormaps and exercise the orthogonal cut-plane scene.

Examples:
  xipy cmaps                            # List colormaps
  xipy cmaps --all                      # Include reversed maps
  xipy lut hot --size 8                 # Print an 8-row table
  xipy lut gray --size 4 --alpha 0.5 --bytes
  xipy lut fire --colors black,#ff8000,yellow --size 16
  xipy intersect --plane 1,0,0,2,0,0 --plane 0,1,0,0,3,0 --plane 0,0,1,0,0,5
  xipy phantom --size 48
  xipy --config scene.yaml phantom
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Scene configuration (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered colormaps
    #[command(visible_alias = "ls")]
    Cmaps(CmapsArgs),

    /// Print the rows of a colormap
    Lut(LutArgs),

    /// Intersect three planes
    #[command(visible_alias = "x")]
    Intersect(IntersectArgs),

    /// Run the scene pipeline on a synthetic head phantom
    Phantom(PhantomArgs),
}

#[derive(Args)]
struct CmapsArgs {
    /// Include reversed (`_r`) maps
    #[arg(short, long)]
    all: bool,
}

#[derive(Args)]
struct LutArgs {
    /// Colormap name
    name: String,

    /// Ordinary rows (defaults to the configured table size)
    #[arg(short, long)]
    size: Option<usize>,

    /// Sampling exponent (defaults to the configured gamma)
    #[arg(short, long)]
    gamma: Option<f32>,

    /// Uniform alpha applied at lookup
    #[arg(short, long, default_value = "1.0")]
    alpha: f32,

    /// Print 8-bit rows
    #[arg(short, long)]
    bytes: bool,

    /// Build a map from comma-separated colors instead of the registry
    #[arg(long, value_delimiter = ',')]
    colors: Vec<String>,
}

#[derive(Args)]
struct IntersectArgs {
    /// Plane as nx,ny,nz,px,py,pz (give three)
    #[arg(long = "plane", required = true, value_parser = parse_plane)]
    planes: Vec<CutPlane>,
}

#[derive(Args)]
struct PhantomArgs {
    /// Voxels per axis
    #[arg(short, long, default_value = "32")]
    size: usize,

    /// Isotropic voxel size in mm
    #[arg(long, default_value = "2.0")]
    voxel_size: f64,

    /// Overlay alpha
    #[arg(long, default_value = "0.6")]
    overlay_alpha: f32,
}

fn parse_plane(s: &str) -> std::result::Result<CutPlane, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;
    match values.as_slice() {
        &[nx, ny, nz, px, py, pz] => Ok(CutPlane::new(
            xipy_math::Vec3::new(px, py, pz),
            xipy_math::Vec3::new(nx, ny, nz),
        )),
        _ => Err(format!("expected 6 comma-separated numbers, got {}", values.len())),
    }
}

/// Installs the stderr subscriber; `RUST_LOG` overrides the verbosity.
fn init_logging(verbose: u8) -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install log subscriber")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Cmaps(args) => commands::cmaps::run(args, &config),
        Commands::Lut(args) => commands::lut::run(args, &config),
        Commands::Intersect(args) => commands::intersect::run(args),
        Commands::Phantom(args) => commands::phantom::run(args, config, cli.verbose),
    }
}
