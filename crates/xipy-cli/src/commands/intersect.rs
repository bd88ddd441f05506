//! Three-plane intersection command

use crate::IntersectArgs;
use anyhow::{Result, bail};
use tracing::debug;
use xipy_scene::three_plane_point;

pub fn run(args: IntersectArgs) -> Result<()> {
    let [a, b, c] = match args.planes.as_slice() {
        &[a, b, c] => [a, b, c],
        other => bail!("expected exactly 3 planes, got {}", other.len()),
    };
    debug!(?a, ?b, ?c, "intersecting");
    let p = three_plane_point(a.normal, b.normal, c.normal, a.origin, b.origin, c.origin)?;
    println!("{} {} {}", p.x, p.y, p.z);
    Ok(())
}
