//! Binary morphology on 6-connected voxel grids.
//!
//! - [`fill_holes`] - background not reachable from the border becomes foreground
//! - [`erode`] - a voxel survives only if its six face neighbours are set;
//!   the outside of the volume counts as background

use std::collections::VecDeque;
use tracing::trace;
use xipy_core::{Shape, Volume};

const OFFSETS: [[isize; 3]; 6] = [
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
];

/// Face neighbour of `ijk` along `d`, `None` outside the grid.
#[inline]
fn neighbour(ijk: [usize; 3], d: [isize; 3], shape: Shape) -> Option<[usize; 3]> {
    let mut out = [0usize; 3];
    for axis in 0..3 {
        let v = ijk[axis].checked_add_signed(d[axis])?;
        if v >= shape[axis] {
            return None;
        }
        out[axis] = v;
    }
    Some(out)
}

#[inline]
fn on_border(ijk: [usize; 3], shape: Shape) -> bool {
    (0..3).any(|a| ijk[a] == 0 || ijk[a] + 1 == shape[a])
}

/// Fills enclosed cavities of a binary volume.
///
/// # Example
///
/// ```rust
/// use xipy_core::Volume;
/// use xipy_ops::morphology::fill_holes;
///
/// // 3x3x3 shell with an empty centre
/// let shell = Volume::from_fn([3, 3, 3], |ijk| ijk != [1, 1, 1]).unwrap();
/// assert!(fill_holes(&shell)[[1, 1, 1]]);
/// ```
pub fn fill_holes(mask: &Volume<bool>) -> Volume<bool> {
    trace!(shape = ?mask.shape(), "morphology::fill_holes");
    let shape = mask.shape();
    let mut outside = mask.map(|_| false);
    let mut queue = VecDeque::new();

    for (o, &set) in mask.iter().enumerate() {
        let ijk = mask.index_of(o);
        if !set && on_border(ijk, shape) {
            outside.data_mut()[o] = true;
            queue.push_back(ijk);
        }
    }

    while let Some(ijk) = queue.pop_front() {
        for d in OFFSETS {
            let Some(n) = neighbour(ijk, d, shape) else {
                continue;
            };
            let Some(o) = mask.offset(n) else {
                continue;
            };
            if !mask.data()[o] && !outside.data()[o] {
                outside.data_mut()[o] = true;
                queue.push_back(n);
            }
        }
    }

    outside.map(|&reached| !reached)
}

/// Erodes a binary volume `iterations` times.
pub fn erode(mask: &Volume<bool>, iterations: usize) -> Volume<bool> {
    trace!(shape = ?mask.shape(), iterations, "morphology::erode");
    let shape = mask.shape();
    let mut current = mask.clone();
    for _ in 0..iterations {
        let prev = current.clone();
        for (o, v) in current.data_mut().iter_mut().enumerate() {
            if !*v {
                continue;
            }
            let ijk = prev.index_of(o);
            *v = OFFSETS.iter().all(|&d| {
                neighbour(ijk, d, shape)
                    .and_then(|n| prev.get(n).copied())
                    .unwrap_or(false)
            });
        }
    }
    current
}
