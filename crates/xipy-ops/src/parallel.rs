//! Per-voxel execution helpers.
//!
//! With the `parallel` feature the voxel loops of compositing and Gaussian
//! filtering are split across the rayon pool; the call still blocks until
//! every voxel is written. Without it they run on the calling thread.
//! Results are identical either way.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Writes `f(i)` into every `out[i]`.
#[cfg(feature = "parallel")]
pub(crate) fn fill_indexed<T, F>(out: &mut [T], f: F)
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    out.par_iter_mut().enumerate().for_each(|(i, v)| *v = f(i));
}

/// Writes `f(i)` into every `out[i]`.
#[cfg(not(feature = "parallel"))]
pub(crate) fn fill_indexed<T, F>(out: &mut [T], f: F)
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    for (i, v) in out.iter_mut().enumerate() {
        *v = f(i);
    }
}

/// Updates every `dst[i]` from `src[i]`.
#[cfg(feature = "parallel")]
pub(crate) fn zip_update<T, U, F>(dst: &mut [T], src: &[U], f: F)
where
    T: Send,
    U: Sync,
    F: Fn(&mut T, &U) + Sync + Send,
{
    dst.par_iter_mut().zip(src.par_iter()).for_each(|(d, s)| f(d, s));
}

/// Updates every `dst[i]` from `src[i]`.
#[cfg(not(feature = "parallel"))]
pub(crate) fn zip_update<T, U, F>(dst: &mut [T], src: &[U], f: F)
where
    T: Send,
    U: Sync,
    F: Fn(&mut T, &U) + Sync + Send,
{
    for (d, s) in dst.iter_mut().zip(src) {
        f(d, s);
    }
}
