//! Integration tests for xipy-rs crates.
//!
//! End-to-end checks across the colormap engine, the blender and the
//! scene. Scene workflows live in [`scene_flow`].

#[cfg(test)]
mod scene_flow;
