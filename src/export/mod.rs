//! Model export.
//!
//! The finished pillow is written as a single self-contained GLB file.

pub mod gltf;

pub use gltf::{export_glb, MaterialOptions, GLB_MIME_TYPE};
