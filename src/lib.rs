//! # Pillow Mesher
//!
//! A Rust library for turning a cut-out picture into a textured 3D pillow.
//!
//! ## Overview
//!
//! This library takes an image whose background is already transparent and
//! produces a closed, seamed solid (GLB) that follows the picture's outline:
//! a domed front cap showing the picture, a back cap, and a sewn-looking
//! border ribbon between them.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pillow_mesher::{generate_glb, ShapeConfig, ThicknessPreset, PuffinessPreset};
//!
//! let png = std::fs::read("cutout.png")?;
//! let shape = ShapeConfig::from_presets(ThicknessPreset::Medium, PuffinessPreset::Puffy);
//! let glb_bytes = generate_glb(&png, &shape)?;
//! ```
//!
//! ## Pipeline
//!
//! Each call is a pure function of its inputs. The stages can be used on
//! their own:
//!
//! ```ignore
//! use pillow_mesher::{PillowMesher, ShapeConfig};
//!
//! let mesher = PillowMesher::new();
//! let output = mesher.build(&png, &ShapeConfig::default())?;
//! println!("{} outline points", output.contour.len());
//! let glb_bytes = output.to_glb()?;
//! ```

pub mod error;
pub mod types;
pub mod shape;
pub mod texture;
pub mod mesher;
pub mod export;

// Re-export main types for convenience
pub use error::{MesherError, Phase, Result};
pub use types::{Bounds2, Contour, NormalizedShape, PuffinessPreset, ThicknessPreset};
pub use shape::{crop_to_alpha, extract_contour, normalize_contour, CropRect, ExtractOptions};
pub use texture::{prepare_texture, PreparedTexture, TextureOptions};
pub use mesher::{
    assign_uvs, Mesh, MeshStats, MesherConfig, PillowMesher, PillowOutput, ShapeConfig,
    SolidBuilder, Vertex,
};
pub use export::{export_glb, MaterialOptions, GLB_MIME_TYPE};

/// Generate a GLB pillow from encoded image bytes with default settings.
pub fn generate_glb(image_bytes: &[u8], shape: &ShapeConfig) -> Result<Vec<u8>> {
    PillowMesher::new().generate(image_bytes, shape)
}

/// Generate a GLB pillow from preset names as received from a client.
///
/// Unknown names fall back to `medium`.
pub fn generate_glb_from_presets(image_bytes: &[u8], thickness: &str, puffiness: &str) -> Result<Vec<u8>> {
    generate_glb(image_bytes, &ShapeConfig::from_preset_names(thickness, puffiness))
}

#[cfg(feature = "wasm")]
pub mod wasm;
