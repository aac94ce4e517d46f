//! Pillow mesh generation.
//!
//! This module runs the whole pipeline: crop, trace, normalize, build the
//! solid, texture it, and hand it to the exporter.

pub mod config;
pub mod geometry;
pub mod solid;
pub mod uv;

pub use config::ShapeConfig;
pub use geometry::{Mesh, Vertex};
pub use solid::{SolidBuilder, SolidLayout, SolidMesh, VertexRole};
pub use uv::{assign_uvs, UvLayout};

use crate::error::Result;
use crate::export::MaterialOptions;
use crate::shape::{alpha_mask, crop_to_alpha, extract_contour, normalize_contour, CropRect, ExtractOptions};
use crate::texture::{prepare_texture, PreparedTexture, TextureOptions};
use crate::types::{Contour, NormalizedShape};
use serde::{Deserialize, Serialize};

/// Image-processing and material settings, independent of the shape style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MesherConfig {
    /// Pixels with alpha strictly above this are inside the silhouette.
    pub alpha_threshold: u8,
    /// Sigma of the mask denoising blur.
    pub blur_sigma: f32,
    /// Transparent margin kept around the cropped picture, in pixels.
    pub crop_padding: u32,
    /// Texture layout and colours.
    pub texture: TextureOptions,
    /// PBR parameters of the exported material.
    pub material: MaterialOptions,
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: 127,
            blur_sigma: 0.8,
            crop_padding: 5,
            texture: TextureOptions::default(),
            material: MaterialOptions::default(),
        }
    }
}

impl MesherConfig {
    /// Use a different colour for the seam band.
    pub fn with_seam_color(mut self, color: [u8; 3]) -> Self {
        self.texture.seam_color = color;
        self
    }

    /// Use a different fill behind transparent pixels.
    pub fn with_background(mut self, color: [u8; 3]) -> Self {
        self.texture.background = color;
        self
    }

    fn extract_options(&self, shape: &ShapeConfig) -> ExtractOptions {
        ExtractOptions {
            alpha_threshold: self.alpha_threshold,
            blur_sigma: self.blur_sigma,
            simplify_tolerance: shape.simplify_tolerance,
        }
    }
}

/// Vertex and triangle counts per part of the solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshStats {
    pub contour_points: usize,
    pub cap_vertices: usize,
    pub cap_triangles: usize,
    pub seam_vertices: usize,
    pub seam_triangles: usize,
}

impl From<&SolidLayout> for MeshStats {
    fn from(layout: &SolidLayout) -> Self {
        Self {
            contour_points: layout.contour_len,
            cap_vertices: layout.contour_len + 1,
            cap_triangles: layout.cap_triangle_count(),
            seam_vertices: layout.seam().len(),
            seam_triangles: layout.seam_triangle_count(),
        }
    }
}

/// Output from the mesher.
#[derive(Debug, Clone)]
pub struct PillowOutput {
    /// The textured, unwelded mesh with normals.
    pub mesh: Mesh,
    /// Vertex layout of `mesh`.
    pub layout: SolidLayout,
    /// Texture referenced by the mesh UVs.
    pub texture: PreparedTexture,
    /// Outline in cropped-pixel space.
    pub contour: Contour,
    /// Outline in model space.
    pub shape: NormalizedShape,
    /// Region of the source picture that was kept.
    pub crop: CropRect,
    /// Material parameters to export with.
    pub material: MaterialOptions,
}

impl PillowOutput {
    pub fn stats(&self) -> MeshStats {
        MeshStats::from(&self.layout)
    }

    /// Get total vertex count.
    pub fn total_vertices(&self) -> usize {
        self.mesh.vertex_count()
    }

    /// Get total triangle count.
    pub fn total_triangles(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Export to GLB (binary glTF) format.
    pub fn to_glb(&self) -> Result<Vec<u8>> {
        crate::export::export_glb(&self.mesh, &self.texture, &self.material)
    }
}

/// The main mesher struct.
///
/// Holds configuration only; every call is independent, so one mesher can be
/// shared across worker threads.
#[derive(Debug, Clone, Default)]
pub struct PillowMesher {
    config: MesherConfig,
}

impl PillowMesher {
    /// Create a new mesher with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new mesher with custom configuration.
    pub fn with_config(config: MesherConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &MesherConfig {
        &self.config
    }

    /// Trace the silhouette of encoded image bytes without building a mesh.
    pub fn contour(&self, image_bytes: &[u8], shape: &ShapeConfig) -> Result<(Contour, CropRect)> {
        shape.validate()?;
        let source = image::load_from_memory(image_bytes)?.to_rgba8();
        let (cropped, crop) = crop_to_alpha(&source, self.config.crop_padding)?;
        let contour = extract_contour(&alpha_mask(&cropped), &self.config.extract_options(shape))?;
        Ok((contour, crop))
    }

    /// Build the textured solid from encoded image bytes.
    pub fn build(&self, image_bytes: &[u8], shape: &ShapeConfig) -> Result<PillowOutput> {
        shape.validate()?;

        let source = image::load_from_memory(image_bytes)?.to_rgba8();
        log::debug!("decoded {}x{} input", source.width(), source.height());
        self.build_from_image(&source, shape)
    }

    /// Build the textured solid from an already decoded picture.
    pub fn build_from_image(&self, source: &image::RgbaImage, shape: &ShapeConfig) -> Result<PillowOutput> {
        shape.validate()?;

        let (cropped, crop) = crop_to_alpha(source, self.config.crop_padding)?;
        let contour = extract_contour(&alpha_mask(&cropped), &self.config.extract_options(shape))?;
        let normalized = normalize_contour(&contour, cropped.width(), cropped.height())?;

        let texture = prepare_texture(&cropped, &self.config.texture)?;

        let mut solid = SolidBuilder::new(&normalized, shape).build()?;
        assign_uvs(&mut solid, &UvLayout::new(normalized.frame, &texture));
        solid.mesh.compute_normals();

        log::debug!(
            "pillow mesh: {} vertices, {} triangles, texture {}x{}",
            solid.mesh.vertex_count(),
            solid.mesh.triangle_count(),
            texture.width(),
            texture.height()
        );

        Ok(PillowOutput {
            mesh: solid.mesh,
            layout: solid.layout,
            texture,
            contour,
            shape: normalized,
            crop,
            material: self.config.material,
        })
    }

    /// Build and export in one step.
    pub fn generate(&self, image_bytes: &[u8], shape: &ShapeConfig) -> Result<Vec<u8>> {
        self.build(image_bytes, shape)?.to_glb()
    }
}
