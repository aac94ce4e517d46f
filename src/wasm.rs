//! WASM bindings for pillow-mesher.
//!
//! This module provides JavaScript-friendly APIs for use in the browser.

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

/// Shape options, starting from a preset pair.
#[wasm_bindgen]
pub struct ShapeOptions {
    inner: crate::ShapeConfig,
    seam_color: Option<[u8; 3]>,
}

#[wasm_bindgen]
impl ShapeOptions {
    /// Create options from preset names (`thin|medium|thick`, `flat|medium|puffy`).
    /// Unknown names fall back to `medium`.
    #[wasm_bindgen(constructor)]
    pub fn new(thickness: &str, puffiness: &str) -> ShapeOptions {
        ShapeOptions {
            inner: crate::ShapeConfig::from_preset_names(thickness, puffiness),
            seam_color: None,
        }
    }

    #[wasm_bindgen(setter)]
    pub fn set_seam_subdivisions(&mut self, value: u32) {
        self.inner.seam_subdivisions = value;
    }

    #[wasm_bindgen(setter)]
    pub fn set_simplify_tolerance(&mut self, value: f64) {
        self.inner.simplify_tolerance = value;
    }

    #[wasm_bindgen(setter)]
    pub fn set_border_width(&mut self, value: f32) {
        self.inner.border_width = value;
    }

    /// Seam band colour as 0xRRGGBB.
    #[wasm_bindgen(setter)]
    pub fn set_seam_color(&mut self, value: u32) {
        self.seam_color = Some([(value >> 16) as u8, (value >> 8) as u8, value as u8]);
    }
}

/// Mesh result containing GLB data.
#[wasm_bindgen]
pub struct PillowResult {
    glb_data: Vec<u8>,
    vertex_count: usize,
    triangle_count: usize,
    contour_points: usize,
}

#[wasm_bindgen]
impl PillowResult {
    /// Get the GLB binary data.
    #[wasm_bindgen(getter)]
    pub fn glb_data(&self) -> Vec<u8> {
        self.glb_data.clone()
    }

    /// Get the total vertex count.
    #[wasm_bindgen(getter)]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Get the total triangle count.
    #[wasm_bindgen(getter)]
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Get the number of outline points.
    #[wasm_bindgen(getter)]
    pub fn contour_points(&self) -> usize {
        self.contour_points
    }
}

/// Build a pillow from PNG bytes with a transparent background.
#[wasm_bindgen(js_name = generatePillow)]
pub fn generate_pillow(image: &[u8], options: Option<ShapeOptions>) -> Result<PillowResult, JsError> {
    let options = options.unwrap_or_else(|| ShapeOptions::new("medium", "medium"));

    let mut config = crate::MesherConfig::default();
    if let Some(color) = options.seam_color {
        config = config.with_seam_color(color);
    }

    let mesher = crate::PillowMesher::with_config(config);
    let output = mesher
        .build(image, &options.inner)
        .map_err(|e| JsError::new(&e.to_string()))?;

    let glb_data = output.to_glb().map_err(|e| JsError::new(&e.to_string()))?;

    Ok(PillowResult {
        glb_data,
        vertex_count: output.total_vertices(),
        triangle_count: output.total_triangles(),
        contour_points: output.contour.len(),
    })
}

/// Build a pillow from preset names and return only the GLB bytes.
#[wasm_bindgen(js_name = generatePillowGlb)]
pub fn generate_pillow_glb(image: &[u8], thickness: &str, puffiness: &str) -> Result<Vec<u8>, JsError> {
    crate::generate_glb_from_presets(image, thickness, puffiness)
        .map_err(|e| JsError::new(&e.to_string()))
}
