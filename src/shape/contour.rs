//! Alpha-channel contour extraction.

use crate::error::{MesherError, Result};
use crate::shape::simplify::{dedup_closed, simplify_closed};
use crate::types::Contour;
use glam::IVec2;
use image::{GrayImage, Luma, RgbaImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::filter::gaussian_blur_f32;
use imageproc::map::map_pixels;
use serde::{Deserialize, Serialize};

/// Tuning for [`extract_contour`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Pixels with alpha strictly above this value are inside the shape.
    pub alpha_threshold: u8,
    /// Sigma of the denoising blur. `0.0` disables it.
    pub blur_sigma: f32,
    /// Douglas-Peucker tolerance as a fraction of the outline perimeter.
    pub simplify_tolerance: f64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            alpha_threshold: 127,
            blur_sigma: 0.8,
            simplify_tolerance: 0.004,
        }
    }
}

/// Pixel rectangle cut out of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Crop the image to the bounding box of its non-transparent pixels,
/// grown by `padding` on every side and clamped to the image.
pub fn crop_to_alpha(image: &RgbaImage, padding: u32) -> Result<(RgbaImage, CropRect)> {
    let (width, height) = image.dimensions();
    let mut min = (u32::MAX, u32::MAX);
    let mut max = (0u32, 0u32);
    let mut any = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] > 0 {
            any = true;
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }
    }

    if !any {
        return Err(MesherError::ShapeExtraction(
            "image is fully transparent".to_string(),
        ));
    }

    let x0 = min.0.saturating_sub(padding);
    let y0 = min.1.saturating_sub(padding);
    let x1 = max.0.saturating_add(1).saturating_add(padding).min(width);
    let y1 = max.1.saturating_add(1).saturating_add(padding).min(height);
    let rect = CropRect {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    };

    let cropped = image::imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image();
    log::debug!("cropped {}x{} image to {:?}", width, height, rect);
    Ok((cropped, rect))
}

/// Split out the alpha channel as a single-channel mask.
pub fn alpha_mask(image: &RgbaImage) -> GrayImage {
    map_pixels(image, |_x, _y, p| Luma([p[3]]))
}

/// Extract the outline of the largest opaque region of an alpha mask.
///
/// The mask is binarized, blurred and re-binarized to drop single-pixel
/// noise, traced, and the outer border enclosing the largest area is
/// simplified. Fails with [`MesherError::ShapeExtraction`] when nothing is
/// opaque or the outline degenerates below three points.
pub fn extract_contour(alpha: &GrayImage, options: &ExtractOptions) -> Result<Contour> {
    let binary = binarize(alpha, options.alpha_threshold);
    if !binary.pixels().any(|p| p[0] > 0) {
        return Err(MesherError::ShapeExtraction(format!(
            "no pixel has alpha above {}",
            options.alpha_threshold
        )));
    }

    let mask = if options.blur_sigma > 0.0 {
        let smoothed = binarize(&gaussian_blur_f32(&binary, options.blur_sigma), 127);
        // Shapes thinner than the blur vanish entirely; keep the raw mask then.
        if smoothed.pixels().any(|p| p[0] > 0) {
            smoothed
        } else {
            binary
        }
    } else {
        binary
    };

    // Border following misses regions touching the frame, so trace inside a
    // one pixel transparent margin and shift the points back.
    let mut framed = GrayImage::new(mask.width() + 2, mask.height() + 2);
    image::imageops::replace(&mut framed, &mask, 1, 1);

    let outline = find_contours::<i32>(&framed)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer))
        .map(|c| Contour::new(c.points.iter().map(|p| IVec2::new(p.x - 1, p.y - 1)).collect()))
        .max_by(|a, b| a.area().total_cmp(&b.area()))
        .ok_or_else(|| MesherError::ShapeExtraction("no outer border found".to_string()))?;

    let epsilon = options.simplify_tolerance * outline.perimeter();
    let mut points = simplify_closed(&outline.points, epsilon);
    dedup_closed(&mut points);
    log::debug!(
        "traced {} border points, simplified to {} (epsilon {:.2}px)",
        outline.len(),
        points.len(),
        epsilon
    );

    let contour = Contour::new(points);
    if contour.len() < 3 {
        return Err(MesherError::ShapeExtraction(format!(
            "outline has only {} points after simplification",
            contour.len()
        )));
    }
    if contour.area() <= 0.0 {
        return Err(MesherError::ShapeExtraction(
            "outline encloses no area".to_string(),
        ));
    }

    Ok(contour)
}

fn binarize(image: &GrayImage, threshold: u8) -> GrayImage {
    map_pixels(image, |_x, _y, p| {
        if p[0] > threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
