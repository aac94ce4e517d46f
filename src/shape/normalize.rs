//! Mapping pixel outlines into the centred model frame.

use crate::error::{MesherError, Result};
use crate::types::{Bounds2, Contour, NormalizedShape};
use glam::Vec2;

/// Map a pixel contour of a `width` x `height` crop into the model frame.
///
/// `x' = (x / width - 0.5) * aspect` and `y' = -(y / height - 0.5)`: the
/// image height spans one unit, Y points up. The result is reordered to be
/// counter-clockwise.
pub fn normalize_contour(contour: &Contour, width: u32, height: u32) -> Result<NormalizedShape> {
    if width == 0 || height == 0 {
        return Err(MesherError::ShapeExtraction(format!(
            "cannot normalize against an empty {}x{} image",
            width, height
        )));
    }
    if contour.len() < 3 {
        return Err(MesherError::ShapeExtraction(format!(
            "outline has only {} points",
            contour.len()
        )));
    }

    let (w, h) = (width as f32, height as f32);
    let aspect = w / h;
    let points: Vec<Vec2> = contour
        .points
        .iter()
        .map(|p| Vec2::new((p.x as f32 / w - 0.5) * aspect, -(p.y as f32 / h - 0.5)))
        .collect();

    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    let max_dist = points
        .iter()
        .map(|p| p.distance(centroid))
        .fold(0.0f32, f32::max);
    if max_dist <= 0.0 {
        return Err(MesherError::ShapeExtraction(
            "outline collapses to a single point".to_string(),
        ));
    }

    let frame = Bounds2::new(Vec2::new(-0.5 * aspect, -0.5), Vec2::new(0.5 * aspect, 0.5));
    let mut shape = NormalizedShape {
        points,
        centroid,
        max_radius: max_dist * 1.1,
        frame,
    };
    if shape.signed_area() < 0.0 {
        shape.points.reverse();
    }

    Ok(shape)
}
