//! Shared types used throughout the library.

mod preset;

pub use preset::{PuffinessPreset, ThicknessPreset};

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned 2D rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Map a point into `[0, 1]` relative to this rectangle. Degenerate
    /// axes use a range of 1 so the result stays finite.
    pub fn relative(&self, p: Vec2) -> Vec2 {
        let size = self.size();
        let range = Vec2::new(
            if size.x > 0.0 { size.x } else { 1.0 },
            if size.y > 0.0 { size.y } else { 1.0 },
        );
        ((p - self.min) / range).clamp(Vec2::ZERO, Vec2::ONE)
    }
}

/// A closed silhouette polygon in cropped-pixel space (Y down).
///
/// The closing edge from the last point back to the first is implicit;
/// the first point is never repeated at the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<IVec2>,
}

impl Contour {
    pub fn new(points: Vec<IVec2>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Length of the closed outline in pixels.
    pub fn perimeter(&self) -> f64 {
        closed_edges(&self.points)
            .map(|(a, b)| (b - a).as_dvec2().length())
            .sum()
    }

    /// Shoelace area. Positive for counter-clockwise order in a Y-up frame,
    /// which reads as clockwise on screen.
    pub fn signed_area(&self) -> f64 {
        closed_edges(&self.points)
            .map(|(a, b)| a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64)
            .sum::<f64>()
            * 0.5
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }
}

/// The contour in a centred, aspect-correct, Y-up frame.
///
/// Points are counter-clockwise. The image frame spans `[-aspect/2, aspect/2]`
/// horizontally and `[-0.5, 0.5]` vertically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedShape {
    pub points: Vec<Vec2>,
    /// Arithmetic mean of `points`.
    pub centroid: Vec2,
    /// 1.1x the largest centroid-to-point distance; bounds the dome falloff.
    pub max_radius: f32,
    /// The cropped image rectangle in the same frame.
    pub frame: Bounds2,
}

impl NormalizedShape {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding rectangle of the outline itself.
    pub fn bounds(&self) -> Bounds2 {
        Bounds2::from_points(self.points.iter().copied())
            .unwrap_or_else(|| Bounds2::new(Vec2::ZERO, Vec2::ZERO))
    }

    pub fn signed_area(&self) -> f32 {
        closed_edges(&self.points)
            .map(|(a, b)| a.perp_dot(b))
            .sum::<f32>()
            * 0.5
    }

    /// Unit direction from the centroid towards point `i`.
    ///
    /// A point sitting on the centroid falls back to the outward normal
    /// of its outgoing edge.
    pub fn radial_direction(&self, i: usize) -> Vec2 {
        let p = self.points[i];
        if let Some(dir) = (p - self.centroid).try_normalize() {
            return dir;
        }
        let next = self.points[(i + 1) % self.points.len()];
        let edge = next - p;
        // Outward side of a counter-clockwise edge.
        Vec2::new(edge.y, -edge.x).try_normalize().unwrap_or(Vec2::X)
    }
}

/// Iterate over the edges of a closed polygon, including the closing edge.
pub(crate) fn closed_edges<T: Copy>(points: &[T]) -> impl Iterator<Item = (T, T)> + '_ {
    let n = points.len();
    (0..n).map(move |i| (points[i], points[(i + 1) % n]))
}
