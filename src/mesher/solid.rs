//! Solid pillow construction: front cap, back cap, and the seam ribbon.
//!
//! Vertices are laid out in a fixed order so later stages can tell the
//! parts apart without extra bookkeeping:
//!
//! ```text
//! [front rim: n] [front centre] [back rim: n] [back centre] [seam: n * (s + 1)]
//! ```
//!
//! Seam vertices are stored column by column: all `s + 1` rings of contour
//! point 0 first, from the front rim to the back rim.

use super::config::ShapeConfig;
use super::geometry::{Mesh, Vertex};
use crate::error::{MesherError, Result};
use crate::types::NormalizedShape;
use glam::Vec2;
use std::f32::consts::PI;
use std::ops::Range;

/// Dome falloff exponent. Above 1 flattens the top compared to a cone.
const FALLOFF_EXPONENT: f32 = 1.5;

/// Which part of the solid a vertex belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexRole {
    FrontRim,
    FrontCenter,
    BackRim,
    BackCenter,
    Seam,
}

/// Index layout of a built solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidLayout {
    /// Number of contour points.
    pub contour_len: usize,
    /// Seam subdivisions; each column has `subdivisions + 1` vertices.
    pub subdivisions: usize,
}

impl SolidLayout {
    pub fn front_rim(&self) -> Range<usize> {
        0..self.contour_len
    }

    pub fn front_center(&self) -> usize {
        self.contour_len
    }

    pub fn back_rim(&self) -> Range<usize> {
        let start = self.contour_len + 1;
        start..start + self.contour_len
    }

    pub fn back_center(&self) -> usize {
        2 * self.contour_len + 1
    }

    pub fn seam(&self) -> Range<usize> {
        let start = 2 * self.contour_len + 2;
        start..start + self.contour_len * self.column_len()
    }

    /// Vertices per seam column.
    pub fn column_len(&self) -> usize {
        self.subdivisions + 1
    }

    pub fn vertex_count(&self) -> usize {
        self.seam().end
    }

    pub fn cap_triangle_count(&self) -> usize {
        self.contour_len
    }

    pub fn seam_triangle_count(&self) -> usize {
        self.contour_len * self.subdivisions * 2
    }

    pub fn triangle_count(&self) -> usize {
        2 * self.cap_triangle_count() + self.seam_triangle_count()
    }

    /// Classify a vertex index.
    pub fn role(&self, index: usize) -> Option<VertexRole> {
        if self.front_rim().contains(&index) {
            Some(VertexRole::FrontRim)
        } else if index == self.front_center() {
            Some(VertexRole::FrontCenter)
        } else if self.back_rim().contains(&index) {
            Some(VertexRole::BackRim)
        } else if index == self.back_center() {
            Some(VertexRole::BackCenter)
        } else if self.seam().contains(&index) {
            Some(VertexRole::Seam)
        } else {
            None
        }
    }
}

/// A built solid: positions and winding only, UVs and normals still default.
#[derive(Debug, Clone)]
pub struct SolidMesh {
    pub mesh: Mesh,
    pub layout: SolidLayout,
}

/// Builds the closed pillow solid from a normalized outline.
pub struct SolidBuilder<'a> {
    shape: &'a NormalizedShape,
    config: &'a ShapeConfig,
}

impl<'a> SolidBuilder<'a> {
    pub fn new(shape: &'a NormalizedShape, config: &'a ShapeConfig) -> Self {
        Self { shape, config }
    }

    /// Height of the front cap above the rim plane at `p`.
    pub fn front_z(&self, p: Vec2) -> f32 {
        self.falloff(p, self.config.effective_front_puffiness())
    }

    /// Depth of the back cap at `p`.
    pub fn back_z(&self, p: Vec2) -> f32 {
        -(self.config.thickness - self.falloff(p, self.config.effective_back_puffiness()))
    }

    /// Outward seam offset at `t` in `[0, 1]` from the front rim to the back rim.
    pub fn bulge(&self, t: f32) -> f32 {
        self.config.border_width * (t * PI).sin()
    }

    fn falloff(&self, p: Vec2, height: f32) -> f32 {
        if height == 0.0 {
            return 0.0;
        }
        let r = p.distance(self.shape.centroid) / self.shape.max_radius;
        height * (1.0 - r.powf(FALLOFF_EXPONENT)).max(0.0)
    }

    /// Run the three construction phases: front cap, back cap, seam.
    pub fn build(&self) -> Result<SolidMesh> {
        self.config.validate()?;
        let n = self.shape.len();
        if n < 3 {
            return Err(MesherError::Geometry(format!(
                "need at least 3 outline points, got {}",
                n
            )));
        }

        let layout = SolidLayout {
            contour_len: n,
            subdivisions: self.config.seam_subdivisions as usize,
        };
        if layout.vertex_count() > u32::MAX as usize {
            return Err(MesherError::Geometry(format!(
                "{} vertices exceed the u32 index range",
                layout.vertex_count()
            )));
        }

        let mut mesh = Mesh::new();
        mesh.vertices.reserve(layout.vertex_count());
        mesh.indices.reserve(layout.triangle_count() * 3);

        self.add_front_cap(&mut mesh);
        self.add_back_cap(&mut mesh);
        self.add_seam(&mut mesh, &layout);

        debug_assert_eq!(mesh.vertex_count(), layout.vertex_count());
        debug_assert_eq!(mesh.triangle_count(), layout.triangle_count());
        log::debug!(
            "built solid: {} outline points, {} vertices, {} triangles",
            n,
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        Ok(SolidMesh { mesh, layout })
    }

    /// Fan around the centroid, counter-clockwise seen from +Z.
    fn add_front_cap(&self, mesh: &mut Mesh) {
        let start = mesh.vertex_count() as u32;
        for &p in &self.shape.points {
            mesh.add_vertex(Vertex::at([p.x, p.y, self.front_z(p)]));
        }
        let c = self.shape.centroid;
        let center = mesh.add_vertex(Vertex::at([
            c.x,
            c.y,
            self.config.effective_front_puffiness(),
        ]));

        let n = self.shape.len() as u32;
        for i in 0..n {
            mesh.add_triangle(center, start + i, start + (i + 1) % n);
        }
    }

    /// Same fan with reversed winding so it faces -Z.
    fn add_back_cap(&self, mesh: &mut Mesh) {
        let start = mesh.vertex_count() as u32;
        for &p in &self.shape.points {
            mesh.add_vertex(Vertex::at([p.x, p.y, self.back_z(p)]));
        }
        let c = self.shape.centroid;
        let center = mesh.add_vertex(Vertex::at([
            c.x,
            c.y,
            -(self.config.thickness - self.config.effective_back_puffiness()),
        ]));

        let n = self.shape.len() as u32;
        for i in 0..n {
            mesh.add_triangle(center, start + (i + 1) % n, start + i);
        }
    }

    /// Ribbon joining the two rims, bulging outward along the radial direction.
    fn add_seam(&self, mesh: &mut Mesh, layout: &SolidLayout) {
        let start = mesh.vertex_count() as u32;
        let steps = layout.subdivisions;

        for (i, &p) in self.shape.points.iter().enumerate() {
            let dir = self.shape.radial_direction(i);
            let (z_front, z_back) = (self.front_z(p), self.back_z(p));
            for j in 0..=steps {
                // The end rings reuse the cap positions exactly so the solid is closed.
                let (bulge, z) = if j == 0 {
                    (0.0, z_front)
                } else if j == steps {
                    (0.0, z_back)
                } else {
                    let t = j as f32 / steps as f32;
                    (self.bulge(t), z_front + (z_back - z_front) * t)
                };
                let q = p + dir * bulge;
                mesh.add_vertex(Vertex::at([q.x, q.y, z]));
            }
        }

        let n = layout.contour_len as u32;
        let column = layout.column_len() as u32;
        for i in 0..n {
            let curr = start + i * column;
            let next = start + ((i + 1) % n) * column;
            for j in 0..steps as u32 {
                let v0 = curr + j;
                let v1 = curr + j + 1;
                let v2 = next + j + 1;
                let v3 = next + j;
                mesh.add_triangle(v0, v1, v2);
                mesh.add_triangle(v0, v2, v3);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bounds2;
    use glam::Vec3;

    fn circle(n: usize, radius: f32) -> NormalizedShape {
        let points: Vec<Vec2> = (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                Vec2::new(a.cos(), a.sin()) * radius
            })
            .collect();
        NormalizedShape {
            points,
            centroid: Vec2::ZERO,
            max_radius: radius * 1.1,
            frame: Bounds2::new(Vec2::splat(-0.5), Vec2::splat(0.5)),
        }
    }

    fn puffy() -> ShapeConfig {
        ShapeConfig {
            thickness: 0.12,
            front_puffiness: 0.06,
            back_puffiness: 0.03,
            border_width: 0.02,
            seam_subdivisions: 4,
            simplify_tolerance: 0.004,
            flat: false,
        }
    }

    #[test]
    fn test_counts_match_layout() {
        let shape = circle(24, 0.4);
        let config = puffy();
        let solid = SolidBuilder::new(&shape, &config).build().unwrap();

        let layout = solid.layout;
        assert_eq!(layout.seam().len(), 24 * 5);
        assert_eq!(layout.seam_triangle_count(), 24 * 4 * 2);
        assert_eq!(solid.mesh.vertex_count(), 2 * 25 + 24 * 5);
        assert_eq!(solid.mesh.triangle_count(), 2 * 24 + 24 * 4 * 2);
        assert!(solid.mesh.find_invalid_index().is_none());
    }

    #[test]
    fn test_dome_heights() {
        let shape = circle(32, 0.4);
        let config = puffy();
        let solid = SolidBuilder::new(&shape, &config).build().unwrap();
        let layout = solid.layout;
        let v = &solid.mesh.vertices;

        assert!((v[layout.front_center()].position[2] - 0.06).abs() < 1e-6);
        assert!((v[layout.back_center()].position[2] + (0.12 - 0.03)).abs() < 1e-6);
        for i in layout.front_rim() {
            assert!(v[i].position[2].abs() < 0.01, "rim z {}", v[i].position[2]);
        }
        for i in layout.back_rim() {
            assert!((v[i].position[2] + 0.12).abs() < 0.01);
        }
    }

    #[test]
    fn test_front_z_decreases_with_distance() {
        let shape = circle(16, 0.4);
        let config = puffy();
        let builder = SolidBuilder::new(&shape, &config);
        let mut last = f32::INFINITY;
        for step in 0..=20 {
            let z = builder.front_z(Vec2::new(step as f32 * 0.025, 0.0));
            assert!(z <= last);
            assert!(z >= 0.0);
            last = z;
        }
        // Beyond max_radius the falloff clamps at zero.
        assert_eq!(builder.front_z(Vec2::new(2.0, 0.0)), 0.0);
    }

    #[test]
    fn test_flat_mode_has_no_dome() {
        let shape = circle(32, 0.4);
        let config = ShapeConfig { flat: true, ..puffy() };
        let solid = SolidBuilder::new(&shape, &config).build().unwrap();
        let layout = solid.layout;

        let zs: Vec<f32> = layout
            .front_rim()
            .chain(std::iter::once(layout.front_center()))
            .map(|i| solid.mesh.vertices[i].position[2])
            .collect();
        let mean = zs.iter().sum::<f32>() / zs.len() as f32;
        assert!(zs.iter().all(|z| (z - mean).abs() < 1e-6));
        assert!(mean.abs() < 1e-6);
        assert!((solid.mesh.vertices[layout.back_center()].position[2] + 0.12).abs() < 1e-6);
    }

    #[test]
    fn test_seam_bulges_outward_at_midline() {
        let shape = circle(8, 0.4);
        let config = ShapeConfig { seam_subdivisions: 2, ..puffy() };
        let solid = SolidBuilder::new(&shape, &config).build().unwrap();
        let seam_start = solid.layout.seam().start;
        let v = &solid.mesh.vertices;

        let radius = |i: usize| Vec2::new(v[i].position[0], v[i].position[1]).length();
        // Column 0: front rim, midline, back rim.
        assert!((radius(seam_start) - 0.4).abs() < 1e-5);
        assert!((radius(seam_start + 1) - 0.42).abs() < 1e-5);
        assert!((radius(seam_start + 2) - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_seam_meets_caps() {
        let shape = circle(12, 0.3);
        let config = puffy();
        let solid = SolidBuilder::new(&shape, &config).build().unwrap();
        let layout = solid.layout;
        let v = &solid.mesh.vertices;
        for (k, (front, back)) in layout.front_rim().zip(layout.back_rim()).enumerate() {
            let column = layout.seam().start + k * layout.column_len();
            assert_eq!(v[column].position, v[front].position);
            assert_eq!(v[column + layout.subdivisions].position, v[back].position);
        }
    }

    #[test]
    fn test_face_normals_point_outward() {
        let shape = circle(16, 0.4);
        let config = puffy();
        let solid = SolidBuilder::new(&shape, &config).build().unwrap();
        let mesh = &solid.mesh;
        let layout = solid.layout;

        for (t, tri) in mesh.indices.chunks_exact(3).enumerate() {
            let p: Vec<Vec3> = tri.iter().map(|&i| Vec3::from(mesh.vertices[i as usize].position)).collect();
            let normal = (p[1] - p[0]).cross(p[2] - p[0]);
            let centre = (p[0] + p[1] + p[2]) / 3.0;
            let outward = if t < layout.cap_triangle_count() {
                Vec3::Z
            } else if t < 2 * layout.cap_triangle_count() {
                -Vec3::Z
            } else {
                Vec3::new(centre.x, centre.y, 0.0)
            };
            assert!(normal.dot(outward) > 0.0, "triangle {} faces inward", t);
        }
    }

    #[test]
    fn test_roles() {
        let layout = SolidLayout { contour_len: 3, subdivisions: 1 };
        assert_eq!(layout.role(0), Some(VertexRole::FrontRim));
        assert_eq!(layout.role(3), Some(VertexRole::FrontCenter));
        assert_eq!(layout.role(4), Some(VertexRole::BackRim));
        assert_eq!(layout.role(7), Some(VertexRole::BackCenter));
        assert_eq!(layout.role(8), Some(VertexRole::Seam));
        assert_eq!(layout.role(13), Some(VertexRole::Seam));
        assert_eq!(layout.role(14), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let shape = circle(8, 0.4);
        let config = ShapeConfig { seam_subdivisions: 0, ..puffy() };
        let err = SolidBuilder::new(&shape, &config).build().unwrap_err();
        assert!(matches!(err, MesherError::InvalidConfig(_)));
    }
}
