//! Texture coordinate assignment.

use super::solid::{SolidMesh, VertexRole};
use crate::texture::PreparedTexture;
use crate::types::Bounds2;
use glam::Vec2;

/// Where the caps and the seam sample the prepared texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvLayout {
    /// The picture's rectangle in model space.
    pub frame: Bounds2,
    /// Share of the texture height taken by the picture.
    pub image_fraction: f32,
    /// Fixed coordinate inside the seam band.
    pub seam_uv: [f32; 2],
}

impl UvLayout {
    pub fn new(frame: Bounds2, texture: &PreparedTexture) -> Self {
        Self {
            frame,
            image_fraction: texture.image_fraction(),
            seam_uv: texture.seam_uv(),
        }
    }

    /// Texture coordinate for a cap point.
    ///
    /// V grows downward in glTF, so the model's +Y maps to the top row of the
    /// picture, and V is scaled to stay clear of the seam band.
    pub fn cap_uv(&self, p: Vec2) -> [f32; 2] {
        let r = self.frame.relative(p);
        [r.x, (1.0 - r.y) * self.image_fraction]
    }
}

/// Fill in texture coordinates for every vertex of a built solid.
///
/// Front and back caps share the same planar projection; the back is not
/// mirrored because its reversed winding already shows it from behind. All
/// seam vertices sample the solid band.
///
/// The cap centre vertices are projected like every other cap point, at the
/// shape centroid, rather than pinned to `(0.5, 0.5 * image_fraction)`. The
/// two agree only when the centroid sits at the middle of the picture.
pub fn assign_uvs(solid: &mut SolidMesh, layout: &UvLayout) {
    let roles = solid.layout;
    for (index, vertex) in solid.mesh.vertices.iter_mut().enumerate() {
        vertex.uv = match roles.role(index) {
            Some(VertexRole::Seam) | None => layout.seam_uv,
            Some(_) => layout.cap_uv(Vec2::new(vertex.position[0], vertex.position[1])),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::config::ShapeConfig;
    use crate::mesher::solid::SolidBuilder;
    use crate::texture::{prepare_texture, TextureOptions};
    use crate::types::NormalizedShape;
    use image::{Rgba, RgbaImage};

    fn texture() -> PreparedTexture {
        let img = RgbaImage::from_pixel(32, 32, Rgba([255, 0, 0, 255]));
        prepare_texture(&img, &TextureOptions::default()).unwrap()
    }

    fn diamond() -> NormalizedShape {
        NormalizedShape {
            points: vec![
                Vec2::new(0.0, -0.4),
                Vec2::new(0.4, 0.0),
                Vec2::new(0.0, 0.4),
                Vec2::new(-0.4, 0.0),
            ],
            centroid: Vec2::ZERO,
            max_radius: 0.44,
            frame: Bounds2::new(Vec2::splat(-0.5), Vec2::splat(0.5)),
        }
    }

    #[test]
    fn test_cap_uv_orientation() {
        let tex = texture();
        let layout = UvLayout::new(Bounds2::new(Vec2::splat(-0.5), Vec2::splat(0.5)), &tex);
        let f = tex.image_fraction();

        assert_eq!(layout.cap_uv(Vec2::new(-0.5, 0.5)), [0.0, 0.0]);
        let [u, v] = layout.cap_uv(Vec2::new(0.5, -0.5));
        assert_eq!(u, 1.0);
        assert!((v - f).abs() < 1e-6);
        let [u, v] = layout.cap_uv(Vec2::ZERO);
        assert_eq!(u, 0.5);
        assert!((v - 0.5 * f).abs() < 1e-6);
    }

    #[test]
    fn test_assign_uvs_by_role() {
        let tex = texture();
        let shape = diamond();
        let config = ShapeConfig::default();
        let mut solid = SolidBuilder::new(&shape, &config).build().unwrap();
        let layout = UvLayout::new(shape.frame, &tex);
        assign_uvs(&mut solid, &layout);

        let roles = solid.layout;
        let v = &solid.mesh.vertices;
        let f = tex.image_fraction();

        for i in roles.front_rim().chain(roles.back_rim()) {
            assert!(v[i].uv[0] >= 0.0 && v[i].uv[0] <= 1.0);
            assert!(v[i].uv[1] >= 0.0 && v[i].uv[1] <= f + 1e-6);
        }
        // The centroid sits at the picture centre.
        for i in [roles.front_center(), roles.back_center()] {
            assert!((v[i].uv[0] - 0.5).abs() < 1e-6);
            assert!((v[i].uv[1] - 0.5 * f).abs() < 1e-6);
        }
        for i in roles.seam() {
            assert_eq!(v[i].uv, tex.seam_uv());
            assert!(v[i].uv[1] > f);
        }
    }

    #[test]
    fn test_back_uvs_match_front() {
        let tex = texture();
        let shape = diamond();
        let config = ShapeConfig::default();
        let mut solid = SolidBuilder::new(&shape, &config).build().unwrap();
        assign_uvs(&mut solid, &UvLayout::new(shape.frame, &tex));

        let roles = solid.layout;
        for (front, back) in roles.front_rim().zip(roles.back_rim()) {
            assert_eq!(solid.mesh.vertices[front].uv, solid.mesh.vertices[back].uv);
        }
    }

    #[test]
    fn test_off_centre_centroid_is_projected() {
        let tex = texture();
        let offset = Vec2::new(0.2, 0.1);
        let mut shape = diamond();
        for p in &mut shape.points {
            *p += offset;
        }
        shape.centroid = offset;

        let config = ShapeConfig::default();
        let mut solid = SolidBuilder::new(&shape, &config).build().unwrap();
        assign_uvs(&mut solid, &UvLayout::new(shape.frame, &tex));

        let f = tex.image_fraction();
        let centre = solid.mesh.vertices[solid.layout.front_center()].uv;
        assert!((centre[0] - 0.7).abs() < 1e-6, "centre uv {:?}", centre);
        assert!((centre[1] - 0.4 * f).abs() < 1e-6, "centre uv {:?}", centre);
    }
}
