//! glTF/GLB export.

use crate::error::{MesherError, Result};
use crate::mesher::geometry::Mesh;
use crate::texture::PreparedTexture;
use gltf_json as json;
use json::validation::Checked::Valid;
use json::validation::USize64;
use serde::{Deserialize, Serialize};
use std::mem;

/// Content type for the exported bytes.
pub const GLB_MIME_TYPE: &str = "model/gltf-binary";

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F534A;
const CHUNK_BIN: u32 = 0x004E4942;

/// PBR parameters of the single pillow material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialOptions {
    pub metallic: f32,
    pub roughness: f32,
}

impl Default for MaterialOptions {
    fn default() -> Self {
        Self {
            metallic: 0.0,
            roughness: 0.6,
        }
    }
}

/// Export a textured mesh to GLB format (binary glTF).
///
/// The file holds exactly one mesh with one primitive, one material, and one
/// embedded PNG image. Vertices are written as given: nothing is merged, so
/// coincident cap and seam vertices keep their own texture coordinates.
pub fn export_glb(mesh: &Mesh, texture: &PreparedTexture, material: &MaterialOptions) -> Result<Vec<u8>> {
    if mesh.is_empty() || mesh.indices.is_empty() {
        return Err(MesherError::Export("Cannot export empty mesh".to_string()));
    }
    if mesh.indices.len() % 3 != 0 {
        return Err(MesherError::Export(format!(
            "Index count {} is not a multiple of 3",
            mesh.indices.len()
        )));
    }
    if let Some(at) = mesh.find_invalid_index() {
        return Err(MesherError::Export(format!(
            "Index {} at position {} is out of range for {} vertices",
            mesh.indices[at],
            at,
            mesh.vertex_count()
        )));
    }

    let texture_png = texture.to_png()?;

    // Build the binary buffer: attributes, indices, then the image.
    let mut buffer_data: Vec<u8> = Vec::new();

    let positions = mesh.positions_flat();
    let normals = mesh.normals_flat();
    let uvs = mesh.uvs_flat();

    let pos_offset = buffer_data.len();
    buffer_data.extend_from_slice(bytemuck_cast_slice(&positions));
    let norm_offset = buffer_data.len();
    buffer_data.extend_from_slice(bytemuck_cast_slice(&normals));
    let uv_offset = buffer_data.len();
    buffer_data.extend_from_slice(bytemuck_cast_slice(&uvs));
    let idx_offset = buffer_data.len();
    buffer_data.extend_from_slice(bytemuck_cast_slice(&mesh.indices));
    let idx_end = buffer_data.len();

    // Append texture PNG (aligned to 4 bytes)
    let texture_padding = (4 - (buffer_data.len() % 4)) % 4;
    buffer_data.extend(std::iter::repeat(0u8).take(texture_padding));
    let texture_offset = buffer_data.len();
    buffer_data.extend_from_slice(&texture_png);

    let total_buffer_size = buffer_data.len();

    let (min, max) = mesh
        .bounds()
        .ok_or_else(|| MesherError::Export("Cannot compute bounds of empty mesh".to_string()))?;
    let vertex_count = mesh.vertex_count();

    let buffer_views = vec![
        create_buffer_view(pos_offset, norm_offset - pos_offset, Some(json::buffer::Target::ArrayBuffer)),
        create_buffer_view(norm_offset, uv_offset - norm_offset, Some(json::buffer::Target::ArrayBuffer)),
        create_buffer_view(uv_offset, idx_offset - uv_offset, Some(json::buffer::Target::ArrayBuffer)),
        create_buffer_view(idx_offset, idx_end - idx_offset, Some(json::buffer::Target::ElementArrayBuffer)),
        create_buffer_view(texture_offset, texture_png.len(), None),
    ];

    let accessors = vec![
        create_accessor(0, vertex_count, json::accessor::Type::Vec3, json::accessor::ComponentType::F32, Some(min), Some(max)),
        create_accessor(1, vertex_count, json::accessor::Type::Vec3, json::accessor::ComponentType::F32, None, None),
        create_accessor(2, vertex_count, json::accessor::Type::Vec2, json::accessor::ComponentType::F32, None, None),
        create_accessor(3, mesh.indices.len(), json::accessor::Type::Scalar, json::accessor::ComponentType::U32, None, None),
    ];

    let root = json::Root {
        accessors,
        buffers: vec![json::Buffer {
            byte_length: USize64(total_buffer_size as u64),
            extensions: Default::default(),
            extras: Default::default(),
            uri: None,
        }],
        buffer_views,
        images: vec![json::Image {
            buffer_view: Some(json::Index::new(4)),
            mime_type: Some(json::image::MimeType("image/png".to_string())),
            uri: None,
            extensions: Default::default(),
            extras: Default::default(),
        }],
        samplers: vec![json::texture::Sampler {
            mag_filter: Some(Valid(json::texture::MagFilter::Linear)),
            min_filter: Some(Valid(json::texture::MinFilter::Linear)),
            wrap_s: Valid(json::texture::WrappingMode::ClampToEdge),
            wrap_t: Valid(json::texture::WrappingMode::ClampToEdge),
            extensions: Default::default(),
            extras: Default::default(),
        }],
        textures: vec![json::Texture {
            sampler: Some(json::Index::new(0)),
            source: json::Index::new(0),
            extensions: Default::default(),
            extras: Default::default(),
        }],
        materials: vec![create_material(material, 0)],
        meshes: vec![json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            primitives: vec![create_primitive(0, 3, 0)],
            weights: None,
        }],
        nodes: vec![json::Node {
            camera: None,
            children: None,
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: Some(json::Index::new(0)),
            rotation: None,
            scale: None,
            translation: None,
            skin: None,
            weights: None,
        }],
        scenes: vec![json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            nodes: vec![json::Index::new(0)],
        }],
        scene: Some(json::Index::new(0)),
        ..Default::default()
    };

    // Serialize JSON
    let json_string = json::serialize::to_string(&root)
        .map_err(|e| MesherError::Export(format!("Failed to serialize glTF JSON: {}", e)))?;
    let glb = write_glb(json_string.as_bytes(), &buffer_data)?;

    log::debug!(
        "exported GLB: {} vertices, {} triangles, {}x{} texture, {} bytes",
        vertex_count,
        mesh.triangle_count(),
        texture.width(),
        texture.height(),
        glb.len()
    );
    Ok(glb)
}

/// Assemble the GLB container from a JSON document and a binary buffer.
fn write_glb(json_bytes: &[u8], buffer_data: &[u8]) -> Result<Vec<u8>> {
    // Pad JSON to 4-byte alignment
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let padded_json_len = json_bytes.len() + json_padding;

    // Pad buffer to 4-byte alignment
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let padded_buffer_len = buffer_data.len() + buffer_padding;

    // Calculate total size
    let total_size = 12 + // GLB header
        8 + padded_json_len + // JSON chunk
        8 + padded_buffer_len; // BIN chunk

    let total_size_u32 = u32::try_from(total_size)
        .map_err(|_| MesherError::Export(format!("GLB of {} bytes exceeds 4 GiB", total_size)))?;

    let mut glb = Vec::with_capacity(total_size);

    // GLB Header
    glb.extend_from_slice(GLB_MAGIC);
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&total_size_u32.to_le_bytes());

    // JSON Chunk
    glb.extend_from_slice(&(padded_json_len as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(json_bytes);
    glb.extend_from_slice(&vec![0x20u8; json_padding]); // padding (spaces)

    // BIN Chunk
    glb.extend_from_slice(&(padded_buffer_len as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    glb.extend_from_slice(buffer_data);
    glb.extend_from_slice(&vec![0u8; buffer_padding]); // padding (zeros)

    Ok(glb)
}

/// Create a buffer view.
fn create_buffer_view(
    offset: usize,
    size: usize,
    target: Option<json::buffer::Target>,
) -> json::buffer::View {
    json::buffer::View {
        buffer: json::Index::new(0),
        byte_length: USize64(size as u64),
        byte_offset: Some(USize64(offset as u64)),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        target: target.map(Valid),
    }
}

/// Create an accessor.
fn create_accessor(
    buffer_view: u32,
    count: usize,
    type_: json::accessor::Type,
    component_type: json::accessor::ComponentType,
    min: Option<[f32; 3]>,
    max: Option<[f32; 3]>,
) -> json::Accessor {
    json::Accessor {
        buffer_view: Some(json::Index::new(buffer_view)),
        byte_offset: Some(USize64(0)),
        count: USize64(count as u64),
        component_type: Valid(json::accessor::GenericComponentType(component_type)),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(type_),
        min: min.map(|m| json::Value::from(m.to_vec())),
        max: max.map(|m| json::Value::from(m.to_vec())),
        normalized: false,
        sparse: None,
    }
}

/// Create the triangle primitive. Accessors follow the order
/// positions, normals, texcoords, indices.
fn create_primitive(
    positions_accessor: u32,
    indices_accessor: u32,
    material: u32,
) -> json::mesh::Primitive {
    let mut attributes = std::collections::BTreeMap::new();
    attributes.insert(
        Valid(json::mesh::Semantic::Positions),
        json::Index::new(positions_accessor),
    );
    attributes.insert(
        Valid(json::mesh::Semantic::Normals),
        json::Index::new(positions_accessor + 1),
    );
    attributes.insert(
        Valid(json::mesh::Semantic::TexCoords(0)),
        json::Index::new(positions_accessor + 2),
    );

    json::mesh::Primitive {
        attributes,
        extensions: Default::default(),
        extras: Default::default(),
        indices: Some(json::Index::new(indices_accessor)),
        material: Some(json::Index::new(material)),
        mode: Valid(json::mesh::Mode::Triangles),
        targets: None,
    }
}

/// Create the opaque base-colour material.
fn create_material(options: &MaterialOptions, texture_idx: u32) -> json::Material {
    json::Material {
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_texture: Some(json::texture::Info {
                index: json::Index::new(texture_idx),
                tex_coord: 0,
                extensions: Default::default(),
                extras: Default::default(),
            }),
            base_color_factor: json::material::PbrBaseColorFactor([1.0, 1.0, 1.0, 1.0]),
            metallic_factor: json::material::StrengthFactor(options.metallic),
            roughness_factor: json::material::StrengthFactor(options.roughness),
            metallic_roughness_texture: None,
            extensions: Default::default(),
            extras: Default::default(),
        },
        alpha_mode: Valid(json::material::AlphaMode::Opaque),
        alpha_cutoff: None,
        double_sided: false,
        normal_texture: None,
        occlusion_texture: None,
        emissive_texture: None,
        emissive_factor: json::material::EmissiveFactor([0.0, 0.0, 0.0]),
        extensions: Default::default(),
        extras: Default::default(),
    }
}

/// Cast a slice of T to a slice of bytes.
fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    let ptr = slice.as_ptr() as *const u8;
    let len = slice.len() * mem::size_of::<T>();
    // SAFETY: only called with f32 and u32 slices, which have no padding.
    unsafe { std::slice::from_raw_parts(ptr, len) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::geometry::Vertex;
    use crate::texture::{prepare_texture, TextureOptions};
    use image::{Rgba, RgbaImage};

    fn texture() -> PreparedTexture {
        let img = RgbaImage::from_pixel(8, 8, Rgba([0, 128, 255, 255]));
        prepare_texture(&img, &TextureOptions::default()).unwrap()
    }

    fn triangle() -> Mesh {
        let mut mesh = Mesh::new();
        let v0 = mesh.add_vertex(Vertex { position: [0.0, 0.0, 0.0], normal: [0.0, 0.0, 1.0], uv: [0.0, 0.0] });
        let v1 = mesh.add_vertex(Vertex { position: [1.0, 0.0, 0.0], normal: [0.0, 0.0, 1.0], uv: [1.0, 0.0] });
        let v2 = mesh.add_vertex(Vertex { position: [0.0, 1.0, 0.0], normal: [0.0, 0.0, 1.0], uv: [0.0, 0.5] });
        mesh.add_triangle(v0, v1, v2);
        mesh
    }

    fn read_u32(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    #[test]
    fn test_export_simple_mesh() {
        let glb = export_glb(&triangle(), &texture(), &MaterialOptions::default()).unwrap();

        // Check GLB header
        assert_eq!(&glb[0..4], b"glTF");
        assert_eq!(read_u32(&glb, 4), 2); // version
        assert_eq!(read_u32(&glb, 8) as usize, glb.len());
        assert_eq!(glb.len() % 4, 0);

        // JSON chunk follows the header.
        let json_len = read_u32(&glb, 12) as usize;
        assert_eq!(read_u32(&glb, 16), CHUNK_JSON);
        let bin_header = 20 + json_len;
        assert_eq!(read_u32(&glb, bin_header + 4), CHUNK_BIN);
    }

    #[test]
    fn test_json_describes_single_mesh() {
        let glb = export_glb(&triangle(), &texture(), &MaterialOptions::default()).unwrap();
        let json_len = read_u32(&glb, 12) as usize;
        let root = json::Root::from_slice(&glb[20..20 + json_len]).unwrap();

        assert_eq!(root.meshes.len(), 1);
        assert_eq!(root.meshes[0].primitives.len(), 1);
        assert_eq!(root.materials.len(), 1);
        assert_eq!(root.images.len(), 1);
        assert_eq!(root.accessors[0].count.0, 3);
        assert_eq!(root.accessors[3].count.0, 3);
        let pbr = &root.materials[0].pbr_metallic_roughness;
        assert_eq!(pbr.metallic_factor.0, 0.0);
        assert!((pbr.roughness_factor.0 - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_export_empty_mesh_fails() {
        let result = export_glb(&Mesh::new(), &texture(), &MaterialOptions::default());
        assert!(matches!(result, Err(MesherError::Export(_))));
    }

    #[test]
    fn test_export_rejects_bad_indices() {
        let mut mesh = triangle();
        mesh.add_triangle(0, 1, 9);
        let result = export_glb(&mesh, &texture(), &MaterialOptions::default());
        assert!(matches!(result, Err(MesherError::Export(_))));
    }
}
