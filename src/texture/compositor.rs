//! Opaque texture compositing with a reserved seam band.

use crate::error::{MesherError, Result};
use image::imageops::FilterType;
use image::{ImageEncoder, Rgb, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

/// Options for [`prepare_texture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureOptions {
    /// Longest side of the image band; larger pictures are downsampled.
    pub max_dimension: u32,
    /// Height in pixels of the seam band appended below the picture.
    pub strip_height: u32,
    /// Fill behind transparent pixels.
    pub background: [u8; 3],
    /// Colour of the seam band.
    pub seam_color: [u8; 3],
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            max_dimension: 1024,
            strip_height: 8,
            background: [255, 255, 255],
            seam_color: [255, 255, 255],
        }
    }
}

/// An opaque RGB texture: the picture on top, the seam band below.
#[derive(Debug, Clone)]
pub struct PreparedTexture {
    /// Full texture including the band.
    pub image: RgbImage,
    /// Height of the picture part in pixels.
    pub image_height: u32,
}

impl PreparedTexture {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `image_height / total_height`. Every cap UV's V coordinate is scaled
    /// by this so sampling stays inside the picture.
    pub fn image_fraction(&self) -> f32 {
        self.image_height as f32 / self.image.height() as f32
    }

    /// A texture coordinate in the middle of the seam band.
    pub fn seam_uv(&self) -> [f32; 2] {
        let fraction = self.image_fraction();
        [0.5, fraction + (1.0 - fraction) * 0.5]
    }

    /// Encode the texture as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let cursor = std::io::Cursor::new(&mut bytes);
        let encoder = image::codecs::png::PngEncoder::new(cursor);

        encoder
            .write_image(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| MesherError::Export(format!("Failed to encode texture PNG: {}", e)))?;

        Ok(bytes)
    }
}

/// Flatten `image` onto the background, cap its size, and append the seam band.
pub fn prepare_texture(image: &RgbaImage, options: &TextureOptions) -> Result<PreparedTexture> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(MesherError::ShapeExtraction(
            "cannot texture an empty image".to_string(),
        ));
    }

    let flat = flatten(image, options.background);

    let longest = width.max(height);
    let max_dim = options.max_dimension.max(1);
    let flat = if longest > max_dim {
        let ratio = max_dim as f64 / longest as f64;
        let new_width = ((width as f64 * ratio).round() as u32).max(1);
        let new_height = ((height as f64 * ratio).round() as u32).max(1);
        log::debug!(
            "downsampling texture {}x{} -> {}x{}",
            width,
            height,
            new_width,
            new_height
        );
        image::imageops::resize(&flat, new_width, new_height, FilterType::Lanczos3)
    } else {
        flat
    };

    let (tex_width, image_height) = flat.dimensions();
    let strip_height = options.strip_height.max(1);
    let mut texture = RgbImage::from_pixel(
        tex_width,
        image_height + strip_height,
        Rgb(options.seam_color),
    );
    for (x, y, pixel) in flat.enumerate_pixels() {
        texture.put_pixel(x, y, *pixel);
    }

    Ok(PreparedTexture {
        image: texture,
        image_height,
    })
}

/// Alpha-composite over a solid colour.
fn flatten(image: &RgbaImage, background: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        let alpha = p[3] as u32;
        let blend = |fg: u8, bg: u8| ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8;
        Rgb([
            blend(p[0], background[0]),
            blend(p[1], background[1]),
            blend(p[2], background[2]),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_band_appended_below_picture() {
        let img = RgbaImage::from_pixel(20, 10, Rgba([255, 0, 0, 255]));
        let tex = prepare_texture(&img, &TextureOptions::default()).unwrap();

        assert_eq!(tex.width(), 20);
        assert_eq!(tex.height(), 18);
        assert_eq!(tex.image_height, 10);
        assert!((tex.image_fraction() - 10.0 / 18.0).abs() < 1e-6);
        assert_eq!(tex.image.get_pixel(3, 3), &Rgb([255, 0, 0]));
        for y in 10..18 {
            assert_eq!(tex.image.get_pixel(7, y), &Rgb([255, 255, 255]));
        }
    }

    #[test]
    fn test_transparent_pixels_take_background() {
        let img = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([0, 0, 0, 128])
            }
        });
        let options = TextureOptions { background: [200, 100, 0], ..Default::default() };
        let tex = prepare_texture(&img, &options).unwrap();
        assert_eq!(tex.image.get_pixel(0, 0), &Rgb([200, 100, 0]));
        assert_eq!(tex.image.get_pixel(1, 0), &Rgb([100, 50, 0]));
    }

    #[test]
    fn test_large_pictures_downsampled() {
        let img = RgbaImage::from_pixel(300, 150, Rgba([0, 255, 0, 255]));
        let options = TextureOptions { max_dimension: 100, ..Default::default() };
        let tex = prepare_texture(&img, &options).unwrap();
        assert_eq!(tex.width(), 100);
        assert_eq!(tex.image_height, 50);
        assert_eq!(tex.height(), 58);
    }

    #[test]
    fn test_seam_color_and_uv() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let options = TextureOptions { seam_color: [10, 20, 30], strip_height: 4, ..Default::default() };
        let tex = prepare_texture(&img, &options).unwrap();
        let [u, v] = tex.seam_uv();
        assert_eq!(u, 0.5);
        assert!((v - 0.75).abs() < 1e-6);
        let row = (v * tex.height() as f32) as u32;
        assert_eq!(tex.image.get_pixel(2, row), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_png_encoding() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        let png = prepare_texture(&img, &TextureOptions::default()).unwrap().to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.height(), 12);
    }
}
