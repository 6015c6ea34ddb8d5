//! Decoded pixel buffer plus the file edges around the pipeline.

use crate::{BramError, Result};
use image::DynamicImage;
use std::path::Path;

/// One image as packed `0x00RRGGBB` samples, row-major from the top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Frame {
    /// Decode an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| BramError::Decode { path: path.to_path_buf(), source })?;
        Ok(Self::from_image(&image))
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        let rgb = image.to_rgb8();
        let pixels = rgb
            .pixels()
            .map(|p| {
                let [r, g, b] = p.0;
                (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
            })
            .collect();
        Self { width: rgb.width(), height: rgb.height(), pixels }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(BramError::Config(format!(
                "{width}x{height} frame needs {expected} pixels, got {}",
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Write the listing bytes as-is.
pub fn write_listing(path: impl AsRef<Path>, listing: &str) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, listing)
        .map_err(|source| BramError::Write { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_from_image_packs_row_major() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([0x12, 0x34, 0x56]));
        img.put_pixel(1, 0, Rgb([0xFF, 0x00, 0x00]));
        img.put_pixel(0, 1, Rgb([0x00, 0xFF, 0x00]));
        img.put_pixel(1, 1, Rgb([0x00, 0x00, 0xFF]));

        let frame = Frame::from_image(&DynamicImage::ImageRgb8(img));
        assert_eq!((frame.width(), frame.height()), (2, 2));
        assert_eq!(frame.pixels(), &[0x0012_3456, 0x00FF_0000, 0x0000_FF00, 0x0000_00FF]);
    }

    #[test]
    fn test_from_image_drops_alpha() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0xAB, 0xCD, 0xEF, 0x00]));
        let frame = Frame::from_image(&DynamicImage::ImageRgba8(img));
        assert_eq!(frame.pixels(), &[0x00AB_CDEF]);
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(Frame::from_pixels(2, 1, vec![0, 0]).is_ok());
        assert!(matches!(Frame::from_pixels(2, 2, vec![0; 3]), Err(BramError::Config(_))));
    }

    #[test]
    fn test_open_missing_file_is_decode_error() {
        let err = Frame::open("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, BramError::Decode { .. }));
    }
}
