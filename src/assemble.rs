//! Ordered merge of per-worker output into the final listing.

use crate::pool::PoolOutput;
use crate::{BramError, Result};
use image::{ImageFormat, Rgb, RgbImage};
use std::path::Path;

/// Concatenate worker text in worker order and drop the final line break.
pub fn assemble_listing(records: &[String]) -> String {
    let mut listing = String::with_capacity(records.iter().map(String::len).sum());
    for text in records {
        listing.push_str(text);
    }
    if listing.ends_with('\n') {
        listing.pop();
    }
    listing
}

/// Result of converting one frame.
#[derive(Debug, Clone)]
pub struct Conversion {
    width: u32,
    height: u32,
    listing: String,
    preview: Vec<u32>,
}

impl Conversion {
    pub(crate) fn assemble(width: u32, height: u32, output: PoolOutput) -> Self {
        let listing = assemble_listing(&output.records);
        Self { width, height, listing, preview: output.preview }
    }

    /// BRAM initializer text: one `GBR` hex line per pixel, no trailing newline.
    pub fn listing(&self) -> &str {
        &self.listing
    }

    pub fn line_count(&self) -> usize {
        self.listing.lines().count()
    }

    /// Packed `0x00RRGGBB` preview colors in scan order.
    pub fn preview_pixels(&self) -> &[u32] {
        &self.preview
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn preview_image(&self) -> RgbImage {
        let width = self.width as usize;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let c = self.preview[y as usize * width + x as usize];
            Rgb([(c >> 16) as u8, (c >> 8) as u8, c as u8])
        })
    }

    /// Encode the preview as PNG, replacing any existing file.
    pub fn save_preview(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.preview_image()
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| BramError::Encode { path: path.to_path_buf(), source })
    }
}
