// webpcbz/src/processors/loader.rs
use crate::core::{ConvertError, Result};
use image::{ColorType, DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

#[derive(Clone)]
pub struct Loader {
    max_dimensions: Option<(u32, u32)>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((100_000, 100_000)),
        }
    }

    /// Decodes `path` and normalizes its color mode for encoding.
    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        self.validate_path(path)?;

        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| ConvertError::Processing(format!("Failed to decode image: {}", e)))?;

        if let Some((max_w, max_h)) = self.max_dimensions {
            let (width, height) = image.dimensions();
            if width > max_w || height > max_h {
                return Err(ConvertError::Processing(format!(
                    "Image dimensions {}x{} exceed maximum {}x{}",
                    width, height, max_w, max_h
                )));
            }
        }

        log::debug!(
            "Loaded image: {}x{} pixels, color: {:?}",
            image.width(),
            image.height(),
            image.color()
        );

        Ok(normalize_color(image))
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        let metadata = path.metadata()?;
        if metadata.len() == 0 {
            return Err(ConvertError::InvalidParameter(format!(
                "File is empty: {}",
                path.display()
            )));
        }

        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Anything with transparency becomes RGBA8; otherwise RGB8 and L8 are kept
/// and every other mode becomes RGB8. Palette sources arrive here already
/// expanded by the decoder, as RGBA when they carry transparency.
pub fn normalize_color(image: DynamicImage) -> DynamicImage {
    match image.color() {
        ColorType::Rgba8 | ColorType::Rgb8 | ColorType::L8 => image,
        color if color.has_alpha() => DynamicImage::ImageRgba8(image.into_rgba8()),
        _ => DynamicImage::ImageRgb8(image.into_rgb8()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, ImageBuffer, Rgb};

    #[test]
    fn alpha_modes_become_rgba() {
        let image = DynamicImage::ImageLumaA8(GrayAlphaImage::new(2, 2));
        assert_eq!(normalize_color(image).color(), ColorType::Rgba8);
    }

    #[test]
    fn baseline_modes_are_kept() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::new(2, 2));
        assert_eq!(normalize_color(gray).color(), ColorType::L8);
    }

    #[test]
    fn deep_rgb_becomes_rgb8() {
        let deep: ImageBuffer<Rgb<u16>, Vec<u16>> = ImageBuffer::new(2, 2);
        let image = DynamicImage::ImageRgb16(deep);
        assert_eq!(normalize_color(image).color(), ColorType::Rgb8);
    }
}
