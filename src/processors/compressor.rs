// webpcbz/src/processors/compressor.rs
use crate::core::{ConvertError, Result};
use image::DynamicImage;
use std::borrow::Cow;
use std::path::Path;

pub struct Compressor {
    quality: u8,
    lossless: bool,
    effort: u8,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.min(100),
            lossless: false,
            effort: 4,
        }
    }

    pub fn with_lossless(mut self, lossless: bool) -> Self {
        self.lossless = lossless;
        self
    }

    pub fn with_effort(mut self, effort: u8) -> Self {
        self.effort = effort.clamp(1, 6);
        self
    }

    pub fn save_webp(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        log::debug!(
            "Saving WebP to {} (quality: {}, lossless: {}, effort: {})",
            path.display(),
            self.quality,
            self.lossless,
            self.effort
        );

        let data = self.encode(image)?;
        std::fs::write(path, &data)?;

        log::debug!("Saved image: {} ({} bytes)", path.display(), data.len());
        Ok(())
    }

    fn encode(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        // WebP has no grayscale mode; the encoder only takes RGB8 and RGBA8.
        let image = match image {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Cow::Borrowed(image),
            other if other.color().has_alpha() => {
                Cow::Owned(DynamicImage::ImageRgba8(other.to_rgba8()))
            }
            other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
        };

        let encoder = webp::Encoder::from_image(&image)
            .map_err(|e| ConvertError::Encode(e.to_string()))?;

        let mut config = webp::WebPConfig::new()
            .map_err(|_| ConvertError::Encode("Failed to initialise WebP config".to_string()))?;
        config.lossless = i32::from(self.lossless);
        config.quality = f32::from(self.quality);
        config.method = i32::from(self.effort);

        let memory = encoder
            .encode_advanced(&config)
            .map_err(|e| ConvertError::Encode(format!("{:?}", e)))?;

        Ok(memory.to_vec())
    }
}
