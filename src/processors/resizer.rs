// webpcbz/src/processors/resizer.rs
use image::{imageops::FilterType, DynamicImage};

/// Downscales images whose longer side exceeds a limit.
pub struct Resizer {
    max_size: u32,
    filter: FilterType,
}

impl Resizer {
    pub fn new(max_size: u32) -> Self {
        Self {
            max_size,
            filter: FilterType::Lanczos3,
        }
    }

    /// Returns the resized image and its new dimensions, or `None` when the
    /// image already fits.
    pub fn fit(&self, image: &DynamicImage) -> Option<(DynamicImage, u32, u32)> {
        let (width, height) = fit_longest_side(image.width(), image.height(), self.max_size)?;

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );

        Some((image.resize_exact(width, height, self.filter), width, height))
    }
}

/// Target dimensions with the longer side equal to `max_size`, aspect ratio
/// kept by truncating the shorter side (never below 1).
pub fn fit_longest_side(width: u32, height: u32, max_size: u32) -> Option<(u32, u32)> {
    let longest = width.max(height);
    if max_size == 0 || longest <= max_size {
        return None;
    }

    let scale = |side: u32| -> u32 {
        let scaled = u64::from(side) * u64::from(max_size) / u64::from(longest);
        (scaled as u32).max(1)
    };

    if width >= height {
        Some((max_size, scale(height)))
    } else {
        Some((scale(width), max_size))
    }
}
