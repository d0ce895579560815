// webpcbz/src/core/processor.rs
use super::{ConversionResult, ConversionSettings, Result};
use crate::processors::{Compressor, Loader, Resizer};
use crate::utils::{display_name, stem_of, WEBP_EXTENSION};
use std::path::{Path, PathBuf};

/// Converts one image file into a directory. Implementations report every
/// fault through the returned result instead of failing.
pub trait Transcode: Send + Sync {
    fn transcode(&self, source: &Path, dest_dir: &Path) -> ConversionResult;
}

/// Decode, normalize, optionally downscale, then encode to WebP.
pub struct Transcoder {
    loader: Loader,
    resizer: Option<Resizer>,
    compressor: Compressor,
}

impl Transcoder {
    pub fn new(settings: &ConversionSettings) -> Self {
        let resizer = (settings.resize_enabled && settings.max_size > 0)
            .then(|| Resizer::new(settings.max_size));
        let compressor = Compressor::new(settings.quality)
            .with_lossless(settings.lossless)
            .with_effort(settings.effort);

        Self {
            loader: Loader::new(),
            resizer,
            compressor,
        }
    }

    pub fn output_path(source: &Path, dest_dir: &Path) -> PathBuf {
        dest_dir.join(format!("{}.{}", stem_of(source), WEBP_EXTENSION))
    }

    fn process(&self, source: &Path, dest_dir: &Path) -> Result<(PathBuf, Option<String>)> {
        let mut image = self.loader.load(source)?;

        let mut resize_note = None;
        if let Some(resizer) = &self.resizer {
            let (orig_w, orig_h) = (image.width(), image.height());
            if let Some((resized, width, height)) = resizer.fit(&image) {
                image = resized;
                resize_note = Some(format!(
                    "Resized from {}x{} to {}x{}",
                    orig_w, orig_h, width, height
                ));
            }
        }

        let output_path = Self::output_path(source, dest_dir);
        self.compressor.save_webp(&image, &output_path)?;

        Ok((output_path, resize_note))
    }
}

impl Transcode for Transcoder {
    fn transcode(&self, source: &Path, dest_dir: &Path) -> ConversionResult {
        let name = display_name(source);

        match self.process(source, dest_dir) {
            Ok((output_path, resize_note)) => {
                let message = match resize_note {
                    Some(note) => format!("Converted: {} ({})", name, note),
                    None => format!("Converted: {}", name),
                };
                log::info!("{}", message);
                ConversionResult::success(message, output_path)
            }
            Err(e) => {
                log::warn!("Failed to convert {}: {}", source.display(), e);
                ConversionResult::failure(format!("Error: {} → {}", name, e))
            }
        }
    }
}
