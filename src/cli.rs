// webpcbz/src/cli.rs
use crate::core::ConversionSettings;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "webpcbz",
    version,
    about = "Convert images, image folders and CBZ archives to WebP"
)]
pub struct Cli {
    /// Image files, folders or .cbz archives. Use `-` to read a list from stdin.
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// WebP quality (0-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub quality: Option<u8>,

    /// Encode losslessly
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub lossless: Option<bool>,

    /// Package converted folders as .cbz instead of a folder
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub cbz: Option<bool>,

    /// Encoder effort, 1 (fastest) to 6 (slowest, best)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=6))]
    pub effort: Option<u8>,

    /// Downscale images whose longest side exceeds --max-size
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub resize: Option<bool>,

    /// Longest side in pixels when resizing
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_size: Option<u32>,

    /// Settings file (defaults to ~/.webp_converter_config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run log file (defaults to ~/webp_conversion_log.txt)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Stored settings with any command-line overrides applied.
    pub fn apply_overrides(&self, stored: ConversionSettings) -> ConversionSettings {
        ConversionSettings {
            quality: self.quality.unwrap_or(stored.quality),
            lossless: self.lossless.unwrap_or(stored.lossless),
            archive_output: self.cbz.unwrap_or(stored.archive_output),
            effort: self.effort.unwrap_or(stored.effort),
            resize_enabled: self.resize.unwrap_or(stored.resize_enabled),
            max_size: self.max_size.unwrap_or(stored.max_size),
        }
    }
}
