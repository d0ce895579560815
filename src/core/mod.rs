// webpcbz/src/core/mod.rs
pub mod cancel;
pub mod event;
pub mod processor;
pub mod strategy;
pub mod task;
pub mod worker;

use chrono::Local;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSettings {
    pub quality: u8,
    pub lossless: bool,
    pub archive_output: bool,
    pub effort: u8,
    pub resize_enabled: bool,
    pub max_size: u32,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            quality: 90,
            lossless: false,
            archive_output: false,
            effort: 4,
            resize_enabled: false,
            max_size: 1920,
        }
    }
}

impl ConversionSettings {
    pub fn validate(&self) -> Result<()> {
        if self.quality > 100 {
            return Err(ConvertError::InvalidParameter(
                "Quality must be between 0 and 100".to_string(),
            ));
        }

        if !(1..=6).contains(&self.effort) {
            return Err(ConvertError::InvalidParameter(
                "Effort must be between 1 and 6".to_string(),
            ));
        }

        if self.max_size == 0 {
            return Err(ConvertError::InvalidParameter(
                "Max size must be at least 1 pixel".to_string(),
            ));
        }

        Ok(())
    }
}

/// Outcome of one transcoded item or one finishing action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub success: bool,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl ConversionResult {
    pub fn success(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            success: true,
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub result: ConversionResult,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp, self.result.message)
    }
}

/// Append-only record of everything a run produced, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: ConversionResult) {
        self.entries.push(LogEntry {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            result,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ConversionSettings::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let settings = ConversionSettings {
            effort: 7,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = ConversionSettings {
            quality: 101,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = ConversionSettings {
            max_size: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn log_lines_are_timestamped() {
        let mut log = RunLog::new();
        log.push(ConversionResult::failure("Error: a.png → broken"));

        let lines = log.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] Error: a.png → broken"));
    }
}
