// webpcbz/src/report.rs
use crate::core::{Result, RunLog};
use std::fmt;
use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "webp_conversion_log.txt";

pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(LOG_FILE_NAME))
}

/// Writes the log as newline-joined lines.
pub fn write_run_log(path: &Path, log: &RunLog) -> Result<()> {
    std::fs::write(path, log.lines().join("\n"))?;
    Ok(())
}

/// Success and failure tallies of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub successes: usize,
    pub failures: Vec<String>,
}

impl RunReport {
    pub fn from_log(log: &RunLog) -> Self {
        let successes = log.entries().iter().filter(|e| e.result.success).count();
        let failures = log
            .entries()
            .iter()
            .filter(|e| !e.result.success)
            .map(ToString::to_string)
            .collect();

        Self { successes, failures }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Conversion complete")?;
        writeln!(f, "Successful operations: {}", self.successes)?;
        write!(f, "Failed operations: {}", self.failures.len())?;

        if !self.failures.is_empty() {
            write!(f, "\nFailures:")?;
            for line in &self.failures {
                write!(f, "\n  • {}", line)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConversionResult;

    fn sample_log() -> RunLog {
        let mut log = RunLog::new();
        log.push(ConversionResult::success("Converted: a.png", "out/a.webp"));
        log.push(ConversionResult::failure("Error: b.png → truncated file"));
        log.push(ConversionResult::success("CBZ created: ch_webp.cbz", "ch_webp.cbz"));
        log
    }

    #[test]
    fn report_counts_outcomes() {
        let report = RunReport::from_log(&sample_log());
        assert_eq!(report.successes, 2);
        assert_eq!(report.failures.len(), 1);

        let text = report.to_string();
        assert!(text.contains("Failed operations: 1"));
        assert!(text.contains("Error: b.png → truncated file"));
    }

    #[test]
    fn log_file_is_newline_joined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        write_run_log(&path, &sample_log()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].ends_with("CBZ created: ch_webp.cbz"));
    }
}
