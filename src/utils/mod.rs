// webpcbz/src/utils/mod.rs
use crate::core::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "tif", "tiff", "bmp", "gif", "avif"];
pub const ARCHIVE_EXTENSION: &str = "cbz";
pub const WEBP_EXTENSION: &str = "webp";

pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}

pub fn is_supported_image(path: &Path) -> bool {
    get_file_extension(path)
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub fn is_archive(path: &Path) -> bool {
    get_file_extension(path)
        .map(|ext| ext == ARCHIVE_EXTENSION)
        .unwrap_or(false)
}

/// Same test as [`is_supported_image`] for zip entry names.
pub fn has_image_name(name: &str) -> bool {
    is_supported_image(Path::new(name))
}

/// Immediate image files of `dir`, sorted by file name. Subdirectories are not entered.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_image(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// `<dir>/<base>[.ext]`, or the first free `<dir>/<base>_<n>[.ext]` when taken.
pub fn unique_output_path(dir: &Path, base: &str, extension: Option<&str>) -> PathBuf {
    let name = |suffix: Option<usize>| {
        let stem = match suffix {
            Some(n) => format!("{}_{}", base, n),
            None => base.to_string(),
        };
        match extension {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem,
        }
    };

    let mut candidate = dir.join(name(None));
    let mut counter = 1;

    // Never overwrite the output of an earlier run
    while candidate.exists() {
        candidate = dir.join(name(Some(counter)));
        counter += 1;
    }

    candidate
}

/// Splits pasted text into one path per line, dropping blanks, `\r` and surrounding quotes.
pub fn parse_path_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.replace('\r', "")
                .trim()
                .trim_matches('"')
                .trim_matches('\'')
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// File stem as an owned string, for output naming.
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

/// Final path component, for log messages.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parent directory, treating a bare file name as living in `.`.
pub fn parent_or_current(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
