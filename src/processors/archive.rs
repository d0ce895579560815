// webpcbz/src/processors/archive.rs
use crate::core::{ConvertError, Result};
use crate::utils::{has_image_name, unique_output_path};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Used as an archive's item count when it cannot be opened for scanning.
pub const DEFAULT_ARCHIVE_ESTIMATE: u64 = 50;

/// Counts file entries whose names carry an image extension.
pub fn scan_image_count(path: &Path) -> Result<u64> {
    let archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
    let count = archive
        .file_names()
        .filter(|name| !name.ends_with('/') && has_image_name(name))
        .count();
    Ok(count as u64)
}

/// Best-effort item count for progress totals.
pub fn estimate_image_count(path: &Path) -> u64 {
    match scan_image_count(path) {
        Ok(count) => count,
        Err(e) => {
            log::warn!(
                "Could not scan {}, assuming {} images: {}",
                path.display(),
                DEFAULT_ARCHIVE_ESTIMATE,
                e
            );
            DEFAULT_ARCHIVE_ESTIMATE
        }
    }
}

/// Extracts every file entry into `dest` under its base name. Directory
/// structure is dropped; a base name that is already taken gets a `_<n>`
/// suffix before its extension, so no page is lost.
pub fn extract_flat(archive_path: &Path, dest: &Path) -> Result<usize> {
    let mut archive = ZipArchive::new(BufReader::new(File::open(archive_path)?))?;
    let mut extracted = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        let file_name = match entry
            .enclosed_name()
            .and_then(|p| p.file_name().map(|n| n.to_os_string()))
        {
            Some(name) => name,
            None => {
                log::warn!("Skipping unsafe entry name in {}: {}", archive_path.display(), entry.name());
                continue;
            }
        };

        let target = free_flat_path(dest, Path::new(&file_name));
        if target.file_name() != Some(file_name.as_os_str()) {
            log::debug!("Renamed duplicate entry {} to {}", entry.name(), target.display());
        }

        let mut out = BufWriter::new(File::create(&target)?);
        io::copy(&mut entry, &mut out)?;
        out.flush()?;
        extracted += 1;
    }

    log::debug!("Extracted {} entries from {}", extracted, archive_path.display());
    Ok(extracted)
}

fn free_flat_path(dest: &Path, name: &Path) -> PathBuf {
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = name.extension().map(|e| e.to_string_lossy().into_owned());
    unique_output_path(dest, &stem, extension.as_deref())
}

/// Writes every regular file of `source_dir` into a new deflate archive at
/// `archive_path`, flat and in name order. A partial archive is removed on failure.
pub fn package_dir(source_dir: &Path, archive_path: &Path) -> Result<usize> {
    let result = write_archive(source_dir, archive_path);
    if result.is_err() && archive_path.exists() {
        if let Err(e) = fs::remove_file(archive_path) {
            log::warn!("Failed to remove partial archive {}: {}", archive_path.display(), e);
        }
    }
    result
}

fn write_archive(source_dir: &Path, archive_path: &Path) -> Result<usize> {
    let mut files = Vec::new();
    for entry in fs::read_dir(source_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut writer = ZipWriter::new(BufWriter::new(File::create(archive_path)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ConvertError::InvalidParameter(format!("Invalid file name: {}", path.display()))
            })?;
        writer.start_file(name, options)?;
        io::copy(&mut File::open(path)?, &mut writer)?;
    }

    writer.finish()?.flush()?;

    log::debug!("Packed {} files into {}", files.len(), archive_path.display());
    Ok(files.len())
}
