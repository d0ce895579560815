// webpcbz/src/core/strategy/mod.rs
//! Per-kind processing. Each strategy walks its entries in order, checks for
//! cancellation before every entry and every item, and reports through the
//! shared [`RunState`](super::worker::RunState).

pub mod archives;
pub mod files;
pub mod folders;

use super::worker::{RunContext, RunState};
use super::{ConversionResult, Result};
use crate::utils::list_images;
use std::path::Path;
use tempfile::TempDir;

/// Outcome of walking the items of one folder or archive.
pub(crate) enum Walk {
    Finished,
    Interrupted,
}

pub(crate) fn staging_dir(prefix: &str) -> std::io::Result<TempDir> {
    tempfile::Builder::new().prefix(prefix).tempdir()
}

/// Removes a temporary directory, logging rather than failing.
pub(crate) fn discard(dir: TempDir) {
    let path = dir.path().to_path_buf();
    if let Err(e) = dir.close() {
        log::warn!("Failed to remove temporary directory {}: {}", path.display(), e);
    }
}

pub(crate) fn finishing_failure(
    context: &str,
    target: &Path,
    error: impl std::fmt::Display,
) -> ConversionResult {
    log::warn!("{} failed for {}: {}", context, target.display(), error);
    ConversionResult::failure(format!("{} error: {}", context, error))
}

/// Transcodes the immediate images of `source` into `staging`, one progress
/// item each. Only the first `declared` items advance the counter. `walked`
/// counts items already accounted for, even if a later listing error aborts
/// the walk.
pub(crate) fn convert_images(
    source: &Path,
    staging: &Path,
    declared: u64,
    ctx: &RunContext<'_>,
    state: &mut RunState,
    walked: &mut u64,
) -> Result<Walk> {
    for image in list_images(source)? {
        if ctx.is_cancelled() {
            return Ok(Walk::Interrupted);
        }
        let result = ctx.transcoder.transcode(&image, staging);
        if *walked < declared {
            state.record_item(result);
        } else {
            state.record_extra_item(result);
        }
        *walked += 1;
    }

    if ctx.is_cancelled() {
        return Ok(Walk::Interrupted);
    }
    Ok(Walk::Finished)
}
