// webpcbz/src/core/strategy/archives.rs
use super::{convert_images, discard, finishing_failure, staging_dir, Walk};
use crate::core::task::TaskEntry;
use crate::core::worker::{RunContext, RunState};
use crate::core::{ConversionResult, Result};
use crate::processors::archive::{extract_flat, package_dir};
use crate::utils::{display_name, parent_or_current, stem_of, unique_output_path, ARCHIVE_EXTENSION};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn run(entries: &[TaskEntry], ctx: &RunContext<'_>, state: &mut RunState) {
    for entry in entries {
        if ctx.is_cancelled() {
            return;
        }
        process_archive(entry, ctx, state);
    }
}

/// Temporary areas for one archive. Both are removed when this is dropped or
/// explicitly discarded.
#[derive(Default)]
struct Workspace {
    extract: Option<TempDir>,
    convert: Option<TempDir>,
}

impl Workspace {
    fn discard(self) {
        for dir in [self.extract, self.convert].into_iter().flatten() {
            discard(dir);
        }
    }
}

/// Extracts, converts and repackages one archive as `<stem>_webp.cbz`.
///
/// Any fault after the per-item loop has started (unreadable archive, failed
/// extraction, failed packaging) turns the whole archive into a single
/// failure. The counter is then topped up to the archive's declared count so
/// that the run total is still reached.
fn process_archive(entry: &TaskEntry, ctx: &RunContext<'_>, state: &mut RunState) {
    let archive = entry.path.as_path();
    log::info!("Processing archive {}", archive.display());

    let mut workspace = Workspace::default();
    let mut walked = 0;

    match convert_archive(archive, entry.count, ctx, state, &mut workspace, &mut walked) {
        Ok(Some(output)) => {
            state.settle(entry.count, walked);
            state.record_finish(ConversionResult::success(
                format!("New CBZ: {}", display_name(&output)),
                output,
            ));
        }
        Ok(None) => {}
        Err(e) => {
            state.settle(entry.count, walked);
            state.record_finish(finishing_failure("CBZ", archive, e));
        }
    }

    workspace.discard();
}

/// Returns the new archive path, or `None` if cancellation interrupted the walk.
fn convert_archive(
    archive: &Path,
    declared: u64,
    ctx: &RunContext<'_>,
    state: &mut RunState,
    workspace: &mut Workspace,
    walked: &mut u64,
) -> Result<Option<PathBuf>> {
    let extract_dir = workspace.extract.insert(staging_dir("webpcbz-extract-")?).path().to_path_buf();
    let convert_dir = workspace.convert.insert(staging_dir("webpcbz-stage-")?).path().to_path_buf();

    extract_flat(archive, &extract_dir)?;

    if let Walk::Interrupted = convert_images(&extract_dir, &convert_dir, declared, ctx, state, walked)? {
        return Ok(None);
    }

    let output = unique_output_path(
        &parent_or_current(archive),
        &format!("{}_webp", stem_of(archive)),
        Some(ARCHIVE_EXTENSION),
    );
    let count = package_dir(&convert_dir, &output)?;
    log::info!("Packed {} images into {}", count, output.display());

    Ok(Some(output))
}
