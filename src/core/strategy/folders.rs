// webpcbz/src/core/strategy/folders.rs
use super::{convert_images, discard, finishing_failure, staging_dir, Walk};
use crate::core::task::TaskEntry;
use crate::core::worker::{RunContext, RunState};
use crate::core::ConversionResult;
use crate::processors::archive::package_dir;
use crate::utils::{display_name, parent_or_current, unique_output_path, ARCHIVE_EXTENSION};
use std::fs;
use std::io;
use std::path::Path;

pub fn run(entries: &[TaskEntry], ctx: &RunContext<'_>, state: &mut RunState) {
    for entry in entries {
        if ctx.is_cancelled() {
            return;
        }
        process_folder(entry, ctx, state);
    }
}

/// Converts one folder's images into a staging area, then packages them into
/// `<name>_webp.cbz` or moves them into `<name>_webp/` beside the folder.
fn process_folder(entry: &TaskEntry, ctx: &RunContext<'_>, state: &mut RunState) {
    let folder = entry.path.as_path();
    log::info!("Processing folder {}", folder.display());

    let staging = match staging_dir("webpcbz-stage-") {
        Ok(dir) => dir,
        Err(e) => {
            state.settle(entry.count, 0);
            state.record_finish(finishing_failure("Folder", folder, e));
            return;
        }
    };

    let mut walked = 0;
    let walk = match convert_images(folder, staging.path(), entry.count, ctx, state, &mut walked) {
        Ok(walk) => walk,
        Err(e) => {
            state.settle(entry.count, walked);
            state.record_finish(finishing_failure("Folder", folder, e));
            discard(staging);
            return;
        }
    };

    if let Walk::Interrupted = walk {
        discard(staging);
        return;
    }

    let finish = finish_folder(folder, staging.path(), ctx.settings.archive_output);
    state.settle(entry.count, walked);
    state.record_finish(finish);
    discard(staging);
}

fn finish_folder(folder: &Path, staging: &Path, archive_output: bool) -> ConversionResult {
    let parent = parent_or_current(folder);
    let base = format!("{}_webp", display_name(folder));

    if archive_output {
        let archive_path = unique_output_path(&parent, &base, Some(ARCHIVE_EXTENSION));
        match package_dir(staging, &archive_path) {
            Ok(count) => {
                log::info!("Packed {} images into {}", count, archive_path.display());
                ConversionResult::success(
                    format!("CBZ created: {}", display_name(&archive_path)),
                    archive_path,
                )
            }
            Err(e) => finishing_failure("CBZ creation", &archive_path, e),
        }
    } else {
        let out_dir = unique_output_path(&parent, &base, None);
        match move_contents(staging, &out_dir) {
            Ok(count) => {
                log::info!("Moved {} images into {}", count, out_dir.display());
                ConversionResult::success(
                    format!("Folder saved: {}", display_name(&out_dir)),
                    out_dir,
                )
            }
            Err(e) => finishing_failure("Folder move", &out_dir, e),
        }
    }
}

/// Moves every regular file of `from` into `to`, creating `to`. Falls back to
/// copy and remove when a rename crosses filesystems.
fn move_contents(from: &Path, to: &Path) -> io::Result<usize> {
    fs::create_dir_all(to)?;

    let mut moved = 0;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let target = to.join(entry.file_name());
        if fs::rename(entry.path(), &target).is_err() {
            fs::copy(entry.path(), &target)?;
            fs::remove_file(entry.path())?;
        }
        moved += 1;
    }
    Ok(moved)
}
