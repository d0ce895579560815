// webpcbz/src/core/strategy/files.rs
use crate::core::task::TaskEntry;
use crate::core::worker::{RunContext, RunState};
use crate::core::ConversionResult;
use crate::utils::{display_name, parent_or_current};
use std::path::{Path, PathBuf};

pub const OUTPUT_DIR_NAME: &str = "_webp_converted";

/// Converts loose image files into an `_webp_converted` directory next to
/// them, one directory per distinct parent.
pub fn run(entries: &[TaskEntry], ctx: &RunContext<'_>, state: &mut RunState) {
    for (parent, files) in group_by_parent(entries) {
        if ctx.is_cancelled() {
            return;
        }

        let output_dir = parent.join(OUTPUT_DIR_NAME);
        if let Err(e) = std::fs::create_dir_all(&output_dir) {
            log::warn!("Cannot create {}: {}", output_dir.display(), e);
            for file in files {
                if ctx.is_cancelled() {
                    return;
                }
                state.record_item(ConversionResult::failure(format!(
                    "Error: {} → cannot create {}: {}",
                    display_name(file),
                    output_dir.display(),
                    e
                )));
            }
            continue;
        }

        for file in files {
            if ctx.is_cancelled() {
                return;
            }
            let result = ctx.transcoder.transcode(file, &output_dir);
            state.record_item(result);
        }

        if !ctx.is_cancelled() {
            state.record_finish(ConversionResult::success(
                format!("Files saved to: {}", display_name(&output_dir)),
                output_dir,
            ));
        }
    }
}

/// Groups by parent directory, keeping first-seen order of both groups and files.
fn group_by_parent(entries: &[TaskEntry]) -> Vec<(PathBuf, Vec<&Path>)> {
    let mut groups: Vec<(PathBuf, Vec<&Path>)> = Vec::new();
    for entry in entries {
        let parent = parent_or_current(&entry.path);
        match groups.iter_mut().find(|(dir, _)| *dir == parent) {
            Some((_, files)) => files.push(&entry.path),
            None => groups.push((parent, vec![&entry.path])),
        }
    }
    groups
}
