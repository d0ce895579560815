// webpcbz/src/core/task.rs
use crate::processors::archive::estimate_image_count;
use crate::utils::{is_archive, is_supported_image, list_images};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Files,
    FolderSet,
    ArchiveSet,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskKind::Files => "files",
            TaskKind::FolderSet => "folder-set",
            TaskKind::ArchiveSet => "archive-set",
        };
        f.write_str(name)
    }
}

/// One input path and the number of items it is expected to contribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    pub path: PathBuf,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    kind: TaskKind,
    entries: Vec<TaskEntry>,
}

impl Task {
    pub fn new(kind: TaskKind, entries: Vec<TaskEntry>) -> Self {
        Self { kind, entries }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn entries(&self) -> &[TaskEntry] {
        &self.entries
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.path.as_path())
    }

    /// Declared item count, used for the progress total.
    pub fn count(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

/// Classifier output: the tasks to run plus what was left out.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub tasks: Vec<Task>,
    pub skipped_folders: Vec<PathBuf>,
    pub ignored_files: Vec<PathBuf>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.tasks.iter().map(Task::count).sum()
    }
}

/// Splits raw input into paths that exist and those that do not.
pub fn partition_existing<I, S>(raw: I) -> (Vec<PathBuf>, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut existing = Vec::new();
    let mut missing = Vec::new();
    for item in raw {
        let item = item.into();
        if Path::new(&item).exists() {
            existing.push(PathBuf::from(item));
        } else {
            missing.push(item);
        }
    }
    (existing, missing)
}

/// Groups existing paths into at most one task per kind, in the order
/// files, folders, archives.
pub fn classify(paths: &[PathBuf]) -> Plan {
    let mut files = Vec::new();
    let mut folders = Vec::new();
    let mut archives = Vec::new();
    let mut ignored_files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_archive(path) {
                archives.push(path.clone());
            } else if is_supported_image(path) {
                files.push(path.clone());
            } else {
                ignored_files.push(path.clone());
            }
        } else if path.is_dir() {
            folders.push(path.clone());
        }
    }

    let mut plan = Plan {
        ignored_files,
        ..Plan::default()
    };

    if !files.is_empty() {
        let entries = files
            .into_iter()
            .map(|path| TaskEntry { path, count: 1 })
            .collect();
        plan.tasks.push(Task::new(TaskKind::Files, entries));
    }

    let counted: Vec<TaskEntry> = folders
        .into_par_iter()
        .map(|path| {
            let count = count_folder_images(&path);
            TaskEntry { path, count }
        })
        .collect();
    let (folder_entries, empty): (Vec<_>, Vec<_>) =
        counted.into_iter().partition(|entry| entry.count > 0);
    plan.skipped_folders = empty.into_iter().map(|entry| entry.path).collect();
    if !folder_entries.is_empty() {
        plan.tasks.push(Task::new(TaskKind::FolderSet, folder_entries));
    }

    if !archives.is_empty() {
        let entries = archives
            .into_par_iter()
            .map(|path| {
                let count = estimate_image_count(&path);
                TaskEntry { path, count }
            })
            .collect();
        plan.tasks.push(Task::new(TaskKind::ArchiveSet, entries));
    }

    for task in &plan.tasks {
        log::debug!("Planned {} task: {} items", task.kind(), task.count());
    }

    plan
}

fn count_folder_images(path: &Path) -> u64 {
    match list_images(path) {
        Ok(images) => images.len() as u64,
        Err(e) => {
            log::warn!("Could not list {}: {}", path.display(), e);
            0
        }
    }
}
