mod cli;
pub mod config;
mod core;
mod processors;
pub mod report;
mod utils;

pub use cli::Cli;
pub use config::{default_config_path, SettingsStore};
pub use crate::core::{
    cancel::CancelToken,
    event::{channel, ProgressEvent, ProgressSender, ProgressUpdate, Stage},
    processor::{Transcode, Transcoder},
    task::{classify, partition_existing, Plan, Task, TaskEntry, TaskKind},
    worker::{ConversionWorker, RunOutcome},
    ConversionResult, ConversionSettings, ConvertError, LogEntry, Result, RunLog,
};
pub use crate::processors::{
    archive::{estimate_image_count, DEFAULT_ARCHIVE_ESTIMATE},
    fit_longest_side, Compressor, Loader, Resizer,
};
pub use report::{default_log_path, write_run_log, RunReport};
pub use utils::{
    is_archive, is_supported_image, list_images, parse_path_list, IMAGE_EXTENSIONS,
};

pub mod prelude {
    pub use crate::{
        classify, CancelToken, ConversionSettings, ConversionWorker, ProgressEvent, Transcoder,
    };
}

pub use crate::core::strategy::files::OUTPUT_DIR_NAME;
