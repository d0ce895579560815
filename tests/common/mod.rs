#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use webpcbz::{
    channel, CancelToken, ConversionResult, ConversionSettings, ConversionWorker, ProgressEvent,
    ProgressUpdate, RunOutcome, Stage, Task, Transcode,
};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Writes `<stem>.webp` without decoding anything. Can be told to fail on
/// given file names or to raise the cancel flag after a number of calls.
#[derive(Default)]
pub struct FakeTranscoder {
    calls: AtomicUsize,
    fail_names: Vec<String>,
    cancel_after: Option<(usize, CancelToken)>,
}

impl FakeTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_names.push(name.to_string());
        self
    }

    pub fn cancelling_after(mut self, calls: usize, token: CancelToken) -> Self {
        self.cancel_after = Some((calls, token));
        self
    }
}

impl Transcode for FakeTranscoder {
    fn transcode(&self, source: &Path, dest_dir: &Path) -> ConversionResult {
        let calls = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((after, token)) = &self.cancel_after {
            if calls >= *after {
                token.cancel();
            }
        }

        let name = source.file_name().unwrap().to_string_lossy().into_owned();
        if self.fail_names.contains(&name) {
            return ConversionResult::failure(format!("Error: {} → fake failure", name));
        }

        let stem = source.file_stem().unwrap().to_string_lossy().into_owned();
        let output = dest_dir.join(format!("{}.webp", stem));
        std::fs::write(&output, b"RIFFfakeWEBP").unwrap();
        ConversionResult::success(format!("Converted: {}", name), output)
    }
}

pub fn run_worker<T: Transcode + 'static>(
    tasks: Vec<Task>,
    settings: ConversionSettings,
    transcoder: T,
    cancel: CancelToken,
) -> (RunOutcome, Vec<ProgressEvent>) {
    let (events, receiver) = channel();
    let outcome = ConversionWorker::new(tasks, settings, transcoder, events, cancel).run();
    (outcome, receiver.try_iter().collect())
}

pub fn updates(events: &[ProgressEvent], stage: Stage) -> Vec<ProgressUpdate> {
    events
        .iter()
        .filter_map(|event| match event {
            ProgressEvent::Progress(update) if update.stage == stage => Some(update.clone()),
            _ => None,
        })
        .collect()
}

pub fn touch_images(dir: &Path, names: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    for name in names {
        std::fs::write(dir.join(name), b"not really an image").unwrap();
    }
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 10]))
        .save(path)
        .unwrap();
}

pub fn write_cbz(path: &Path, entries: &[(&str, &[u8])]) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
}

pub fn cbz_entry_names(path: &Path) -> Vec<String> {
    let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}
