// webpcbz/src/core/worker.rs
use super::cancel::CancelToken;
use super::event::{ProgressEvent, ProgressSender, ProgressUpdate, Stage};
use super::processor::Transcode;
use super::strategy;
use super::task::{Task, TaskKind};
use super::{ConversionResult, ConversionSettings, RunLog};
use std::thread::{self, JoinHandle};

/// Counters and log for one run. Owned by the worker and lent to each
/// strategy for the duration of its call.
pub struct RunState {
    completed: u64,
    total: u64,
    log: RunLog,
    events: ProgressSender,
}

impl RunState {
    fn new(total: u64, events: ProgressSender) -> Self {
        Self {
            completed: 0,
            total,
            log: RunLog::new(),
            events,
        }
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Logs a per-item result and advances the counter, success or not.
    pub fn record_item(&mut self, result: ConversionResult) {
        self.completed += 1;
        self.log_and_emit(Stage::Item, result);
    }

    /// Logs an item an entry did not declare at classification time. The
    /// counter is left alone so that it never passes the total.
    pub fn record_extra_item(&mut self, result: ConversionResult) {
        self.log_and_emit(Stage::Item, result);
    }

    /// Logs a finishing action without touching the counter.
    pub fn record_finish(&mut self, result: ConversionResult) {
        self.log_and_emit(Stage::Finished, result);
    }

    /// Accounts for items an entry declared but never walked.
    pub fn settle(&mut self, declared: u64, walked: u64) {
        let shortfall = declared.saturating_sub(walked);
        if shortfall > 0 {
            log::debug!("Adjusting progress by {} unprocessed items", shortfall);
            self.completed += shortfall;
        }
    }

    fn log_and_emit(&mut self, stage: Stage, result: ConversionResult) {
        let message = result.message.clone();
        self.log.push(result);
        self.emit(stage, message);
    }

    fn emit(&self, stage: Stage, message: String) {
        self.events.send(ProgressEvent::Progress(ProgressUpdate {
            stage,
            message,
            completed: self.completed,
            total: self.total,
        }));
    }
}

/// Read-only collaborators shared by every strategy call.
pub struct RunContext<'a> {
    pub settings: &'a ConversionSettings,
    pub transcoder: &'a dyn Transcode,
    pub cancel: &'a CancelToken,
}

impl RunContext<'_> {
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { completed: u64, total: u64 },
    Cancelled { completed: u64, total: u64 },
}

pub struct ConversionWorker<T> {
    tasks: Vec<Task>,
    settings: ConversionSettings,
    transcoder: T,
    events: ProgressSender,
    cancel: CancelToken,
}

impl<T: Transcode + 'static> ConversionWorker<T> {
    pub fn new(
        tasks: Vec<Task>,
        settings: ConversionSettings,
        transcoder: T,
        events: ProgressSender,
        cancel: CancelToken,
    ) -> Self {
        Self {
            tasks,
            settings,
            transcoder,
            events,
            cancel,
        }
    }

    pub fn spawn(self) -> std::io::Result<JoinHandle<RunOutcome>> {
        thread::Builder::new()
            .name("webpcbz-worker".to_string())
            .spawn(move || self.run())
    }

    /// Processes every task in order. The last event sent is always
    /// `Done` or `Cancelled`.
    pub fn run(self) -> RunOutcome {
        let total = self.tasks.iter().map(Task::count).sum();
        let mut state = RunState::new(total, self.events.clone());

        log::info!("Starting conversion of {} items", total);
        state.emit(Stage::Started, "Starting conversion...".to_string());

        let ctx = RunContext {
            settings: &self.settings,
            transcoder: &self.transcoder,
            cancel: &self.cancel,
        };

        for task in &self.tasks {
            if ctx.is_cancelled() {
                return self.cancelled(&state);
            }

            log::debug!("Running {} task with {} entries", task.kind(), task.entries().len());
            match task.kind() {
                TaskKind::Files => strategy::files::run(task.entries(), &ctx, &mut state),
                TaskKind::FolderSet => strategy::folders::run(task.entries(), &ctx, &mut state),
                TaskKind::ArchiveSet => strategy::archives::run(task.entries(), &ctx, &mut state),
            }

            if ctx.is_cancelled() {
                return self.cancelled(&state);
            }
        }

        log::info!("Conversion finished: {}/{} items", state.completed, state.total);
        let outcome = RunOutcome::Completed {
            completed: state.completed,
            total: state.total,
        };
        self.events.send(ProgressEvent::Done(state.log));
        outcome
    }

    fn cancelled(&self, state: &RunState) -> RunOutcome {
        log::info!("Conversion cancelled after {} items", state.completed);
        self.events.send(ProgressEvent::Cancelled);
        RunOutcome::Cancelled {
            completed: state.completed,
            total: state.total,
        }
    }
}
