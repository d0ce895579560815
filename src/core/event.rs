// webpcbz/src/core/event.rs
use super::RunLog;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Run start; announces the total.
    Started,
    /// One item went through the transcoder.
    Item,
    /// A finishing action (or a whole-archive failure) completed.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub stage: Stage,
    pub message: String,
    pub completed: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Progress(ProgressUpdate),
    Cancelled,
    Done(RunLog),
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Cancelled | ProgressEvent::Done(_))
    }
}

/// Worker side of the event channel. Sending never blocks.
#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: Sender<ProgressEvent>,
}

impl ProgressSender {
    pub fn send(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            log::debug!("Progress receiver dropped, event discarded");
        }
    }
}

/// Unbounded, order-preserving channel between the worker and a reporter.
pub fn channel() -> (ProgressSender, Receiver<ProgressEvent>) {
    let (tx, rx) = mpsc::channel();
    (ProgressSender { tx }, rx)
}
