//! Typed events emitted by the job runner.

use tokio::sync::mpsc;

/// One message from a running job.
///
/// Events are immutable, delivered at most once each, and observed in
/// emission order. Exactly one `Finished` terminates a job's stream; no
/// event follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// Human-readable state change for the status surface.
    Status(String),
    /// Overall progress, 0-100, non-decreasing within one job.
    Progress(u8),
    /// Detail line for the log surface.
    Log(String),
    /// A stage failed; the job is about to finish with `failed: true`.
    Error(String),
    /// Terminal event. `failed` is true iff any stage failed.
    Finished { failed: bool },
}

impl JobEvent {
    /// Whether this event terminates the job's stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobEvent::Finished { .. })
    }
}

/// Producer half of a job's event channel, owned solely by its runner.
///
/// Sending is infallible from the runner's point of view: if the consumer
/// dropped the receiver, the remaining events are simply muted.
pub(crate) struct EventSender {
    tx: mpsc::UnboundedSender<JobEvent>,
}

impl EventSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<JobEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: JobEvent) {
        let _ = self.tx.send(event);
    }

    pub(crate) fn status(&self, text: impl Into<String>) {
        self.send(JobEvent::Status(text.into()));
    }

    pub(crate) fn progress(&self, percent: u8) {
        self.send(JobEvent::Progress(percent));
    }

    pub(crate) fn log(&self, text: impl Into<String>) {
        self.send(JobEvent::Log(text.into()));
    }

    pub(crate) fn error(&self, text: impl Into<String>) {
        self.send(JobEvent::Error(text.into()));
    }

    pub(crate) fn finished(&self, failed: bool) {
        self.send(JobEvent::Finished { failed });
    }
}
