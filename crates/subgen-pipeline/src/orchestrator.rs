//! Orchestrator front: job admission and event draining.
//!
//! Holds at most one active job. `submit` either starts the job runner on
//! a blocking task or rejects synchronously; `poll` drains whatever events
//! are currently queued without blocking, so an interactive surface can
//! call it on a fixed short interval and stay responsive.

use std::path::PathBuf;

use log::{info, warn};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;

use crate::event::{EventSender, JobEvent};
use crate::job::JobRequest;
use crate::runner::{run_job, Collaborators};

/// Synchronous rejection reasons. No job starts when these are returned.
#[derive(Error, Debug)]
pub enum AdmissionError {
    #[error("no source file given")]
    MissingSource,

    #[error("source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("a job is already active")]
    JobActive,
}

struct ActiveJob {
    events: mpsc::UnboundedReceiver<JobEvent>,
    runner: JoinHandle<()>,
}

/// Single-job pipeline orchestrator.
///
/// State machine: Idle → (submit accepted) → Busy → (terminal event
/// observed, or runner death detected) → Idle. The busy state is mutated
/// only at those two transition points.
pub struct Orchestrator {
    collaborators: Collaborators,
    active: Option<ActiveJob>,
}

impl Orchestrator {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            active: None,
        }
    }

    /// Whether a job is currently active.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Admit a job and start its runner on a blocking task.
    ///
    /// Each accepted job gets a fresh event channel; nothing is shared
    /// with a previous job. Must be called within a tokio runtime.
    pub fn submit(&mut self, request: JobRequest) -> Result<(), AdmissionError> {
        if self.active.is_some() {
            return Err(AdmissionError::JobActive);
        }
        if request.source.as_os_str().is_empty() {
            return Err(AdmissionError::MissingSource);
        }
        if !request.source.exists() {
            return Err(AdmissionError::SourceNotFound(request.source.clone()));
        }

        info!("Job accepted: {}", request.source.display());

        let (tx, rx) = mpsc::unbounded_channel();
        let collaborators = self.collaborators.clone();
        let runner = tokio::task::spawn_blocking(move || {
            run_job(request, collaborators, EventSender::new(tx));
        });

        self.active = Some(ActiveJob { events: rx, runner });
        Ok(())
    }

    /// Drain the events queued since the last poll, in emission order.
    /// Never blocks. Observing the terminal event returns the orchestrator
    /// to idle.
    ///
    /// If the runner died without emitting a terminal event, a generic
    /// "ended unexpectedly" status and a failed terminal event are
    /// synthesized so consumers always reach a terminal state. That path
    /// is a safety net, not the primary completion path.
    pub fn poll(&mut self) -> Vec<JobEvent> {
        let Some(job) = self.active.as_mut() else {
            return Vec::new();
        };

        let mut drained = Vec::new();
        let mut terminal = false;
        loop {
            match job.events.try_recv() {
                Ok(event) => {
                    terminal = event.is_terminal();
                    drained.push(event);
                    if terminal {
                        break;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!(
                        "Job runner ended without a terminal event (runner finished: {})",
                        job.runner.is_finished()
                    );
                    drained.push(JobEvent::Status(
                        "Processing ended unexpectedly".to_string(),
                    ));
                    drained.push(JobEvent::Finished { failed: true });
                    terminal = true;
                    break;
                }
            }
        }

        if terminal {
            self.active = None;
        }
        drained
    }
}
