//! Pipeline orchestrator for turning a video file into subtitles.
//!
//! Sequences three stages (audio extraction, transcription, subtitle
//! synthesis) on a background execution context, owns the single
//! in-flight job and its intermediate audio artifact, and reports
//! status/progress/log/error/finish events over a per-job channel to a
//! non-blocking polling consumer.

pub mod event;
pub mod job;
pub mod orchestrator;
pub mod runner;

pub use event::JobEvent;
pub use job::{JobRequest, JobState, Stage};
pub use orchestrator::{AdmissionError, Orchestrator};
pub use runner::Collaborators;
pub use subgen_common::{Result, SubGenError};
pub use subgen_stt::{Segment, Transcriber, Transcript};
pub use subgen_subtitle::SubtitleFormat;

#[cfg(test)]
pub(crate) mod testing {
    //! Stub collaborators for exercising the runner and orchestrator.

    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use subgen_common::{Result, SubGenError};
    use subgen_media::AudioExtractor;
    use subgen_stt::{Segment, Transcriber, Transcript};
    use subgen_subtitle::{SubtitleFormat, SubtitleSink};
    use tokio::sync::mpsc;

    use crate::event::JobEvent;

    /// Collect everything buffered in a job's event channel.
    pub(crate) fn drain_channel(mut rx: mpsc::UnboundedReceiver<JobEvent>) -> Vec<JobEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[derive(Default)]
    pub(crate) struct StubExtractor {
        calls: AtomicUsize,
        outputs: Mutex<Vec<PathBuf>>,
        failure: Mutex<Option<SubGenError>>,
        panics: bool,
    }

    impl StubExtractor {
        pub(crate) fn panicking() -> Self {
            Self {
                panics: true,
                ..Self::default()
            }
        }

        pub(crate) fn fail_with(&self, error: SubGenError) {
            *self.failure.lock().unwrap() = Some(error);
        }

        pub(crate) fn last_output(&self) -> Option<PathBuf> {
            self.outputs.lock().unwrap().last().cloned()
        }
    }

    impl AudioExtractor for StubExtractor {
        fn extract(&self, _source: &Path, output: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outputs.lock().unwrap().push(output.to_path_buf());
            if self.panics {
                panic!("extractor crashed");
            }
            if let Some(error) = self.failure.lock().unwrap().take() {
                return Err(error);
            }
            std::fs::write(output, b"fake wav")?;
            Ok(())
        }
    }

    pub(crate) struct StubTranscriber {
        calls: AtomicUsize,
        failure: Mutex<Option<SubGenError>>,
        empty: bool,
    }

    impl Default for StubTranscriber {
        fn default() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failure: Mutex::new(None),
                empty: false,
            }
        }
    }

    impl StubTranscriber {
        pub(crate) fn empty() -> Self {
            Self {
                empty: true,
                ..Self::default()
            }
        }

        pub(crate) fn fail_with(&self, error: SubGenError) {
            *self.failure.lock().unwrap() = Some(error);
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Transcriber for StubTranscriber {
        fn transcribe(&self, _audio: &Path, _language: Option<&str>) -> Result<Transcript> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = self.failure.lock().unwrap().take() {
                return Err(error);
            }
            let segments = if self.empty {
                Vec::new()
            } else {
                vec![
                    Segment {
                        start_ms: 0,
                        end_ms: 2500,
                        text: "Hello there.".to_string(),
                    },
                    Segment {
                        start_ms: 2500,
                        end_ms: 4000,
                        text: "General Kenobi.".to_string(),
                    },
                ]
            };
            Ok(Transcript {
                language: "en".to_string(),
                segments,
            })
        }
    }

    #[derive(Default)]
    pub(crate) struct StubSink {
        calls: AtomicUsize,
        outputs: Mutex<Vec<PathBuf>>,
        failure: Mutex<Option<SubGenError>>,
    }

    impl StubSink {
        pub(crate) fn fail_with(&self, error: SubGenError) {
            *self.failure.lock().unwrap() = Some(error);
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn last_output(&self) -> Option<PathBuf> {
            self.outputs.lock().unwrap().last().cloned()
        }
    }

    impl SubtitleSink for StubSink {
        fn write(
            &self,
            _format: SubtitleFormat,
            _transcript: &Transcript,
            output: &Path,
        ) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = self.failure.lock().unwrap().take() {
                return Err(error);
            }
            self.outputs.lock().unwrap().push(output.to_path_buf());
            Ok(())
        }
    }
}
