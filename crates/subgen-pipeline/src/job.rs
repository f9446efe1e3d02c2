//! Job request and per-run state.

use std::path::PathBuf;

use subgen_subtitle::SubtitleFormat;

/// Everything needed to run one job. Immutable for the runner's lifetime.
#[derive(Debug, Clone)]
pub struct JobRequest {
    /// Source media file.
    pub source: PathBuf,
    /// Spoken-language selector; `None` means auto-detect.
    pub language: Option<String>,
    /// Requested subtitle output format.
    pub format: SubtitleFormat,
}

impl JobRequest {
    pub fn new(source: impl Into<PathBuf>, format: SubtitleFormat) -> Self {
        Self {
            source: source.into(),
            language: None,
            format,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Final subtitle path: sibling of the source with the format's
    /// extension.
    pub fn output_path(&self) -> PathBuf {
        self.source.with_extension(self.format.extension())
    }
}

/// The stage a job is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ExtractingAudio,
    Transcribing,
    GeneratingSubtitles,
    Done,
    Failed,
}

/// Transient state owned exclusively by one job runner.
#[derive(Debug)]
pub struct JobState {
    /// Current stage.
    pub stage: Stage,
    /// Intermediate audio artifact; created before stage 1, deleted during
    /// cleanup regardless of outcome.
    pub artifact: PathBuf,
    progress: u8,
}

impl JobState {
    pub fn new(artifact: PathBuf) -> Self {
        Self {
            stage: Stage::ExtractingAudio,
            artifact,
            progress: 0,
        }
    }

    /// Advance accumulated progress, clamped to 0-100 and never moving
    /// backwards. Returns the value to report.
    pub fn progress_to(&mut self, percent: u8) -> u8 {
        self.progress = self.progress.max(percent.min(100));
        self.progress
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }
}
