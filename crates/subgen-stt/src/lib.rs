//! Speech-to-text collaborator.
//!
//! Defines the transcript data model and the [`Transcriber`] seam the
//! pipeline consumes, plus a backend that shells out to whisper.cpp's
//! `whisper-cli` and parses its JSON output.

pub mod language;
pub mod whisper_cli;

use std::path::Path;

use serde::{Deserialize, Serialize};
use subgen_common::Result;

pub use language::whisper_language_code;
pub use whisper_cli::WhisperCliTranscriber;

/// One timed piece of recognized speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

/// Output of a transcription run. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Language tag that was detected or forced.
    pub language: String,
    /// Segments in playback order.
    pub segments: Vec<Segment>,
}

/// Turns an audio file into a [`Transcript`].
///
/// `language` is either a language selector (a Whisper code such as `en`,
/// or one of the human-readable names in [`language`]) or `None` for
/// auto-detection. Implementations may block for long, unbounded durations;
/// callers are expected to run them off the interactive context.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, audio: &Path, language: Option<&str>) -> Result<Transcript>;
}
