use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubGenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Process execution failed: {0}")]
    ProcessFailed(String),

    #[error("Process timed out: {0}")]
    ProcessTimeout(String),

    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("No audio track in {0}")]
    NoAudioTrack(PathBuf),

    #[error("Audio extraction failed: {0}")]
    AudioExtractionFailed(String),

    #[error("WAV error: {0}")]
    Wav(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Transcription produced no segments")]
    EmptyTranscript,

    #[error("Subtitle synthesis failed: {0}")]
    SynthesisFailed(String),
}

pub type Result<T> = std::result::Result<T, SubGenError>;

impl From<hound::Error> for SubGenError {
    fn from(err: hound::Error) -> Self {
        SubGenError::Wav(err.to_string())
    }
}
