//! The job runner: executes one job's three stages in strict order on a
//! background execution context, emitting events after each milestone.
//!
//! Contract: abort on the first stage failure, always attempt cleanup of
//! the intermediate artifact, always emit exactly one terminal event as
//! the last action. Stage failures are converted into `Error` events;
//! nothing unwinds across the channel.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use subgen_common::{Result, SubGenError};
use subgen_media::AudioExtractor;
use subgen_stt::Transcriber;
use subgen_subtitle::SubtitleSink;

use crate::event::EventSender;
use crate::job::{JobRequest, JobState, Stage};

/// The external collaborators one job drives, one per stage.
#[derive(Clone)]
pub struct Collaborators {
    pub extractor: Arc<dyn AudioExtractor>,
    pub transcriber: Arc<dyn Transcriber>,
    pub sink: Arc<dyn SubtitleSink>,
}

/// Run one job to completion. Blocks for the duration of the job; must be
/// called on a blocking-capable context, never the consumer's.
pub(crate) fn run_job(request: JobRequest, collaborators: Collaborators, events: EventSender) {
    events.status("Starting");
    events.progress(0);

    let artifact = match scratch_wav_path() {
        Ok(path) => path,
        Err(e) => {
            events.error(format!("Failed to create intermediate audio file: {}", e));
            events.finished(true);
            return;
        }
    };
    events.log(format!("Intermediate audio artifact: {}", artifact.display()));

    let mut state = JobState::new(artifact);
    let failed = match execute_stages(&request, &collaborators, &events, &mut state) {
        Ok(()) => false,
        Err(e) => {
            state.stage = Stage::Failed;
            events.error(e.to_string());
            true
        }
    };

    cleanup_artifact(&state.artifact, &events);
    events.finished(failed);
}

fn execute_stages(
    request: &JobRequest,
    collaborators: &Collaborators,
    events: &EventSender,
    state: &mut JobState,
) -> Result<()> {
    // Stage 1: audio extraction.
    state.stage = Stage::ExtractingAudio;
    collaborators
        .extractor
        .extract(&request.source, &state.artifact)?;
    events.progress(state.progress_to(25));

    // Stage 2: transcription. Model loading can take a long time.
    state.stage = Stage::Transcribing;
    events.status("Transcribing");
    let transcript = collaborators
        .transcriber
        .transcribe(&state.artifact, request.language.as_deref())?;
    if transcript.segments.is_empty() {
        return Err(SubGenError::EmptyTranscript);
    }
    events.log(format!(
        "Transcription complete, language: {}",
        transcript.language
    ));
    events.progress(state.progress_to(75));

    // Stage 3: subtitle synthesis next to the source file.
    state.stage = Stage::GeneratingSubtitles;
    let output = request.output_path();
    events.status(format!("Generating {} subtitles", request.format.label()));
    collaborators
        .sink
        .write(request.format, &transcript, &output)?;
    events.status(format!("Subtitles saved to {}", output.display()));
    events.log(format!("Subtitles written to {}", output.display()));
    events.progress(state.progress_to(100));

    state.stage = Stage::Done;
    Ok(())
}

/// Unique scratch WAV path. The file is created (and kept) so the name is
/// reserved until cleanup deletes it.
fn scratch_wav_path() -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("subgen-")
        .suffix(".wav")
        .tempfile()?;
    let (_, path) = file.keep().map_err(|e| SubGenError::Io(e.error))?;
    Ok(path)
}

/// Delete the intermediate artifact. Runs on every outcome; a failed
/// delete is logged, never escalated to a job failure.
fn cleanup_artifact(artifact: &Path, events: &EventSender) {
    if !artifact.exists() {
        events.log(format!(
            "Intermediate artifact {} was already removed",
            artifact.display()
        ));
        return;
    }
    match std::fs::remove_file(artifact) {
        Ok(()) => events.log(format!(
            "Removed intermediate artifact {}",
            artifact.display()
        )),
        Err(e) => events.log(format!(
            "Warning: could not remove intermediate artifact {}: {}",
            artifact.display(),
            e
        )),
    }
}
