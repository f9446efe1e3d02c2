//! Command-line consumer of the subtitle pipeline.
//!
//! Submits one job and drains its event stream on a fixed 100 ms
//! interval, mapping events onto log output. Exits non-zero when the job
//! finishes with an error.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use clap::{Parser, ValueEnum};
use log::{debug, error, info};
use subgen_media::FfmpegExtractor;
use subgen_pipeline::{Collaborators, JobEvent, JobRequest, Orchestrator, SubtitleFormat};
use subgen_stt::WhisperCliTranscriber;
use subgen_subtitle::SubtitleWriter;

/// How often the drain loop polls the event channel.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "subgen", version, about = "Generate subtitles for a video file")]
struct Args {
    /// Source video file
    source: PathBuf,

    /// Spoken language (name or Whisper code); omit to auto-detect
    #[arg(short, long)]
    language: Option<String>,

    /// Subtitle output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Srt)]
    format: FormatArg,

    /// Path to the whisper.cpp model file
    #[arg(short, long)]
    model: PathBuf,

    /// whisper.cpp executable to run
    #[arg(long, default_value = "whisper-cli")]
    whisper_bin: PathBuf,

    /// Kill the transcription process after this many seconds (default: no limit)
    #[arg(long)]
    stt_timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Srt,
    Ass,
}

impl From<FormatArg> for SubtitleFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Srt => SubtitleFormat::Srt,
            FormatArg::Ass => SubtitleFormat::Ass,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !subgen_media::ffmpeg_available() {
        bail!("ffmpeg not found; install it and make sure it is in PATH");
    }

    let mut transcriber = WhisperCliTranscriber::new(&args.whisper_bin, &args.model);
    if let Some(secs) = args.stt_timeout {
        transcriber = transcriber.with_timeout(Duration::from_secs(secs));
    }

    let collaborators = Collaborators {
        extractor: Arc::new(FfmpegExtractor::default()),
        transcriber: Arc::new(transcriber),
        sink: Arc::new(SubtitleWriter),
    };

    let mut request = JobRequest::new(args.source, args.format.into());
    if let Some(language) = args.language {
        request = request.with_language(language);
    }

    let mut orchestrator = Orchestrator::new(collaborators);
    orchestrator
        .submit(request)
        .map_err(|e| anyhow::anyhow!("job rejected: {e}"))?;

    let failed = drain(&mut orchestrator).await;
    if failed {
        bail!("subtitle generation failed; check the log above");
    }
    Ok(())
}

/// Poll the orchestrator until the job's terminal event, rendering events
/// as they arrive. Returns whether the job failed.
async fn drain(orchestrator: &mut Orchestrator) -> bool {
    loop {
        for event in orchestrator.poll() {
            match event {
                JobEvent::Status(text) => info!("{}", text),
                JobEvent::Progress(percent) => info!("progress: {}%", percent),
                JobEvent::Log(text) => debug!("{}", text),
                JobEvent::Error(text) => error!("{}", text),
                JobEvent::Finished { failed } => return failed,
            }
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
