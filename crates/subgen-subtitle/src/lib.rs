//! Subtitle synthesis collaborator.
//!
//! Renders a [`Transcript`](subgen_stt::Transcript) into SRT or ASS text
//! and writes it next to the source video. Output is written to a scratch
//! file in the target directory and renamed into place, so a failed
//! synthesis never leaves a partial subtitle file behind.

pub mod ass;
pub mod srt;

use std::fmt;
use std::io::Write;
use std::path::Path;

use log::debug;
use subgen_common::{Result, SubGenError};
use subgen_stt::Transcript;

/// Supported subtitle output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    Ass,
}

impl SubtitleFormat {
    /// File extension for the format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Ass => "ass",
        }
    }

    /// Display label used in status messages.
    pub fn label(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "SRT",
            SubtitleFormat::Ass => "ASS",
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Writes a transcript to a subtitle file in the requested format.
pub trait SubtitleSink: Send + Sync {
    fn write(&self, format: SubtitleFormat, transcript: &Transcript, output: &Path) -> Result<()>;
}

/// Default [`SubtitleSink`] writing to the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubtitleWriter;

impl SubtitleSink for SubtitleWriter {
    fn write(&self, format: SubtitleFormat, transcript: &Transcript, output: &Path) -> Result<()> {
        let rendered = match format {
            SubtitleFormat::Srt => srt::render_srt(transcript),
            SubtitleFormat::Ass => ass::render_ass(transcript),
        };

        let dir = output.parent().filter(|p| !p.as_os_str().is_empty());
        let mut scratch = match dir {
            Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
            None => tempfile::NamedTempFile::new()?,
        };
        scratch.write_all(rendered.as_bytes())?;
        scratch.flush()?;
        scratch.persist(output).map_err(|e| SubGenError::Io(e.error))?;

        debug!(
            "Wrote {} {} subtitles to {}",
            transcript.segments.len(),
            format,
            output.display()
        );
        Ok(())
    }
}
