//! whisper.cpp subprocess backend.
//!
//! Runs `whisper-cli` with JSON output enabled and parses the result file.
//! Model loading and inference happen inside the child process, so a call
//! can block for minutes; an optional wall-clock guard kills a wedged
//! child.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use log::{debug, warn};
use serde_json::Value;
use subgen_common::{Result, SubGenError};
use wait_timeout::ChildExt;

use crate::language::resolve_selector;
use crate::{Segment, Transcriber, Transcript};

/// [`Transcriber`](crate::Transcriber) backed by the `whisper-cli` binary.
#[derive(Debug, Clone)]
pub struct WhisperCliTranscriber {
    binary: PathBuf,
    model: PathBuf,
    timeout: Option<Duration>,
}

impl WhisperCliTranscriber {
    pub fn new(binary: impl Into<PathBuf>, model: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            model: model.into(),
            timeout: None,
        }
    }

    /// Kill the child process if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn run(&self, audio: &Path, language: Option<String>) -> Result<()> {
        let prefix = audio.with_extension("");
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-m")
            .arg(&self.model)
            .arg("-f")
            .arg(audio)
            .arg("-l")
            .arg(language.as_deref().unwrap_or("auto"))
            .arg("-oj")
            .arg("-of")
            .arg(&prefix)
            .arg("-np")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        debug!("Running whisper-cli: {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| {
            SubGenError::ProcessFailed(format!(
                "failed to spawn {}: {}",
                self.binary.display(),
                e
            ))
        })?;

        // Drain stderr on its own thread so a chatty child never fills the
        // pipe buffer and blocks while we sit in wait().
        let stderr_pipe = child.stderr.take();
        let stderr_reader = std::thread::spawn(move || {
            let mut buf = String::new();
            if let Some(mut pipe) = stderr_pipe {
                let _ = pipe.read_to_string(&mut buf);
            }
            buf
        });

        let status = match self.timeout {
            Some(timeout) => match child.wait_timeout(timeout).map_err(SubGenError::Io)? {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = stderr_reader.join();
                    return Err(SubGenError::ProcessTimeout(format!(
                        "whisper-cli exceeded {:?}",
                        timeout
                    )));
                }
            },
            None => child.wait().map_err(SubGenError::Io)?,
        };

        if !status.success() {
            let stderr = stderr_reader.join().unwrap_or_default();
            return Err(SubGenError::TranscriptionFailed(format!(
                "whisper-cli exited with code {:?}: {}",
                status.code(),
                stderr.trim()
            )));
        }

        let _ = stderr_reader.join();
        Ok(())
    }
}

impl Transcriber for WhisperCliTranscriber {
    fn transcribe(&self, audio: &Path, language: Option<&str>) -> Result<Transcript> {
        if !audio.exists() {
            return Err(SubGenError::SourceNotFound(audio.to_path_buf()));
        }

        self.run(audio, resolve_selector(language))?;

        let json_path = audio.with_extension("json");
        let raw = std::fs::read_to_string(&json_path).map_err(|e| {
            SubGenError::TranscriptionFailed(format!(
                "whisper-cli produced no result file at {}: {}",
                json_path.display(),
                e
            ))
        })?;
        let _ = std::fs::remove_file(&json_path);

        parse_whisper_json(&raw)
    }
}

/// Parse whisper.cpp's `--output-json` document into a [`Transcript`].
pub fn parse_whisper_json(raw: &str) -> Result<Transcript> {
    let json: Value = serde_json::from_str(raw)
        .map_err(|e| SubGenError::TranscriptionFailed(format!("invalid result JSON: {}", e)))?;

    let language = json
        .get("result")
        .and_then(|r| r.get("language"))
        .and_then(|l| l.as_str())
        .unwrap_or("unknown")
        .to_string();

    let mut segments = Vec::new();
    if let Some(entries) = json.get("transcription").and_then(|t| t.as_array()) {
        for entry in entries {
            let Some(text) = entry.get("text").and_then(|t| t.as_str()) else {
                continue;
            };
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let offsets = entry.get("offsets");
            let start_ms = offsets
                .and_then(|o| o.get("from"))
                .and_then(|v| v.as_u64())
                .unwrap_or(0);
            let end_ms = offsets
                .and_then(|o| o.get("to"))
                .and_then(|v| v.as_u64())
                .unwrap_or(start_ms);
            segments.push(Segment {
                start_ms,
                end_ms,
                text: text.to_string(),
            });
        }
    } else {
        warn!("whisper-cli result has no transcription array");
    }

    Ok(Transcript { language, segments })
}
