//! Audio extraction collaborator.
//!
//! Pulls the audio track out of a video container with ffmpeg, resampled
//! to the mono 16 kHz PCM layout the speech-to-text stage expects, and
//! sanity-checks the produced WAV before handing it downstream.

use std::path::Path;
use std::process::{Command, Stdio};

use log::{debug, warn};
use subgen_common::{Result, SubGenError};

/// Sample rate required by the whisper family of models.
pub const STT_SAMPLE_RATE: u32 = 16_000;

/// Extracts the audio track of a media file into a WAV file.
pub trait AudioExtractor: Send + Sync {
    fn extract(&self, source: &Path, output: &Path) -> Result<()>;
}

/// ffmpeg-backed [`AudioExtractor`].
#[derive(Debug, Clone)]
pub struct FfmpegExtractor {
    pub sample_rate: u32,
}

impl Default for FfmpegExtractor {
    fn default() -> Self {
        Self {
            sample_rate: STT_SAMPLE_RATE,
        }
    }
}

impl AudioExtractor for FfmpegExtractor {
    fn extract(&self, source: &Path, output: &Path) -> Result<()> {
        if !source.exists() {
            return Err(SubGenError::SourceNotFound(source.to_path_buf()));
        }

        if !has_audio_track(source)? {
            return Err(SubGenError::NoAudioTrack(source.to_path_buf()));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-hide_banner")
            .arg("-y")
            .arg("-i")
            .arg(source)
            .arg("-vn")
            .arg("-acodec")
            .arg("pcm_s16le")
            .arg("-ar")
            .arg(self.sample_rate.to_string())
            .arg("-ac")
            .arg("1")
            .arg(output)
            .stdin(Stdio::null());

        debug!("Running ffmpeg: {:?}", cmd);

        let result = cmd
            .output()
            .map_err(|e| SubGenError::ProcessFailed(format!("failed to spawn ffmpeg: {}", e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(SubGenError::AudioExtractionFailed(format!(
                "ffmpeg exited with code {:?}: {}",
                result.status.code(),
                stderr.trim()
            )));
        }

        validate_wav(output)
    }
}

/// Check whether ffmpeg is installed and reachable through PATH.
pub fn ffmpeg_available() -> bool {
    match Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) if status.success() => true,
        Ok(status) => {
            warn!("ffmpeg -version exited with code {:?}", status.code());
            false
        }
        Err(e) => {
            warn!("ffmpeg not found in PATH: {}", e);
            false
        }
    }
}

/// Probe a media file with ffprobe and report whether it carries at least
/// one audio stream.
pub fn has_audio_track(source: &Path) -> Result<bool> {
    if !source.exists() {
        return Err(SubGenError::SourceNotFound(source.to_path_buf()));
    }

    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("a")
        .arg("-show_entries")
        .arg("stream=index")
        .arg("-of")
        .arg("csv=p=0")
        .arg(source)
        .output()
        .map_err(|e| SubGenError::ProcessFailed(format!("failed to spawn ffprobe: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SubGenError::ProcessFailed(format!(
            "ffprobe exited with code {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }

    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
}

/// Ensure the extracted file is a mono 16 kHz 16-bit WAV with at least one
/// sample; whisper cannot handle empty or differently shaped payloads.
pub fn validate_wav(path: &Path) -> Result<()> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    if spec.channels != 1 || spec.sample_rate != STT_SAMPLE_RATE || spec.bits_per_sample != 16 {
        return Err(SubGenError::Wav(format!(
            "unsupported wav format: {}ch {}Hz {}-bit",
            spec.channels, spec.sample_rate, spec.bits_per_sample
        )));
    }
    if reader
        .samples::<i16>()
        .next()
        .transpose()
        .unwrap_or(None)
        .is_none()
    {
        return Err(SubGenError::Wav("wav contains no samples".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, samples: usize) {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for _ in 0..samples * channels as usize {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn extract_rejects_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = FfmpegExtractor::default().extract(
            Path::new("/nonexistent/video.mkv"),
            &dir.path().join("out.wav"),
        );
        assert!(matches!(result, Err(SubGenError::SourceNotFound(_))));
    }

    #[test]
    fn probe_rejects_missing_source() {
        let result = has_audio_track(Path::new("/nonexistent/video.mkv"));
        assert!(matches!(result, Err(SubGenError::SourceNotFound(_))));
    }

    #[test]
    fn validate_accepts_mono_16k() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.wav");
        write_wav(&path, STT_SAMPLE_RATE, 1, 1600);
        assert!(validate_wav(&path).is_ok());
    }

    #[test]
    fn validate_rejects_wrong_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 44_100, 2, 1600);
        assert!(matches!(validate_wav(&path), Err(SubGenError::Wav(_))));
    }

    #[test]
    fn validate_rejects_empty_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav(&path, STT_SAMPLE_RATE, 1, 0);
        assert!(matches!(validate_wav(&path), Err(SubGenError::Wav(_))));
    }

    #[test]
    fn validate_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"not a wav file").unwrap();
        assert!(matches!(validate_wav(&path), Err(SubGenError::Wav(_))));
    }
}
