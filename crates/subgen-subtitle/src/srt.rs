//! SRT rendering on top of `srtlib`.

use srtlib::{Subtitle, Timestamp};
use subgen_stt::Transcript;

/// Render a transcript as SubRip text. Segment numbering starts at 1.
pub fn render_srt(transcript: &Transcript) -> String {
    let entries: Vec<String> = transcript
        .segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            Subtitle::new(
                i + 1,
                timestamp(segment.start_ms),
                timestamp(segment.end_ms),
                segment.text.clone(),
            )
            .to_string()
        })
        .collect();

    if entries.is_empty() {
        return String::new();
    }
    let mut rendered = entries.join("\n\n");
    rendered.push('\n');
    rendered
}

fn timestamp(ms: u64) -> Timestamp {
    let hours = (ms / 3_600_000).min(u64::from(u8::MAX)) as u8;
    let minutes = ((ms / 60_000) % 60) as u8;
    let seconds = ((ms / 1_000) % 60) as u8;
    let millis = (ms % 1_000) as u16;
    Timestamp::new(hours, minutes, seconds, millis)
}
