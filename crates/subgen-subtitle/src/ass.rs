//! Advanced SubStation Alpha rendering.
//!
//! Produces a minimal v4.00+ script with a single default style; players
//! are free to restyle. Dialogue text uses `\N` for embedded line breaks.

use std::fmt::Write;

use subgen_stt::Transcript;

const SCRIPT_INFO: &str = "\
[Script Info]
Title: Generated by subgen
ScriptType: v4.00+
WrapStyle: 0
ScaledBorderAndShadow: yes
PlayResX: 384
PlayResY: 288
";

const STYLES: &str = "\
[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,16,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,1,0,2,10,10,10,1
";

const EVENTS_HEADER: &str = "\
[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

/// Render a transcript as an ASS script.
pub fn render_ass(transcript: &Transcript) -> String {
    let mut out = String::new();
    out.push_str(SCRIPT_INFO);
    out.push('\n');
    out.push_str(STYLES);
    out.push('\n');
    out.push_str(EVENTS_HEADER);

    for segment in &transcript.segments {
        let _ = writeln!(
            out,
            "Dialogue: 0,{},{},Default,,0,0,0,,{}",
            ass_timestamp(segment.start_ms),
            ass_timestamp(segment.end_ms),
            escape_text(&segment.text)
        );
    }

    out
}

/// ASS timestamps are `H:MM:SS.CC` with centisecond precision.
fn ass_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1_000) % 60;
    let centis = (ms % 1_000) / 10;
    format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
}

fn escape_text(text: &str) -> String {
    text.replace('\n', "\\N")
}
