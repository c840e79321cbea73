use crate::domain::{ArtifactSummary, Segment};

use super::timestamp::{format_srt_timestamp, format_vtt_timestamp, ms_to_seconds};

const VTT_HEADER: &str = "WEBVTT";

/// Renders the SubRip artifact: numbered cues separated by blank lines.
pub fn build_srt(segments: &[Segment]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(segments.len() * 4);

    for (i, seg) in segments.iter().enumerate() {
        lines.push((i + 1).to_string());
        lines.push(format!(
            "{} --> {}",
            format_srt_timestamp(ms_to_seconds(seg.start_ms)),
            format_srt_timestamp(ms_to_seconds(seg.end_ms))
        ));
        lines.push(seg.text.trim().to_string());
        lines.push(String::new());
    }

    finish(lines)
}

/// Renders the WebVTT artifact: fixed header, then unnumbered cues.
pub fn build_vtt(segments: &[Segment]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(segments.len() * 3 + 2);
    lines.push(VTT_HEADER.to_string());
    lines.push(String::new());

    for seg in segments {
        lines.push(format!(
            "{} --> {}",
            format_vtt_timestamp(ms_to_seconds(seg.start_ms)),
            format_vtt_timestamp(ms_to_seconds(seg.end_ms))
        ));
        lines.push(seg.text.trim().to_string());
        lines.push(String::new());
    }

    finish(lines)
}

pub fn build_summary(segments: &[Segment]) -> ArtifactSummary {
    ArtifactSummary {
        srt: build_srt(segments),
        vtt: build_vtt(segments),
        num_segments: segments.len(),
    }
}

fn finish(lines: Vec<String>) -> String {
    let mut body = lines.join("\n").trim_end().to_string();
    body.push('\n');
    body
}
