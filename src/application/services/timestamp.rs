//! Subtitle clock strings (`HH:MM:SS,mmm` / `HH:MM:SS.mmm`).

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// SubRip clock, comma before the milliseconds.
pub fn format_srt_timestamp(seconds: f64) -> String {
    format_clock(seconds, ',')
}

/// WebVTT clock, dot before the milliseconds.
pub fn format_vtt_timestamp(seconds: f64) -> String {
    format_clock(seconds, '.')
}

pub fn ms_to_seconds(ms: i64) -> f64 {
    ms as f64 / 1000.0
}

// Rounds the whole offset to milliseconds before splitting it up so the
// millisecond field never overflows into a fourth digit. Hours are unbounded.
fn format_clock(seconds: f64, separator: char) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let hours = total_ms / MS_PER_HOUR;
    let mins = (total_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let secs = (total_ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = total_ms % MS_PER_SECOND;

    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours, mins, secs, separator, millis
    )
}
