//! Duration formatting for display strings

/// Format a millisecond duration for display.
///
/// Tiers: `H:MM:SS` when hours are present, `MM:SS` when minutes are,
/// `00:SS` when only seconds are, `"00:00"` for zero. Hours wrap at 24
/// (a day-long duration starts over, matching clock-style display).
pub fn format_duration(ms: u64) -> String {
    let hours = (ms / 3_600_000) % 24;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1_000) % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{:02}:{:02}", minutes, seconds)
    } else if seconds > 0 {
        format!("00:{:02}", seconds)
    } else {
        "00:00".to_string()
    }
}
