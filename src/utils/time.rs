//! Time offset parsing and formatting for the `[minutes:]seconds` notation

/// Parse an offset written as `seconds` or `minutes:seconds` into whole seconds
///
/// Returns `None` when either component is not a non-negative integer or the
/// total overflows.
pub fn parse_offset(part: &str) -> Option<u32> {
    let part = part.trim();

    match part.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes = parse_component(minutes)?;
            let seconds = parse_component(seconds)?;
            minutes.checked_mul(60)?.checked_add(seconds)
        }
        None => parse_component(part),
    }
}

/// Format whole seconds as `M:SS`
pub fn format_offset(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Format whole seconds for ffmpeg's `-ss`/`-to` options (`HH:MM:SS`)
pub fn format_timestamp(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

fn parse_component(text: &str) -> Option<u32> {
    let text = text.trim();
    // u32::from_str accepts a leading '+', which is not part of the notation
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
