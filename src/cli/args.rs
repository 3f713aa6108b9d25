//! Command-line value parsers

use crate::domain::errors::DomainError;
use crate::domain::model::ClipSpec;

/// Parse the `--clip` value
pub fn parse_clip_spec(value: &str) -> Result<ClipSpec, DomainError> {
    ClipSpec::parse(value)
}

/// Parse a resolution given as `1080p` or `1080`
pub fn parse_resolution(value: &str) -> Result<u32, String> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_suffix(['p', 'P'])
        .unwrap_or(trimmed);

    match digits.parse::<u32>() {
        Ok(height) if height > 0 => Ok(height),
        _ => Err(format!(
            "'{}' is not a resolution (expected a height such as 720p or 1080)",
            value
        )),
    }
}
