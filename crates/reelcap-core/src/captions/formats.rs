//! Caption Format Support
//!
//! SRT (SubRip) parsing and export for the interchange boundary. Exported
//! segments carry a 1-based index, a `HH:MM:SS,mmm --> HH:MM:SS,mmm` time
//! range, and the segment text, blank-line separated.

use thiserror::Error;

use super::models::CaptionSegment;
use crate::TimeMs;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during caption parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Unexpected end of input")]
    UnexpectedEnd,
}

// =============================================================================
// SRT Export
// =============================================================================

/// Exports a caption timeline to SRT format
pub fn export_srt(segments: &[CaptionSegment]) -> String {
    let mut output = String::new();

    for (index, segment) in segments.iter().enumerate() {
        output.push_str(&format!("{}\n", index + 1));

        let start = format_srt_timestamp(segment.start_ms);
        let end = format_srt_timestamp(segment.end_ms);
        output.push_str(&format!("{} --> {}\n", start, end));

        output.push_str(&segment.text);
        output.push_str("\n\n");
    }

    output.trim_end().to_string()
}

/// Formats milliseconds as an SRT timestamp (00:00:00,000)
fn format_srt_timestamp(time_ms: TimeMs) -> String {
    let total_ms = time_ms.max(0);
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, ms)
}

// =============================================================================
// SRT Parsing
// =============================================================================

/// Parses SRT (SubRip) content into a caption timeline
///
/// Parsed segments carry no word-level timing; the line wrap engine
/// synthesizes pseudo-words for them on demand.
///
/// # SRT Format
///
/// ```text
/// 1
/// 00:00:01,000 --> 00:00:04,000
/// First caption text
///
/// 2
/// 00:00:05,500 --> 00:00:08,000
/// Second caption text
/// with multiple lines
/// ```
pub fn parse_srt(content: &str) -> Result<Vec<CaptionSegment>, ParseError> {
    let mut segments = Vec::new();
    let mut lines = content.lines().peekable();
    let mut index = 0;

    while lines.peek().is_some() {
        // Skip empty lines
        while lines.peek().is_some_and(|l| l.trim().is_empty()) {
            lines.next();
        }

        if lines.peek().is_none() {
            break;
        }

        // Sequence number (not validated; renumbered on export)
        let _seq = lines.next().ok_or(ParseError::UnexpectedEnd)?;

        let timestamp_line = lines.next().ok_or(ParseError::UnexpectedEnd)?;
        let (start_ms, end_ms) = parse_srt_timestamp_line(timestamp_line)?;

        // Text may span multiple lines
        let mut text_lines = Vec::new();
        while let Some(line) = lines.peek() {
            if line.trim().is_empty() {
                break;
            }
            text_lines.push(lines.next().unwrap().to_string());
        }

        if text_lines.is_empty() {
            return Err(ParseError::MissingData("Caption text".to_string()));
        }

        let text = text_lines.join("\n");
        let id = format!("srt-{}", index);
        segments.push(CaptionSegment::new(&id, start_ms, end_ms, &text));
        index += 1;
    }

    Ok(segments)
}

/// Parses an SRT timestamp line (e.g., "00:00:01,000 --> 00:00:04,000")
fn parse_srt_timestamp_line(line: &str) -> Result<(TimeMs, TimeMs), ParseError> {
    let parts: Vec<&str> = line.split("-->").collect();
    if parts.len() != 2 {
        return Err(ParseError::InvalidFormat(format!(
            "Expected 'start --> end' format: {}",
            line
        )));
    }

    let start = parse_srt_timestamp(parts[0].trim())?;
    let end = parse_srt_timestamp(parts[1].trim())?;

    Ok((start, end))
}

/// Parses an SRT timestamp (e.g., "00:01:23,456") into milliseconds
fn parse_srt_timestamp(ts: &str) -> Result<TimeMs, ParseError> {
    // Format: HH:MM:SS,mmm (a period is tolerated before the millis)
    let normalized = ts.replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();

    if parts.len() != 3 {
        return Err(ParseError::InvalidTimestamp(ts.to_string()));
    }

    let hours: TimeMs = parts[0]
        .parse()
        .map_err(|_| ParseError::InvalidTimestamp(ts.to_string()))?;
    let minutes: TimeMs = parts[1]
        .parse()
        .map_err(|_| ParseError::InvalidTimestamp(ts.to_string()))?;

    let sec_parts: Vec<&str> = parts[2].split('.').collect();
    let seconds: TimeMs = sec_parts[0]
        .parse()
        .map_err(|_| ParseError::InvalidTimestamp(ts.to_string()))?;
    let millis: TimeMs = match sec_parts.len() {
        1 => 0,
        2 => sec_parts[1]
            .parse()
            .map_err(|_| ParseError::InvalidTimestamp(ts.to_string()))?,
        _ => return Err(ParseError::InvalidTimestamp(ts.to_string())),
    };

    Ok(((hours * 60 + minutes) * 60 + seconds) * 1000 + millis)
}

// =============================================================================
// Tests
// =============================================================================
