//! Transcript Ingestion Adapter
//!
//! Converts a raw transcription result (segments of words with start/end
//! times, already in milliseconds) into the engine's canonical caption
//! timeline. The transcription service itself is an external collaborator;
//! this module only validates and reshapes its output.

use serde::{Deserialize, Serialize};

use super::models::{CaptionSegment, CaptionStyle, Word};
use crate::{EngineError, EngineResult, Size2D, TimeMs};

// =============================================================================
// Font Size Defaults
// =============================================================================

/// Default font size for portrait (mobile/vertical) framing
pub const FONT_SIZE_VERTICAL: u32 = 36;

/// Default font size for landscape framing
pub const FONT_SIZE_HORIZONTAL: u32 = 48;

// =============================================================================
// Transcription Wire Types
// =============================================================================

/// A transcribed word as delivered by the transcription service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionWord {
    pub word: String,
    /// Start time in milliseconds
    pub start: TimeMs,
    /// End time in milliseconds
    pub end: TimeMs,
}

/// A transcribed segment as delivered by the transcription service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionSegment {
    /// Start time in milliseconds
    pub start: TimeMs,
    /// End time in milliseconds
    pub end: TimeMs,
    /// Segment text
    pub text: String,
    /// Word-level timestamps, when the service provides them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<TranscriptionWord>>,
}

/// A full transcription result
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub segments: Vec<TranscriptionSegment>,
}

// =============================================================================
// Ingestion
// =============================================================================

/// Returns the default caption style for the given video frame dimensions
pub fn default_style_for(frame: Size2D) -> CaptionStyle {
    let font_size = if frame.is_vertical() {
        FONT_SIZE_VERTICAL
    } else {
        FONT_SIZE_HORIZONTAL
    };
    CaptionStyle {
        font_size,
        ..CaptionStyle::default()
    }
}

/// Converts a transcription result into a caption timeline
///
/// Segment `i` receives the ingestion id `segment-{i}`, times are copied
/// verbatim, words map 1:1 (empty when absent), and every segment gets the
/// frame-dependent default style. Malformed timing fails fast with a
/// validation error rather than producing a corrupt timeline.
pub fn ingest(
    result: &TranscriptionResult,
    frame: Size2D,
) -> EngineResult<Vec<CaptionSegment>> {
    let style = default_style_for(frame);

    let mut segments = Vec::with_capacity(result.segments.len());
    for (i, source) in result.segments.iter().enumerate() {
        validate_segment(i, source)?;

        let words = source
            .words
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|w| Word::new(&w.word, w.start, w.end))
            .collect();

        segments.push(CaptionSegment {
            id: format!("segment-{}", i),
            origin: None,
            start_ms: source.start,
            end_ms: source.end,
            text: source.text.clone(),
            words,
            style: style.clone(),
        });
    }

    Ok(segments)
}

fn validate_segment(index: usize, segment: &TranscriptionSegment) -> EngineResult<()> {
    if segment.start < 0 || segment.end < 0 {
        return Err(EngineError::ValidationError(format!(
            "Transcription segment {} has negative timestamps ({}~{} ms)",
            index, segment.start, segment.end
        )));
    }
    if segment.end < segment.start {
        return Err(EngineError::ValidationError(format!(
            "Transcription segment {} ends before it starts ({}~{} ms)",
            index, segment.start, segment.end
        )));
    }
    for (wi, word) in segment.words.as_deref().unwrap_or_default().iter().enumerate() {
        if word.end < word.start || word.start < 0 {
            return Err(EngineError::ValidationError(format!(
                "Word {} of transcription segment {} has invalid timing ({}~{} ms)",
                wi, index, word.start, word.end
            )));
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> TranscriptionResult {
        TranscriptionResult {
            segments: vec![
                TranscriptionSegment {
                    start: 0,
                    end: 1200,
                    text: "Hello world".to_string(),
                    words: Some(vec![
                        TranscriptionWord {
                            word: "Hello".to_string(),
                            start: 0,
                            end: 500,
                        },
                        TranscriptionWord {
                            word: "world".to_string(),
                            start: 500,
                            end: 1200,
                        },
                    ]),
                },
                TranscriptionSegment {
                    start: 1500,
                    end: 2400,
                    text: "No timings here".to_string(),
                    words: None,
                },
            ],
        }
    }

    #[test]
    fn test_ingest_assigns_sequential_ids() {
        let timeline = ingest(&sample_result(), Size2D::default()).unwrap();
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].id, "segment-0");
        assert_eq!(timeline[1].id, "segment-1");
        assert!(timeline.iter().all(|s| s.origin.is_none()));
    }

    #[test]
    fn test_ingest_maps_words() {
        let timeline = ingest(&sample_result(), Size2D::default()).unwrap();
        assert_eq!(timeline[0].words.len(), 2);
        assert_eq!(timeline[0].words[0].text, "Hello");
        assert_eq!(timeline[0].words[1].start_ms, 500);
        assert!(timeline[1].words.is_empty());
    }

    #[test]
    fn test_ingest_copies_times_verbatim() {
        let timeline = ingest(&sample_result(), Size2D::default()).unwrap();
        assert_eq!(timeline[1].start_ms, 1500);
        assert_eq!(timeline[1].end_ms, 2400);
    }

    #[test]
    fn test_ingest_font_size_by_aspect() {
        let horizontal = ingest(&sample_result(), Size2D::new(1920, 1080)).unwrap();
        assert_eq!(horizontal[0].style.font_size, FONT_SIZE_HORIZONTAL);

        let vertical = ingest(&sample_result(), Size2D::new(1080, 1920)).unwrap();
        assert_eq!(vertical[0].style.font_size, FONT_SIZE_VERTICAL);

        // height/width exactly 1.5 stays horizontal
        let square_ish = ingest(&sample_result(), Size2D::new(1000, 1500)).unwrap();
        assert_eq!(square_ish[0].style.font_size, FONT_SIZE_HORIZONTAL);
    }

    #[test]
    fn test_ingest_rejects_inverted_segment_times() {
        let result = TranscriptionResult {
            segments: vec![TranscriptionSegment {
                start: 2000,
                end: 1000,
                text: "bad".to_string(),
                words: None,
            }],
        };
        let err = ingest(&result, Size2D::default()).unwrap_err();
        assert!(matches!(err, EngineError::ValidationError(_)));
    }

    #[test]
    fn test_ingest_rejects_bad_word_times() {
        let result = TranscriptionResult {
            segments: vec![TranscriptionSegment {
                start: 0,
                end: 1000,
                text: "bad".to_string(),
                words: Some(vec![TranscriptionWord {
                    word: "bad".to_string(),
                    start: 900,
                    end: 100,
                }]),
            }],
        };
        assert!(ingest(&result, Size2D::default()).is_err());
    }

    #[test]
    fn test_wire_format_field_names() {
        let json = r#"{
            "segments": [
                {"start": 0, "end": 900, "text": "hi there",
                 "words": [{"word": "hi", "start": 0, "end": 300},
                           {"word": "there", "start": 300, "end": 900}]}
            ]
        }"#;
        let result: TranscriptionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.segments[0].words.as_ref().unwrap()[0].word, "hi");
    }
}
