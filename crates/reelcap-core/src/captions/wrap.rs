//! Line Wrap Engine
//!
//! Re-segments word-timed caption segments into shorter on-screen chunks
//! bounded by characters-per-line and words-per-line. Each source segment is
//! wrapped independently, so global timeline order is preserved, and every
//! output segment's time range is recomputed from the words it contains.

use serde::{Deserialize, Serialize};

use super::models::{CaptionSegment, Word};
use crate::{EngineError, EngineResult};

// =============================================================================
// Wrap Settings
// =============================================================================

/// Smallest usable character budget for a caption line
pub const MIN_CHARS_PER_LINE: usize = 12;

/// Line wrap constraints
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapSettings {
    pub max_chars_per_line: usize,
    pub max_words_per_line: usize,
}

impl WrapSettings {
    pub fn new(max_chars_per_line: usize, max_words_per_line: usize) -> Self {
        Self {
            max_chars_per_line,
            max_words_per_line,
        }
    }

    /// Rejects constraints below the usable minimum
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_chars_per_line < MIN_CHARS_PER_LINE {
            return Err(EngineError::ValidationError(format!(
                "maxCharsPerLine must be at least {}, got {}",
                MIN_CHARS_PER_LINE, self.max_chars_per_line
            )));
        }
        if self.max_words_per_line < 1 {
            return Err(EngineError::ValidationError(
                "maxWordsPerLine must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for WrapSettings {
    fn default() -> Self {
        Self {
            max_chars_per_line: 38,
            max_words_per_line: 7,
        }
    }
}

// =============================================================================
// Wrapping
// =============================================================================

/// Re-wraps a caption timeline under the given constraints
///
/// The union of words across all output segments for a given source segment
/// equals the source's words, in order, with no duplication or loss. A single
/// word longer than the character limit still becomes its own one-word
/// segment rather than being dropped or truncated.
pub fn rewrap(
    segments: &[CaptionSegment],
    settings: &WrapSettings,
) -> EngineResult<Vec<CaptionSegment>> {
    settings.validate()?;

    let mut output = Vec::with_capacity(segments.len());
    for segment in segments {
        wrap_segment(segment, settings, &mut output);
    }
    Ok(output)
}

fn wrap_segment(segment: &CaptionSegment, settings: &WrapSettings, output: &mut Vec<CaptionSegment>) {
    let words = if segment.words.is_empty() {
        synthesize_words(segment)
    } else {
        segment.words.clone()
    };

    // Nothing to wrap; keep the segment verbatim.
    if words.is_empty() {
        output.push(segment.clone());
        return;
    }

    let origin = segment.origin.clone().unwrap_or_else(|| segment.id.clone());

    let mut acc: Vec<Word> = Vec::new();
    let mut acc_text = String::new();
    let mut flush_counter = 0usize;

    let mut flush = |acc: &mut Vec<Word>, acc_text: &mut String, counter: &mut usize| {
        if acc.is_empty() {
            return;
        }
        output.push(CaptionSegment {
            id: format!("{}-{}", segment.id, counter),
            origin: Some(origin.clone()),
            start_ms: acc.first().map(|w| w.start_ms).unwrap_or(segment.start_ms),
            end_ms: acc.last().map(|w| w.end_ms).unwrap_or(segment.end_ms),
            text: std::mem::take(acc_text),
            words: std::mem::take(acc),
            style: segment.style.clone(),
        });
        *counter += 1;
    };

    for word in words {
        let word_len = word.text.chars().count();
        let candidate_len = if acc_text.is_empty() {
            word_len
        } else {
            acc_text.chars().count() + 1 + word_len
        };

        let fits = candidate_len <= settings.max_chars_per_line
            && acc.len() < settings.max_words_per_line;

        if !fits {
            flush(&mut acc, &mut acc_text, &mut flush_counter);
        }
        if !acc_text.is_empty() {
            acc_text.push(' ');
        }
        acc_text.push_str(&word.text);
        acc.push(word);
    }

    flush(&mut acc, &mut acc_text, &mut flush_counter);
}

/// Splits a word-less segment's text on spaces and divides its duration
/// evenly among the pieces, clamping the final word to the segment end.
fn synthesize_words(segment: &CaptionSegment) -> Vec<Word> {
    let pieces: Vec<&str> = segment.text.split_whitespace().collect();
    if pieces.is_empty() {
        return vec![];
    }

    let count = pieces.len() as i64;
    let duration = segment.duration();

    pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| {
            let i = i as i64;
            let start_ms = segment.start_ms + duration * i / count;
            let end_ms = if i == count - 1 {
                segment.end_ms
            } else {
                segment.start_ms + duration * (i + 1) / count
            };
            Word::new(piece, start_ms, end_ms)
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn timed_segment(id: &str, words: &[(&str, i64, i64)]) -> CaptionSegment {
        let words: Vec<Word> = words
            .iter()
            .map(|(t, s, e)| Word::new(t, *s, *e))
            .collect();
        let mut segment = CaptionSegment::new(
            id,
            words.first().map(|w| w.start_ms).unwrap_or(0),
            words.last().map(|w| w.end_ms).unwrap_or(0),
            "",
        );
        segment.words = words;
        segment.rebuild_text();
        segment
    }

    // -------------------------------------------------------------------------
    // Settings Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_settings_validation() {
        assert!(WrapSettings::new(12, 1).validate().is_ok());
        assert!(WrapSettings::new(11, 5).validate().is_err());
        assert!(WrapSettings::new(20, 0).validate().is_err());
    }

    #[test]
    fn test_rewrap_rejects_bad_settings() {
        let segments = vec![timed_segment("s", &[("hi", 0, 100)])];
        let result = rewrap(&segments, &WrapSettings::new(5, 3));
        assert!(matches!(result, Err(EngineError::ValidationError(_))));
    }

    // -------------------------------------------------------------------------
    // Wrapping Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_wrap_by_char_limit() {
        // "The quick" is 9 chars; adding "brown" would make 15 > 10, so flush.
        let segments = vec![timed_segment(
            "s1",
            &[
                ("The", 0, 100),
                ("quick", 100, 250),
                ("brown", 250, 400),
                ("fox", 400, 500),
            ],
        )];

        let wrapped = rewrap(&segments, &WrapSettings::new(12, 3)).unwrap();

        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[0].text, "The quick");
        assert_eq!(wrapped[0].start_ms, 0);
        assert_eq!(wrapped[0].end_ms, 250);
        assert_eq!(wrapped[1].text, "brown fox");
        assert_eq!(wrapped[1].start_ms, 250);
        assert_eq!(wrapped[1].end_ms, 500);
    }

    #[test]
    fn test_wrap_by_word_limit() {
        let segments = vec![timed_segment(
            "s1",
            &[("a", 0, 10), ("b", 10, 20), ("c", 20, 30), ("d", 30, 40)],
        )];

        let wrapped = rewrap(&segments, &WrapSettings::new(80, 3)).unwrap();

        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[0].text, "a b c");
        assert_eq!(wrapped[1].text, "d");
    }

    #[test]
    fn test_oversized_single_word_kept_alone() {
        let segments = vec![timed_segment(
            "s1",
            &[
                ("hi", 0, 100),
                ("incomprehensibilities", 100, 900),
                ("ok", 900, 1000),
            ],
        )];

        let wrapped = rewrap(&segments, &WrapSettings::new(12, 5)).unwrap();

        assert_eq!(wrapped.len(), 3);
        assert_eq!(wrapped[1].text, "incomprehensibilities");
        assert_eq!(wrapped[1].words.len(), 1);
    }

    #[test]
    fn test_wrap_ids_and_origin() {
        let segments = vec![timed_segment(
            "segment-4",
            &[("one", 0, 100), ("two", 100, 200), ("three", 200, 300)],
        )];

        let wrapped = rewrap(&segments, &WrapSettings::new(12, 2)).unwrap();

        assert_eq!(wrapped[0].id, "segment-4-0");
        assert_eq!(wrapped[1].id, "segment-4-1");
        assert!(wrapped
            .iter()
            .all(|s| s.origin.as_deref() == Some("segment-4")));
    }

    #[test]
    fn test_wrap_propagates_existing_origin() {
        let mut segment = timed_segment("segment-2-split-1", &[("a", 0, 100), ("b", 100, 200)]);
        segment.origin = Some("segment-2".to_string());

        let wrapped = rewrap(&[segment], &WrapSettings::new(12, 1)).unwrap();

        assert!(wrapped
            .iter()
            .all(|s| s.origin.as_deref() == Some("segment-2")));
    }

    #[test]
    fn test_wrap_preserves_word_sequence() {
        let source = timed_segment(
            "s",
            &[
                ("the", 0, 100),
                ("rain", 100, 300),
                ("in", 300, 350),
                ("spain", 350, 700),
                ("stays", 700, 900),
                ("mainly", 900, 1200),
                ("in", 1200, 1250),
                ("the", 1250, 1300),
                ("plain", 1300, 1700),
            ],
        );
        let original_words = source.words.clone();

        let wrapped = rewrap(&[source], &WrapSettings::new(14, 3)).unwrap();

        let collected: Vec<Word> = wrapped.iter().flat_map(|s| s.words.clone()).collect();
        assert_eq!(collected, original_words);

        for segment in &wrapped {
            assert!(
                segment.text.chars().count() <= 14 || segment.words.len() == 1,
                "segment '{}' exceeds limit",
                segment.text
            );
            assert_eq!(segment.start_ms, segment.words.first().unwrap().start_ms);
            assert_eq!(segment.end_ms, segment.words.last().unwrap().end_ms);
        }
    }

    #[test]
    fn test_wrap_style_inherited() {
        let mut segment = timed_segment("s", &[("a", 0, 100), ("b", 100, 200)]);
        segment.style.font_size = 72;

        let wrapped = rewrap(&[segment], &WrapSettings::new(12, 1)).unwrap();

        assert!(wrapped.iter().all(|s| s.style.font_size == 72));
    }

    // -------------------------------------------------------------------------
    // Pseudo-Word Synthesis Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_wrap_synthesizes_words_from_text() {
        let segment = CaptionSegment::new("srt-0", 1000, 4000, "alpha beta gamma");

        let wrapped = rewrap(&[segment], &WrapSettings::new(12, 2)).unwrap();

        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[0].text, "alpha beta");
        assert_eq!(wrapped[0].start_ms, 1000);
        assert_eq!(wrapped[0].end_ms, 3000);
        assert_eq!(wrapped[1].text, "gamma");
        // Final synthesized word is clamped to the segment end
        assert_eq!(wrapped[1].end_ms, 4000);
    }

    #[test]
    fn test_wrap_keeps_empty_segment_verbatim() {
        let segment = CaptionSegment::new("s", 0, 1000, "");

        let wrapped = rewrap(&[segment.clone()], &WrapSettings::default()).unwrap();

        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped[0], segment);
    }

    #[test]
    fn test_wrap_processes_segments_independently() {
        let first = timed_segment("a", &[("one", 0, 100), ("two", 100, 200)]);
        let second = timed_segment("b", &[("three", 500, 600)]);

        let wrapped = rewrap(&[first, second], &WrapSettings::new(12, 1)).unwrap();

        assert_eq!(
            wrapped.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            vec!["a-0", "a-1", "b-0"]
        );
    }
}
