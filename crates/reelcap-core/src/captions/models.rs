//! Caption Data Models
//!
//! Defines data structures for word-timed caption segments.
//!
//! # Overview
//!
//! Captions in Reelcap support:
//! - Word-level timestamps for sub-segment highlighting during playback
//! - Per-segment styling
//! - Provenance tracking from ingestion ids through wrap/split derivations

use serde::{Deserialize, Serialize};

use crate::{SegmentId, TimeMs};

// =============================================================================
// Word
// =============================================================================

/// A single word with its spoken time range
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Word text
    pub text: String,
    /// Start time in milliseconds
    pub start_ms: TimeMs,
    /// End time in milliseconds
    pub end_ms: TimeMs,
}

impl Word {
    /// Creates a new word with the given text and timing
    pub fn new(text: &str, start_ms: TimeMs, end_ms: TimeMs) -> Self {
        Self {
            text: text.to_string(),
            start_ms,
            end_ms,
        }
    }

    /// Returns the duration of this word in milliseconds
    pub fn duration(&self) -> TimeMs {
        self.end_ms - self.start_ms
    }

    /// Returns true if the word carries no spoken text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// =============================================================================
// Caption Styling
// =============================================================================

/// Text case transform
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextTransform {
    /// Keep text as transcribed
    #[default]
    None,
    Uppercase,
    Lowercase,
}

/// Horizontal alignment of caption text
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignment {
    Left,
    /// Centered (default)
    #[default]
    Center,
    Right,
}

/// Vertical position of caption on screen
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerticalPosition {
    /// Bottom of screen (default for subtitles)
    #[default]
    Bottom,
    Top,
    Center,
}

/// How the caption is revealed during playback
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Whole segment shown for its full time range
    #[default]
    Static,
    /// Words highlighted as they are spoken
    Karaoke,
    /// Words appear one at a time
    WordByWord,
}

/// Caption segment style
///
/// A flat bag of presentation attributes. The engine copies and merges these
/// but never interprets them; color values are opaque hex strings handed
/// through to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionStyle {
    /// Font family name
    pub font_family: String,
    /// Font size in points
    pub font_size: u32,
    /// Text color (hex string, e.g. "#FFFFFF")
    pub color: String,
    /// Background/box color (None = transparent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Outline/stroke color (None = no outline)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<String>,
    /// Text case transform
    pub transform: TextTransform,
    /// Horizontal alignment
    pub alignment: TextAlignment,
    /// Vertical position on screen
    pub position: VerticalPosition,
    /// Reveal animation during playback
    pub render_mode: RenderMode,
    /// Uniform scale factor
    pub scale: f32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 48,
            color: "#FFFFFF".to_string(),
            background_color: None,
            outline_color: Some("#000000".to_string()),
            transform: TextTransform::None,
            alignment: TextAlignment::Center,
            position: VerticalPosition::Bottom,
            render_mode: RenderMode::Static,
            scale: 1.0,
        }
    }
}

impl CaptionStyle {
    /// Merges a partial style into this one, leaving unspecified fields untouched
    pub fn apply(&mut self, patch: &StylePatch) {
        if let Some(font_family) = &patch.font_family {
            self.font_family = font_family.clone();
        }
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(background_color) = &patch.background_color {
            self.background_color = background_color.clone();
        }
        if let Some(outline_color) = &patch.outline_color {
            self.outline_color = outline_color.clone();
        }
        if let Some(transform) = &patch.transform {
            self.transform = transform.clone();
        }
        if let Some(alignment) = &patch.alignment {
            self.alignment = alignment.clone();
        }
        if let Some(position) = &patch.position {
            self.position = position.clone();
        }
        if let Some(render_mode) = &patch.render_mode {
            self.render_mode = render_mode.clone();
        }
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
    }
}

/// Partial style record for bulk style application
///
/// Every field is optional; `None` means "leave the segment's value alone".
/// `background_color`/`outline_color` are double-optional so a patch can
/// explicitly clear them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<TextTransform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<TextAlignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<VerticalPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_mode: Option<RenderMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

// =============================================================================
// Caption Segment
// =============================================================================

/// A contiguous time-coded caption unit with display text and optional
/// word-level timing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionSegment {
    /// Unique identifier
    pub id: SegmentId,
    /// Ingestion id this segment descends from, when the id itself is a
    /// wrap/split derivation. `None` means `id` is the ingestion id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<SegmentId>,
    /// Start time in milliseconds
    pub start_ms: TimeMs,
    /// End time in milliseconds
    pub end_ms: TimeMs,
    /// Display text
    pub text: String,
    /// Word-level timing (empty when the source carried none)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<Word>,
    /// Presentation style
    pub style: CaptionStyle,
}

impl CaptionSegment {
    /// Creates a new segment with the given text and timing
    pub fn new(id: &str, start_ms: TimeMs, end_ms: TimeMs, text: &str) -> Self {
        Self {
            id: id.to_string(),
            origin: None,
            start_ms,
            end_ms,
            text: text.to_string(),
            words: vec![],
            style: CaptionStyle::default(),
        }
    }

    /// Returns the duration of this segment in milliseconds
    pub fn duration(&self) -> TimeMs {
        self.end_ms - self.start_ms
    }

    /// Returns true if the segment covers the given time (inclusive at both ends)
    pub fn contains(&self, time_ms: TimeMs) -> bool {
        time_ms >= self.start_ms && time_ms <= self.end_ms
    }

    /// The ingestion id this segment counts toward in deletion comparison
    pub fn origin_id(&self) -> &str {
        self.origin.as_deref().unwrap_or(&self.id)
    }

    /// Number of non-blank spoken words
    ///
    /// Segments without word timings fall back to whitespace-split text.
    pub fn spoken_word_count(&self) -> usize {
        if self.words.is_empty() {
            self.text.split_whitespace().count()
        } else {
            self.words.iter().filter(|w| !w.is_blank()).count()
        }
    }

    /// Regenerates `text` by joining the non-blank words with spaces
    pub fn rebuild_text(&mut self) {
        self.text = self
            .words
            .iter()
            .filter(|w| !w.is_blank())
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
    }
}

/// Sorts segments ascending by start time
pub fn sort_by_start(segments: &mut [CaptionSegment]) {
    segments.sort_by_key(|s| s.start_ms);
}

// =============================================================================
// Tests
// =============================================================================
