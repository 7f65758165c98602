//! Caption System Module
//!
//! Provides the caption data model and the pure transformations over it:
//! - Caption data models (Word, CaptionSegment, CaptionStyle)
//! - Transcript ingestion (transcription result → caption timeline)
//! - Line wrapping (re-segmentation under char/word constraints)
//! - SRT parsing and export
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use reelcap_core::captions::{ingest, rewrap, export_srt, WrapSettings};
//! use reelcap_core::Size2D;
//!
//! // Turn a transcription result into an on-screen caption timeline
//! let timeline = ingest(&transcription, Size2D::new(1920, 1080))?;
//! let timeline = rewrap(&timeline, &WrapSettings::default())?;
//!
//! // Export for interchange
//! let srt = export_srt(&timeline);
//! ```

mod formats;
mod models;
mod transcript;
mod wrap;

// Re-export models
pub use models::{
    sort_by_start, CaptionSegment, CaptionStyle, RenderMode, StylePatch, TextAlignment,
    TextTransform, VerticalPosition, Word,
};

// Re-export ingestion
pub use transcript::{
    default_style_for, ingest, TranscriptionResult, TranscriptionSegment, TranscriptionWord,
    FONT_SIZE_HORIZONTAL, FONT_SIZE_VERTICAL,
};

// Re-export wrapping
pub use wrap::{rewrap, WrapSettings, MIN_CHARS_PER_LINE};

// Re-export format functions
pub use formats::{export_srt, parse_srt, ParseError};
