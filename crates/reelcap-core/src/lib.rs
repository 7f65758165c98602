//! Reelcap Core Engine
//!
//! Caption timeline editing engine: owns the in-memory caption data, keeps
//! word-level timing consistent as segments are split, edited, re-wrapped, or
//! deleted, supports snapshot-based undo/redo, tracks destructive edits for
//! downstream media cutting, and keeps the active segment synchronized with
//! playback.
//!
//! The engine is a pure data/algorithm layer: no decoding, no rendering, no
//! I/O. Video playback, transcription, and export pipelines are external
//! collaborators that hand timelines in and take timelines out.

pub mod captions;
pub mod store;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;
