//! Reelcap Error Definitions
//!
//! Defines error types used throughout the engine.

use thiserror::Error;

use super::{SegmentId, TimeMs};

/// Engine error types
///
/// Failed operations must leave the caption timeline unchanged: commands
/// validate their inputs before touching any state.
#[derive(Error, Debug)]
pub enum EngineError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid time range: {0}~{1} ms")]
    InvalidTimeRange(TimeMs, TimeMs),

    // =========================================================================
    // Timeline Errors
    // =========================================================================
    #[error("Segment not found: {0}")]
    SegmentNotFound(SegmentId),

    #[error("Word index {index} out of bounds for segment {segment_id}")]
    WordIndexOutOfBounds {
        segment_id: SegmentId,
        index: usize,
    },

    #[error("Invalid split point: {0} ms")]
    InvalidSplitPoint(TimeMs),

    // =========================================================================
    // History Errors
    // =========================================================================
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Engine result type
pub type EngineResult<T> = Result<T, EngineError>;
