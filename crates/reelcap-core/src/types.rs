//! Reelcap Core Type Definitions
//!
//! Defines fundamental types used throughout the engine.

use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// ID Types
// =============================================================================

/// Caption segment unique identifier
///
/// Ingested segments receive `segment-{i}`; wrap and split derive
/// `{sourceId}-{n}` and `{sourceId}-split-{1,2}` from their source.
pub type SegmentId = String;

// =============================================================================
// Time Types
// =============================================================================

/// Time in integer milliseconds
pub type TimeMs = i64;

/// Time range in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_ms: TimeMs,
    pub end_ms: TimeMs,
}

impl TimeRange {
    pub fn new(start_ms: TimeMs, end_ms: TimeMs) -> Self {
        if start_ms > end_ms {
            warn!(
                "TimeRange created with start > end ({} > {}), swapping",
                start_ms, end_ms
            );
            return Self {
                start_ms: end_ms,
                end_ms: start_ms,
            };
        }
        Self { start_ms, end_ms }
    }

    /// Returns duration in milliseconds
    pub fn duration(&self) -> TimeMs {
        self.end_ms - self.start_ms
    }

    /// Checks if a given time is within range (inclusive at both ends)
    pub fn contains(&self, time: TimeMs) -> bool {
        time >= self.start_ms && time <= self.end_ms
    }

    /// Checks if two ranges overlap
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start_ms < other.end_ms && self.end_ms > other.start_ms
    }
}

// =============================================================================
// Spatial Types
// =============================================================================

/// Video frame dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: u32,
    pub height: u32,
}

impl Size2D {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Aspect ratio as height/width
    pub fn aspect(&self) -> f64 {
        if self.width == 0 {
            warn!("Size2D has zero width, treating aspect as 0");
            return 0.0;
        }
        self.height as f64 / self.width as f64
    }

    /// Returns true for portrait (mobile/vertical) framing
    pub fn is_vertical(&self) -> bool {
        self.aspect() > 1.5
    }
}

impl Default for Size2D {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_contains_is_inclusive() {
        let range = TimeRange::new(100, 500);
        assert!(range.contains(100));
        assert!(range.contains(300));
        assert!(range.contains(500));
        assert!(!range.contains(99));
        assert!(!range.contains(501));
    }

    #[test]
    fn test_time_range_swaps_inverted_bounds() {
        let range = TimeRange::new(500, 100);
        assert_eq!(range.start_ms, 100);
        assert_eq!(range.end_ms, 500);
    }

    #[test]
    fn test_time_range_overlaps() {
        let a = TimeRange::new(0, 1000);
        let b = TimeRange::new(900, 2000);
        let c = TimeRange::new(1000, 2000);
        assert!(a.overlaps(&b));
        // Touching edges do not overlap
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_size_vertical_classification() {
        assert!(Size2D::new(1080, 1920).is_vertical());
        assert!(!Size2D::new(1920, 1080).is_vertical());
        // Exactly 1.5 is not vertical
        assert!(!Size2D::new(1000, 1500).is_vertical());
    }

    #[test]
    fn test_size_zero_width() {
        assert!(!Size2D::new(0, 1080).is_vertical());
    }
}
