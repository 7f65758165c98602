//! Time-Sync Selector
//!
//! Determines which caption segment should be active for a given playback
//! position. Runs continuously against playback time, independent of edit
//! history: it only ever moves the selection to a new containing segment,
//! never clears it.

use crate::captions::CaptionSegment;
use crate::TimeMs;

/// Returns the first segment whose time range contains `position_ms`
/// (inclusive at both ends)
pub fn active_segment(segments: &[CaptionSegment], position_ms: TimeMs) -> Option<&CaptionSegment> {
    segments.iter().find(|s| s.contains(position_ms))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline() -> Vec<CaptionSegment> {
        vec![
            CaptionSegment::new("segment-0", 0, 1000, "first"),
            CaptionSegment::new("segment-1", 1500, 2500, "second"),
        ]
    }

    #[test]
    fn test_finds_containing_segment() {
        let segments = timeline();
        assert_eq!(active_segment(&segments, 500).unwrap().id, "segment-0");
        assert_eq!(active_segment(&segments, 2000).unwrap().id, "segment-1");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let segments = timeline();
        assert_eq!(active_segment(&segments, 0).unwrap().id, "segment-0");
        assert_eq!(active_segment(&segments, 1000).unwrap().id, "segment-0");
        assert_eq!(active_segment(&segments, 1500).unwrap().id, "segment-1");
    }

    #[test]
    fn test_gap_has_no_active_segment() {
        let segments = timeline();
        assert!(active_segment(&segments, 1200).is_none());
        assert!(active_segment(&segments, 9000).is_none());
    }
}
