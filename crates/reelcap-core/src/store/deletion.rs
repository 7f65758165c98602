//! Deletion Detector
//!
//! Compares the edited timeline against the originally-ingested one to
//! decide whether any segment lost spoken words. A positive result tells the
//! export pipeline the underlying media must be cut, not just re-captioned;
//! pure text corrections that keep word counts equal never trigger it.
//!
//! The comparison is keyed by ingestion id. Segments derived by wrap or
//! split carry their ingestion id in `origin`, so their words keep counting
//! toward the source segment and a pure re-segmentation is not mistaken for
//! a deletion.

use std::collections::HashMap;

use crate::captions::CaptionSegment;

/// Returns true if any originally-ingested segment's non-blank word count
/// strictly decreased in the current timeline
pub fn has_word_deletions(original: &[CaptionSegment], current: &[CaptionSegment]) -> bool {
    let current_counts = counts_by_origin(current);

    let mut original_counts = HashMap::new();
    for segment in original {
        *original_counts.entry(segment.origin_id()).or_insert(0usize) +=
            segment.spoken_word_count();
    }

    original_counts.iter().any(|(id, original_count)| {
        let current_count = current_counts.get(id).copied().unwrap_or(0);
        current_count < *original_count
    })
}

fn counts_by_origin(segments: &[CaptionSegment]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for segment in segments {
        *counts.entry(segment.origin_id()).or_insert(0usize) += segment.spoken_word_count();
    }
    counts
}

// =============================================================================
// Tests
// =============================================================================
