//! Edit History
//!
//! Linear undo/redo over full-timeline snapshots. The history holds an
//! ordered sequence of snapshots plus a cursor; committing a new snapshot
//! truncates any previously-undone future, so there is no branching.
//!
//! Invariant: after every committed operation the cursor points at the
//! snapshot equal to the live timeline. Undo and redo only move the cursor
//! and hand back the snapshot it lands on; they never mutate the sequence.

use serde::{Deserialize, Serialize};

use crate::captions::CaptionSegment;
use crate::SegmentId;

// =============================================================================
// Snapshot
// =============================================================================

/// An immutable point-in-time copy of the caption timeline plus selection
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub captions: Vec<CaptionSegment>,
    pub selected_segment_id: Option<SegmentId>,
}

impl Snapshot {
    /// The empty-timeline snapshot history starts from
    pub fn empty() -> Self {
        Self::default()
    }
}

// =============================================================================
// History
// =============================================================================

/// Undo/redo stack of timeline snapshots
#[derive(Clone, Debug)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self {
            snapshots: vec![Snapshot::empty()],
            cursor: 0,
        }
    }

    /// Commits a snapshot of the given state
    ///
    /// Discards any previously-undone future history, appends, and advances
    /// the cursor to the new end.
    pub fn snapshot(&mut self, captions: &[CaptionSegment], selected: Option<&SegmentId>) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(Snapshot {
            captions: captions.to_vec(),
            selected_segment_id: selected.cloned(),
        });
        self.cursor = self.snapshots.len() - 1;
    }

    /// Steps back one snapshot, returning the state to restore
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Steps forward one snapshot, returning the state to restore
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of stored snapshots (the initial empty one included)
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(id: &str, start_ms: i64) -> CaptionSegment {
        CaptionSegment::new(id, start_ms, start_ms + 1000, id)
    }

    #[test]
    fn test_initial_state() {
        let history = History::new();
        assert_eq!(history.snapshot_count(), 1);
        assert_eq!(history.cursor(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = History::new();

        // snapshot A (load) then snapshot B (edit)
        let a = vec![segment("segment-0", 0)];
        history.snapshot(&a, None);
        let b = vec![segment("segment-0", 0), segment("segment-1", 2000)];
        let selected = "segment-1".to_string();
        history.snapshot(&b, Some(&selected));

        let restored = history.undo().unwrap();
        assert_eq!(restored.captions, a);
        assert_eq!(restored.selected_segment_id, None);

        let restored = history.redo().unwrap();
        assert_eq!(restored.captions, b);
        assert_eq!(restored.selected_segment_id, Some(selected));
    }

    #[test]
    fn test_undo_to_initial_empty_snapshot() {
        let mut history = History::new();
        history.snapshot(&[segment("segment-0", 0)], None);

        let restored = history.undo().unwrap();
        assert!(restored.captions.is_empty());
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_redo_without_undo() {
        let mut history = History::new();
        history.snapshot(&[segment("segment-0", 0)], None);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_snapshot_truncates_future() {
        let mut history = History::new();
        history.snapshot(&[segment("a", 0)], None);
        history.snapshot(&[segment("b", 0)], None);
        history.undo();

        // Committing from a rewound cursor discards the undone branch.
        history.snapshot(&[segment("c", 0)], None);

        assert_eq!(history.snapshot_count(), 3);
        assert!(!history.can_redo());
        let restored = history.undo().unwrap();
        assert_eq!(restored.captions[0].id, "a");
    }

    #[test]
    fn test_snapshots_are_deep_copies() {
        let mut history = History::new();
        let mut live = vec![segment("segment-0", 0)];
        history.snapshot(&live, None);

        // Mutating the live timeline must not change the stored snapshot.
        live[0].text = "changed".to_string();

        history.undo();
        let restored = history.redo().unwrap();
        assert_eq!(restored.captions[0].text, "segment-0");
    }
}
