//! Timeline Store
//!
//! Owns the in-memory caption timeline and applies every editing command
//! against it: text replacement, word edits, splits, bulk styling, undo/redo,
//! playback-synchronized selection, and re-transcription merges.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       TimelineStore                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  mod.rs       - command surface, selection, change events       │
//! │  history.rs   - snapshot-based linear undo/redo                 │
//! │  deletion.rs  - ingestion-id keyed word-loss comparison         │
//! │  sync.rs      - playback-time to active-segment resolution      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutating command validates first (a failed command leaves the
//! timeline untouched), then mutates, then commits: the resulting state is
//! snapshotted into history, the modified flag is raised, and subscribers
//! are notified. All of this is synchronous and single-threaded; callers
//! must invoke commands sequentially.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::captions::{
    ingest, rewrap, sort_by_start, CaptionSegment, StylePatch, TranscriptionResult, Word,
    WrapSettings,
};
use crate::{EngineError, EngineResult, SegmentId, Size2D, TimeMs, TimeRange};

mod deletion;
mod history;
mod sync;

pub use deletion::has_word_deletions;
pub use history::{History, Snapshot};
pub use sync::active_segment;

/// Minimum highlight duration granted to an edited word
pub const MIN_EDITED_WORD_MS: TimeMs = 500;

// =============================================================================
// Store Events
// =============================================================================

/// Change notifications delivered to store subscribers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StoreEvent {
    /// A fresh timeline replaced the previous one
    TimelineLoaded,
    /// A single segment's text, words, or timing changed
    SegmentModified { segment_id: SegmentId },
    /// A segment was split in two
    SegmentSplit { first: SegmentId, second: SegmentId },
    /// A style patch was applied to every segment
    StyleApplied,
    /// The whole timeline was re-wrapped
    TimelineRewrapped,
    /// Captions overlapping a time range were replaced
    RangeReplaced { start_ms: TimeMs, end_ms: TimeMs },
    /// Undo or redo restored an earlier state
    HistoryRestored,
    /// The active segment changed
    SelectionChanged { segment_id: Option<SegmentId> },
}

type Subscriber = Box<dyn Fn(&StoreEvent)>;

// =============================================================================
// Timeline Store
// =============================================================================

/// Owns the caption timeline, its edit history, and the active selection
pub struct TimelineStore {
    /// Current caption timeline, ordered by start time
    captions: Vec<CaptionSegment>,
    /// Timeline as originally ingested; baseline for deletion detection
    ingested: Vec<CaptionSegment>,
    /// Active segment id, if any
    selected_segment_id: Option<SegmentId>,
    /// Undo/redo snapshots
    history: History,
    /// True once any edit has been applied since load
    modified: bool,
    /// Change listeners
    subscribers: Vec<Subscriber>,
}

impl std::fmt::Debug for TimelineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineStore")
            .field("captions", &self.captions.len())
            .field("selected_segment_id", &self.selected_segment_id)
            .field("history", &self.history.cursor())
            .field("modified", &self.modified)
            .finish()
    }
}

impl TimelineStore {
    pub fn new() -> Self {
        Self {
            captions: vec![],
            ingested: vec![],
            selected_segment_id: None,
            history: History::new(),
            modified: false,
            subscribers: vec![],
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Current caption timeline
    pub fn captions(&self) -> &[CaptionSegment] {
        &self.captions
    }

    /// Timeline as originally ingested (pre-edit baseline)
    pub fn baseline(&self) -> &[CaptionSegment] {
        &self.ingested
    }

    pub fn selected_segment_id(&self) -> Option<&SegmentId> {
        self.selected_segment_id.as_ref()
    }

    pub fn selected_segment(&self) -> Option<&CaptionSegment> {
        let id = self.selected_segment_id.as_ref()?;
        self.captions.iter().find(|s| &s.id == id)
    }

    /// Gets a segment by id
    pub fn get_segment(&self, segment_id: &str) -> Option<&CaptionSegment> {
        self.captions.iter().find(|s| s.id == segment_id)
    }

    /// True once any edit has been applied since the last load
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clears the modified flag (e.g. after the surrounding app saves)
    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Registers a change listener
    ///
    /// Subscribers are invoked synchronously after every committed command,
    /// in registration order.
    pub fn subscribe(&mut self, subscriber: impl Fn(&StoreEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Runs the deletion detector against the ingested baseline
    ///
    /// True means at least one originally-transcribed segment lost spoken
    /// words, so the export pipeline must cut the underlying media.
    pub fn has_word_deletions(&self) -> bool {
        deletion::has_word_deletions(&self.ingested, &self.captions)
    }

    /// Exports the current timeline to SRT
    pub fn export_srt(&self) -> String {
        crate::captions::export_srt(&self.captions)
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Ingests a transcription result, wraps it, and installs the resulting
    /// timeline as both the working copy and the deletion baseline
    pub fn load_transcription(
        &mut self,
        result: &TranscriptionResult,
        frame: Size2D,
        settings: &WrapSettings,
    ) -> EngineResult<()> {
        let ingested = ingest(result, frame)?;
        let wrapped = rewrap(&ingested, settings)?;
        self.install_timeline(wrapped)
    }

    /// Installs an already-built caption timeline (e.g. parsed from SRT)
    pub fn load_captions(&mut self, segments: Vec<CaptionSegment>) -> EngineResult<()> {
        self.install_timeline(segments)
    }

    fn install_timeline(&mut self, mut segments: Vec<CaptionSegment>) -> EngineResult<()> {
        let mut seen = HashSet::new();
        for segment in &segments {
            if segment.end_ms < segment.start_ms {
                return Err(EngineError::InvalidTimeRange(
                    segment.start_ms,
                    segment.end_ms,
                ));
            }
            if !seen.insert(segment.id.as_str()) {
                return Err(EngineError::ValidationError(format!(
                    "Duplicate segment id: {}",
                    segment.id
                )));
            }
        }

        sort_by_start(&mut segments);
        self.ingested = segments.clone();
        self.captions = segments;
        self.selected_segment_id = None;
        self.history.snapshot(&self.captions, None);
        self.modified = false;
        debug!("loaded timeline with {} segments", self.captions.len());
        self.emit(&StoreEvent::TimelineLoaded);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Editing Commands
    // -------------------------------------------------------------------------

    /// Replaces a segment's full text, re-estimating word timings
    ///
    /// Words at positions the original also had reuse the original timing;
    /// a changed word is granted at least [`MIN_EDITED_WORD_MS`] of highlight
    /// time. Extra words beyond the original count get the segment's duration
    /// divided evenly, the final one clamped to the segment end. Segments
    /// without word timings only swap their text.
    pub fn replace_text(&mut self, segment_id: &str, new_text: &str) -> EngineResult<()> {
        let index = self.index_of(segment_id)?;

        let segment = &mut self.captions[index];
        if segment.words.is_empty() {
            segment.text = new_text.to_string();
        } else {
            let pieces: Vec<&str> = new_text.split_whitespace().collect();
            let count = pieces.len() as i64;
            let duration = segment.duration();

            let mut words = Vec::with_capacity(pieces.len());
            for (i, piece) in pieces.iter().enumerate() {
                if let Some(original) = segment.words.get(i) {
                    let mut word = original.clone();
                    if word.text != *piece {
                        word.text = piece.to_string();
                        word.end_ms = word.end_ms.max(word.start_ms + MIN_EDITED_WORD_MS);
                    }
                    words.push(word);
                } else {
                    let slot = i as i64;
                    let start_ms = segment.start_ms + duration * slot / count;
                    let end_ms = if slot == count - 1 {
                        segment.end_ms
                    } else {
                        segment.start_ms + duration * (slot + 1) / count
                    };
                    words.push(Word::new(piece, start_ms, end_ms));
                }
            }
            segment.words = words;
            segment.text = new_text.to_string();
        }

        self.commit(StoreEvent::SegmentModified {
            segment_id: segment_id.to_string(),
        });
        Ok(())
    }

    /// Replaces one word's text in place
    ///
    /// A changed word keeps its start but is granted at least
    /// [`MIN_EDITED_WORD_MS`] of duration; the segment text is regenerated
    /// from the remaining non-blank words. Blank text deletes the word.
    pub fn edit_word(
        &mut self,
        segment_id: &str,
        word_index: usize,
        new_text: &str,
    ) -> EngineResult<()> {
        if new_text.trim().is_empty() {
            return self.delete_word(segment_id, word_index);
        }

        let index = self.index_of(segment_id)?;
        let segment = &mut self.captions[index];
        let word =
            segment
                .words
                .get_mut(word_index)
                .ok_or_else(|| EngineError::WordIndexOutOfBounds {
                    segment_id: segment_id.to_string(),
                    index: word_index,
                })?;

        if word.text != new_text {
            word.text = new_text.to_string();
            word.end_ms = word.end_ms.max(word.start_ms + MIN_EDITED_WORD_MS);
        }
        segment.rebuild_text();

        self.commit(StoreEvent::SegmentModified {
            segment_id: segment_id.to_string(),
        });
        Ok(())
    }

    /// Removes one word from a segment and regenerates its text
    pub fn delete_word(&mut self, segment_id: &str, word_index: usize) -> EngineResult<()> {
        let index = self.index_of(segment_id)?;
        let segment = &mut self.captions[index];

        if word_index >= segment.words.len() {
            return Err(EngineError::WordIndexOutOfBounds {
                segment_id: segment_id.to_string(),
                index: word_index,
            });
        }
        segment.words.remove(word_index);
        segment.rebuild_text();

        self.commit(StoreEvent::SegmentModified {
            segment_id: segment_id.to_string(),
        });
        Ok(())
    }

    /// Splits a segment at the given timestamp
    ///
    /// Words ending at or before the split point go to the first half, words
    /// starting at or after it to the second; a word straddling the point is
    /// dropped. Halves with words snap their inner boundary to the adjacent
    /// word edge; a word-less segment falls back to splitting its text at the
    /// word-count midpoint, with both halves meeting exactly at the split
    /// time. The first half becomes the new selection.
    pub fn split_segment(
        &mut self,
        segment_id: &str,
        at_ms: TimeMs,
    ) -> EngineResult<(SegmentId, SegmentId)> {
        let index = self.index_of(segment_id)?;
        let segment = &self.captions[index];

        if at_ms <= segment.start_ms || at_ms >= segment.end_ms {
            return Err(EngineError::InvalidSplitPoint(at_ms));
        }

        let origin = segment.origin.clone().unwrap_or_else(|| segment.id.clone());
        let first_id = format!("{}-split-1", segment.id);
        let second_id = format!("{}-split-2", segment.id);

        let mut first = CaptionSegment {
            id: first_id.clone(),
            origin: Some(origin.clone()),
            start_ms: segment.start_ms,
            end_ms: at_ms,
            text: String::new(),
            words: vec![],
            style: segment.style.clone(),
        };
        let mut second = CaptionSegment {
            id: second_id.clone(),
            origin: Some(origin),
            start_ms: at_ms,
            end_ms: segment.end_ms,
            text: String::new(),
            words: vec![],
            style: segment.style.clone(),
        };

        if segment.words.is_empty() {
            // Fallback: no word timings, split the text at its midpoint.
            let pieces: Vec<&str> = segment.text.split_whitespace().collect();
            let mid = pieces.len().div_ceil(2);
            first.text = pieces[..mid].join(" ");
            second.text = pieces[mid..].join(" ");
        } else {
            for word in &segment.words {
                if word.end_ms <= at_ms {
                    first.words.push(word.clone());
                } else if word.start_ms >= at_ms {
                    second.words.push(word.clone());
                } else {
                    warn!(
                        "word '{}' straddles split point {} ms, dropping",
                        word.text, at_ms
                    );
                }
            }
            first.rebuild_text();
            second.rebuild_text();
            // Segment bounds follow the words they contain.
            if let Some(last) = first.words.last() {
                first.end_ms = last.end_ms;
            }
            if let Some(head) = second.words.first() {
                second.start_ms = head.start_ms;
            }
        }

        self.captions.splice(index..=index, [first, second]);
        sort_by_start(&mut self.captions);
        self.selected_segment_id = Some(first_id.clone());

        self.commit(StoreEvent::SegmentSplit {
            first: first_id.clone(),
            second: second_id.clone(),
        });
        Ok((first_id, second_id))
    }

    /// Merges a partial style into every segment's style
    pub fn apply_style_to_all(&mut self, patch: &StylePatch) -> EngineResult<()> {
        for segment in &mut self.captions {
            segment.style.apply(patch);
        }
        self.commit(StoreEvent::StyleApplied);
        Ok(())
    }

    /// Re-wraps the whole timeline under new constraints
    pub fn rewrap(&mut self, settings: &WrapSettings) -> EngineResult<()> {
        let wrapped = rewrap(&self.captions, settings)?;
        self.captions = wrapped;
        self.drop_stale_selection();
        self.commit(StoreEvent::TimelineRewrapped);
        Ok(())
    }

    /// Replaces all captions overlapping the re-transcribed time range
    ///
    /// Replacement segments whose ids collide with surviving segments are
    /// re-keyed with a fresh unique id; the result is re-sorted by start time.
    pub fn merge_retranscription(
        &mut self,
        range: TimeRange,
        replacements: Vec<CaptionSegment>,
    ) -> EngineResult<()> {
        if range.end_ms < range.start_ms {
            return Err(EngineError::InvalidTimeRange(range.start_ms, range.end_ms));
        }
        for segment in &replacements {
            if segment.end_ms < segment.start_ms {
                return Err(EngineError::InvalidTimeRange(
                    segment.start_ms,
                    segment.end_ms,
                ));
            }
        }

        self.captions
            .retain(|s| !(s.start_ms < range.end_ms && s.end_ms > range.start_ms));

        let mut existing: HashSet<SegmentId> =
            self.captions.iter().map(|s| s.id.clone()).collect();
        for mut segment in replacements {
            if existing.contains(&segment.id) {
                let fresh = format!("retx-{}", ulid::Ulid::new().to_string().to_lowercase());
                warn!(
                    "re-transcribed segment id {} collides, re-keyed as {}",
                    segment.id, fresh
                );
                segment.id = fresh;
            }
            existing.insert(segment.id.clone());
            self.captions.push(segment);
        }

        sort_by_start(&mut self.captions);
        self.drop_stale_selection();

        self.commit(StoreEvent::RangeReplaced {
            start_ms: range.start_ms,
            end_ms: range.end_ms,
        });
        Ok(())
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// Restores the previous snapshot
    pub fn undo(&mut self) -> EngineResult<()> {
        let snapshot = self.history.undo().ok_or(EngineError::NothingToUndo)?.clone();
        self.restore(snapshot);
        Ok(())
    }

    /// Restores the next snapshot
    pub fn redo(&mut self) -> EngineResult<()> {
        let snapshot = self.history.redo().ok_or(EngineError::NothingToRedo)?.clone();
        self.restore(snapshot);
        Ok(())
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.captions = snapshot.captions;
        self.selected_segment_id = snapshot.selected_segment_id;
        self.modified = true;
        self.emit(&StoreEvent::HistoryRestored);
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Explicitly selects a segment (or clears the selection)
    pub fn select(&mut self, segment_id: Option<&str>) -> EngineResult<()> {
        if let Some(id) = segment_id {
            if self.get_segment(id).is_none() {
                return Err(EngineError::SegmentNotFound(id.to_string()));
            }
        }
        let next = segment_id.map(|s| s.to_string());
        if next != self.selected_segment_id {
            self.selected_segment_id = next;
            self.emit(&StoreEvent::SelectionChanged {
                segment_id: self.selected_segment_id.clone(),
            });
        }
        Ok(())
    }

    /// Moves the selection to the segment containing the playback position
    ///
    /// When no segment contains the position the previous selection is left
    /// alone; the selector only ever moves the selection, never clears it.
    pub fn sync_playhead(&mut self, position_ms: TimeMs) -> Option<&CaptionSegment> {
        let hit = active_segment(&self.captions, position_ms).map(|s| s.id.clone());
        if let Some(id) = hit {
            if self.selected_segment_id.as_ref() != Some(&id) {
                self.selected_segment_id = Some(id.clone());
                self.emit(&StoreEvent::SelectionChanged {
                    segment_id: Some(id),
                });
            }
        }
        self.selected_segment()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn index_of(&self, segment_id: &str) -> EngineResult<usize> {
        self.captions
            .iter()
            .position(|s| s.id == segment_id)
            .ok_or_else(|| EngineError::SegmentNotFound(segment_id.to_string()))
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = &self.selected_segment_id {
            if !self.captions.iter().any(|s| &s.id == id) {
                self.selected_segment_id = None;
            }
        }
    }

    /// Commits a completed mutation: snapshot, mark modified, notify
    fn commit(&mut self, event: StoreEvent) {
        self.history
            .snapshot(&self.captions, self.selected_segment_id.as_ref());
        self.modified = true;
        debug!("committed {:?}", event);
        self.emit(&event);
    }

    fn emit(&self, event: &StoreEvent) {
        for subscriber in &self.subscribers {
            subscriber(event);
        }
    }
}

impl Default for TimelineStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
