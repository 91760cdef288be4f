//! Derived timeline index: pure computation over clips + edit settings.
//!
//! The index maps between global time on the composed timeline and
//! `(clip, local time)` pairs, and from local time to the source time to
//! command on the underlying media. It is recomputed whenever the clip list
//! or any edit setting changes; clip counts are small enough that no
//! incremental caching is needed.

use std::collections::HashMap;

use smallvec::SmallVec;
use uuid::Uuid;

use crate::clip::{Clip, ClipEditSettings};

/// One clip's span on the composed timeline, with the source mapping
/// parameters playback needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Index of the clip in timeline order
    pub clip_index: usize,
    /// Clip id
    pub clip_id: Uuid,
    /// Cumulative start on the global timeline
    pub start: f64,
    /// Effective duration (trimmed, speed-scaled)
    pub duration: f64,
    /// Source time of the first playable instant
    pub trim_start: f64,
    /// Playback rate applied to the trimmed span
    pub speed: f64,
    /// Source time at which the playable span ends (`base − trim_end`);
    /// the trim-aware end threshold for playback
    pub source_end: f64,
}

impl Segment {
    /// Global end time (exclusive).
    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Map local time within this segment to source time:
    /// `trim_start + local * speed`. Exact — recomputed, never integrated.
    #[inline]
    pub fn source_time(&self, local_time: f64) -> f64 {
        self.trim_start + local_time * self.speed
    }

    /// Inverse of [`Segment::source_time`], clamped into the playable span.
    #[inline]
    pub fn local_from_source(&self, source_time: f64) -> f64 {
        ((source_time - self.trim_start) / self.speed).clamp(0.0, self.duration)
    }
}

/// Position on the composed timeline: which clip, and where inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelinePosition {
    pub clip_index: usize,
    pub local_time: f64,
}

/// Ordered list of segments with cumulative offsets and total duration.
#[derive(Debug, Clone, Default)]
pub struct TimelineIndex {
    segments: SmallVec<[Segment; 8]>,
    total: f64,
}

impl TimelineIndex {
    /// Build the index from an ordered clip list and per-clip settings.
    ///
    /// Settings are re-clamped here so the derivation is valid for any
    /// input map, not just one produced by the store.
    pub fn build(clips: &[Clip], settings: &HashMap<Uuid, ClipEditSettings>) -> Self {
        let mut segments = SmallVec::new();
        let mut cursor = 0.0;

        for (clip_index, clip) in clips.iter().enumerate() {
            let s = settings
                .get(&clip.id)
                .copied()
                .unwrap_or_default()
                .clamped(clip.base_duration);

            let duration = s.effective_duration(clip.base_duration);
            segments.push(Segment {
                clip_index,
                clip_id: clip.id,
                start: cursor,
                duration,
                trim_start: s.trim_start,
                speed: s.speed,
                source_end: s.source_out(clip.base_duration),
            });
            cursor += duration;
        }

        Self {
            segments,
            total: cursor,
        }
    }

    /// Total duration of the composed timeline (0 when empty).
    #[inline]
    pub fn total_duration(&self) -> f64 {
        self.total
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when the timeline holds no clips.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All segments in timeline order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment at the given clip index.
    pub fn segment(&self, clip_index: usize) -> Option<&Segment> {
        self.segments.get(clip_index)
    }

    /// Resolve a global time to `(clip, local time)`.
    ///
    /// `t` is clamped into `[0, total]`. Intervals are half-open: a time
    /// exactly on a clip boundary resolves to the start of the next clip,
    /// never the tail of the previous one. `t >= total` resolves to the end
    /// position of the last clip. Returns `None` on an empty timeline.
    ///
    /// A monotonic scan is used; clip counts stay in the low tens, so a
    /// binary search over the prefix array would change nothing observable.
    pub fn locate(&self, t: f64) -> Option<TimelinePosition> {
        let last = self.segments.last()?;
        let t = t.clamp(0.0, self.total);

        for seg in &self.segments {
            if t < seg.end() {
                return Some(TimelinePosition {
                    clip_index: seg.clip_index,
                    local_time: t - seg.start,
                });
            }
        }

        Some(TimelinePosition {
            clip_index: last.clip_index,
            local_time: last.duration,
        })
    }

    /// Global time for a `(clip, local time)` pair — always derived as
    /// `cumulative_start + local`, never independently accumulated.
    pub fn global_time(&self, clip_index: usize, local_time: f64) -> f64 {
        self.segment(clip_index)
            .map(|seg| seg.start + local_time)
            .unwrap_or(0.0)
    }

    /// Source time to command on the underlying media for a
    /// `(clip, local time)` pair.
    pub fn source_time(&self, clip_index: usize, local_time: f64) -> Option<f64> {
        self.segment(clip_index)
            .map(|seg| seg.source_time(local_time))
    }
}
