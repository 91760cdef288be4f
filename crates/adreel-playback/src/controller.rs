//! Playback controller: the state machine driving the composed timeline.
//!
//! Single-threaded and cooperative — commands and renderer callbacks enter
//! on the same thread, so no transition ever runs concurrently with another.
//! Reported global time is always derived as `cumulative_start + local`,
//! never independently accumulated, so global and per-clip time cannot
//! drift apart.

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};
use uuid::Uuid;

use adreel_core::format_timecode;

use adreel_timeline::{Clip, ClipSettingsPatch, ClipStore, TimelineIndex};

use crate::renderer::{MediaRenderer, RendererEvent};

/// Playback state machine phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// No clips, or positioned at time 0 and not playing.
    Idle,
    Playing,
    Paused,
    /// A seek has been commanded and the renderer has not confirmed it yet.
    /// `resume` records whether playback continues once it does.
    Seeking { resume: bool },
}

/// Snapshot of playback state for transport controls and the progress
/// indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub current_global_time: f64,
    pub total_duration: f64,
    pub current_clip_index: usize,
    pub selected_clip: Option<Uuid>,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} / {}",
            if self.is_playing { "▶" } else { "⏸" },
            format_timecode(self.current_global_time),
            format_timecode(self.total_duration)
        )
    }
}

/// Drives play/pause/seek/auto-advance across clip boundaries.
///
/// Owns the clip store, the derived timeline index (rebuilt on every
/// mutation), and the single active renderer handle. Every renderer command
/// that changes the active source or position increments the seek
/// generation; events carrying an older generation are discarded, so a rapid
/// sequence of seeks converges to the last requested position.
#[derive(Debug)]
pub struct PlaybackController<R: MediaRenderer> {
    store: ClipStore,
    index: TimelineIndex,
    renderer: R,
    phase: PlaybackPhase,
    current_clip: usize,
    local_time: f64,
    generation: u64,
    selected_clip: Option<Uuid>,
    /// Clip index the renderer currently has as its active source.
    loaded_clip: Option<usize>,
}

impl<R: MediaRenderer> PlaybackController<R> {
    /// Create a controller over the given store, owning the renderer handle.
    pub fn new(store: ClipStore, renderer: R) -> Self {
        let index = store.build_index();
        Self {
            store,
            index,
            renderer,
            phase: PlaybackPhase::Idle,
            current_clip: 0,
            local_time: 0.0,
            generation: 0,
            selected_clip: None,
            loaded_clip: None,
        }
    }

    // ── Read access ─────────────────────────────────────────────────

    /// The clip store (read-only; mutate through the controller so the
    /// derived index and playback position stay consistent).
    pub fn store(&self) -> &ClipStore {
        &self.store
    }

    /// The derived timeline index for the current store state.
    pub fn index(&self) -> &TimelineIndex {
        &self.index
    }

    /// The owned renderer handle.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Current state machine phase.
    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Current seek generation.
    pub fn seek_generation(&self) -> u64 {
        self.generation
    }

    /// Index of the clip under the playhead.
    pub fn current_clip_index(&self) -> usize {
        self.current_clip
    }

    /// Position within the current clip's effective span.
    pub fn current_local_time(&self) -> f64 {
        self.local_time
    }

    /// True while playing (including a seek that will resume playback).
    pub fn is_playing(&self) -> bool {
        matches!(
            self.phase,
            PlaybackPhase::Playing | PlaybackPhase::Seeking { resume: true }
        )
    }

    /// Global position on the composed timeline, derived from the current
    /// clip's cumulative start plus local time.
    pub fn current_global_time(&self) -> f64 {
        self.index.global_time(self.current_clip, self.local_time)
    }

    /// Clip selected in the edit panel (independent of playback position).
    pub fn selected_clip(&self) -> Option<Uuid> {
        self.selected_clip
    }

    /// Snapshot for the UI layer.
    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            is_playing: self.is_playing(),
            current_global_time: self.current_global_time(),
            total_duration: self.index.total_duration(),
            current_clip_index: self.current_clip,
            selected_clip: self.selected_clip,
        }
    }

    // ── Transport commands ──────────────────────────────────────────

    /// Start playback. At or past the end of the timeline, restarts from 0.
    pub fn play(&mut self) {
        if self.index.is_empty() {
            return;
        }
        match self.phase {
            PlaybackPhase::Playing => {}
            PlaybackPhase::Seeking { .. } => {
                self.phase = PlaybackPhase::Seeking { resume: true };
            }
            PlaybackPhase::Idle | PlaybackPhase::Paused => {
                if self.current_global_time() >= self.index.total_duration() {
                    self.current_clip = 0;
                    self.local_time = 0.0;
                    self.generation += 1;
                }
                self.ensure_source_loaded();
                let source = self.current_source_time();
                self.phase = PlaybackPhase::Playing;
                self.renderer.play(source, self.generation);
            }
        }
    }

    /// Pause playback; global time freezes at the last reported position.
    pub fn pause(&mut self) {
        match self.phase {
            PlaybackPhase::Seeking { .. } => {
                self.phase = PlaybackPhase::Seeking { resume: false };
            }
            PlaybackPhase::Playing => {
                self.phase = if self.current_global_time() == 0.0 {
                    PlaybackPhase::Idle
                } else {
                    PlaybackPhase::Paused
                };
                self.renderer.pause();
            }
            PlaybackPhase::Idle | PlaybackPhase::Paused => {}
        }
    }

    /// Seek to a global time, clamped into `[0, total]`.
    ///
    /// The playhead state updates synchronously; the controller stays in
    /// `Seeking` until the renderer confirms, then returns to the prior
    /// playing/paused state. A new seek supersedes any in-flight one via
    /// the generation fence.
    pub fn seek(&mut self, t: f64) {
        if self.index.is_empty() {
            return;
        }
        let resume = self.is_playing();
        let t = t.clamp(0.0, self.index.total_duration());
        let Some(pos) = self.index.locate(t) else {
            return;
        };

        self.generation += 1;
        self.current_clip = pos.clip_index;
        self.local_time = pos.local_time;
        self.ensure_source_loaded();

        let source = self.current_source_time();
        self.renderer.seek(source, self.generation);
        self.phase = PlaybackPhase::Seeking { resume };
    }

    /// Jump to the start of the next clip; no-op on the last clip.
    /// Preserves the playing/paused state.
    pub fn next_clip(&mut self) {
        if self.current_clip + 1 >= self.index.len() {
            return;
        }
        if let Some(start) = self.index.segment(self.current_clip + 1).map(|s| s.start) {
            self.seek(start);
        }
    }

    /// Jump to the start of the previous clip; no-op on the first clip.
    /// Preserves the playing/paused state.
    pub fn prev_clip(&mut self) {
        if self.current_clip == 0 {
            return;
        }
        if let Some(start) = self.index.segment(self.current_clip - 1).map(|s| s.start) {
            self.seek(start);
        }
    }

    /// Select a clip for the edit panel (does not move the playhead).
    pub fn select_clip(&mut self, id: Option<Uuid>) {
        match id {
            None => self.selected_clip = None,
            Some(id) if self.store.clip(id).is_some() => self.selected_clip = Some(id),
            Some(id) => debug!(clip_id = %id, "ignoring selection of unknown clip"),
        }
    }

    // ── Mutation commands ───────────────────────────────────────────

    /// Apply a partial edit-settings update (clamped by the store), rebuild
    /// the derived index, and re-validate the playback position.
    ///
    /// The playhead stays on the same clip when possible, with local time
    /// clamped into the clip's possibly shorter effective span.
    pub fn update_clip_settings(&mut self, id: Uuid, patch: ClipSettingsPatch) -> bool {
        let changed = self.store.update_clip_settings(id, patch);
        if changed {
            self.index = self.store.build_index();
            self.revalidate_position();
        }
        changed
    }

    /// Replace the clip list (a new clip became ready, or one was removed).
    ///
    /// The playhead follows the current clip to its new position when it
    /// survives; otherwise the old global time is clamped into the new
    /// timeline. Any in-flight renderer events are fenced off.
    pub fn set_clips(&mut self, clips: Vec<Clip>) {
        let anchor = self.index.segment(self.current_clip).map(|s| s.clip_id);
        let global_before = self.current_global_time();

        self.store.set_clips(clips);
        self.index = self.store.build_index();
        self.loaded_clip = None;
        self.generation += 1;

        if self.index.is_empty() {
            self.current_clip = 0;
            self.local_time = 0.0;
            self.phase = PlaybackPhase::Idle;
            return;
        }

        if let Some(idx) = anchor.and_then(|id| self.store.clip_index(id)) {
            self.current_clip = idx;
            if let Some(seg) = self.index.segment(idx) {
                self.local_time = self.local_time.min(seg.duration);
            }
        } else if let Some(pos) = self.index.locate(global_before) {
            self.current_clip = pos.clip_index;
            self.local_time = pos.local_time;
        }

        if self.is_playing() {
            self.ensure_source_loaded();
            let source = self.current_source_time();
            self.phase = PlaybackPhase::Playing;
            self.renderer.play(source, self.generation);
        }
    }

    // ── Renderer callbacks ──────────────────────────────────────────

    /// Feed a renderer event into the state machine. Events carrying an
    /// older seek generation are discarded — a late callback from a
    /// superseded command stream never overwrites newer state.
    pub fn handle_event(&mut self, event: RendererEvent) {
        if event.generation() != self.generation {
            trace!(
                ?event,
                current_generation = self.generation,
                "discarding stale renderer event"
            );
            return;
        }
        match event {
            RendererEvent::Position { source_time, .. } => self.on_position(source_time),
            RendererEvent::SeekCompleted { .. } => self.on_seek_completed(),
            RendererEvent::Ended { .. } => self.on_clip_finished(),
        }
    }

    fn on_position(&mut self, source_time: f64) {
        if self.phase != PlaybackPhase::Playing {
            return;
        }
        let Some(seg) = self.index.segment(self.current_clip).copied() else {
            return;
        };
        self.local_time = seg.local_from_source(source_time);

        // The trimmed-out tail ends the clip before the media naturally
        // finishes; the renderer's own Ended signal is not enough.
        if source_time >= seg.source_end {
            self.on_clip_finished();
        }
    }

    fn on_seek_completed(&mut self) {
        let PlaybackPhase::Seeking { resume } = self.phase else {
            return;
        };
        if resume {
            let source = self.current_source_time();
            self.phase = PlaybackPhase::Playing;
            self.renderer.play(source, self.generation);
        } else if self.current_global_time() == 0.0 {
            self.phase = PlaybackPhase::Idle;
        } else {
            self.phase = PlaybackPhase::Paused;
        }
    }

    fn on_clip_finished(&mut self) {
        if self.phase != PlaybackPhase::Playing {
            return;
        }
        if self.current_clip + 1 < self.index.len() {
            self.current_clip += 1;
            self.local_time = 0.0;
            self.generation += 1;
            self.ensure_source_loaded();
            let source = self.current_source_time();
            self.renderer.play(source, self.generation);
        } else {
            if let Some(seg) = self.index.segment(self.current_clip) {
                self.local_time = seg.duration;
            }
            self.phase = PlaybackPhase::Paused;
            self.renderer.pause();
        }
    }

    // ── Internals ───────────────────────────────────────────────────

    fn ensure_source_loaded(&mut self) {
        if self.loaded_clip == Some(self.current_clip) {
            return;
        }
        let Some(seg) = self.index.segment(self.current_clip) else {
            return;
        };
        if let Some(clip) = self.store.clip(seg.clip_id) {
            self.renderer.set_source(&clip.media_ref);
            self.loaded_clip = Some(self.current_clip);
        }
    }

    fn current_source_time(&self) -> f64 {
        self.index
            .source_time(self.current_clip, self.local_time)
            .unwrap_or(0.0)
    }

    fn revalidate_position(&mut self) {
        if self.index.is_empty() {
            self.current_clip = 0;
            self.local_time = 0.0;
            self.loaded_clip = None;
            self.phase = PlaybackPhase::Idle;
            return;
        }
        if self.current_clip >= self.index.len() {
            let last = self.index.len() - 1;
            self.current_clip = last;
            self.local_time = self.index.segment(last).map(|s| s.duration).unwrap_or(0.0);
        } else if let Some(seg) = self.index.segment(self.current_clip) {
            // stay on the same clip, clamped into its effective span
            self.local_time = self.local_time.min(seg.duration);
        }
    }
}
