//! Clip edit store: single source of truth for clip order and per-clip
//! edit settings.
//!
//! All mutation goes through the store so every observer sees a valid state;
//! out-of-range edits are clamped silently rather than rejected. A revision
//! counter lets holders of a derived [`TimelineIndex`] know when to rebuild.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::clip::{Clip, ClipEditSettings, ClipSettingsPatch};
use crate::index::TimelineIndex;

/// Ordered clip list plus per-clip edit settings.
///
/// Settings entries are created lazily on first edit; a clip without an
/// entry plays with the defaults (no trim, 1.0x speed). The engine never
/// creates, deletes, or reorders clips itself — the list is replaced
/// wholesale when the external layer reports a change.
#[derive(Debug, Clone, Default)]
pub struct ClipStore {
    clips: Vec<Clip>,
    settings: HashMap<Uuid, ClipEditSettings>,
    revision: u64,
}

impl ClipStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store over the given clips, sorted into authored order.
    pub fn from_clips(mut clips: Vec<Clip>) -> Self {
        clips.sort_by_key(|clip| clip.order);
        Self {
            clips,
            settings: HashMap::new(),
            revision: 0,
        }
    }

    /// Clips in timeline order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Number of clips.
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// True when the store holds no clips.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Find a clip by id.
    pub fn clip(&self, id: Uuid) -> Option<&Clip> {
        self.clips.iter().find(|clip| clip.id == id)
    }

    /// Timeline index of a clip id.
    pub fn clip_index(&self, id: Uuid) -> Option<usize> {
        self.clips.iter().position(|clip| clip.id == id)
    }

    /// Edit settings for a clip (defaults when never edited).
    pub fn settings(&self, id: Uuid) -> ClipEditSettings {
        self.settings.get(&id).copied().unwrap_or_default()
    }

    /// Raw settings map, keyed by clip id.
    pub fn settings_map(&self) -> &HashMap<Uuid, ClipEditSettings> {
        &self.settings
    }

    /// Effective duration of a clip under its current settings.
    pub fn effective_duration(&self, id: Uuid) -> Option<f64> {
        let clip = self.clip(id)?;
        Some(self.settings(id).effective_duration(clip.base_duration))
    }

    /// Monotonic revision counter; bumped on every mutation. Holders of a
    /// derived index rebuild when this moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Merge a partial settings update into a clip's settings, clamping the
    /// result into the valid range (speed first, then trims; `trim_end`
    /// gives way before `trim_start`).
    ///
    /// A missing clip id is a no-op. Returns true when the stored settings
    /// actually changed.
    pub fn update_clip_settings(&mut self, id: Uuid, patch: ClipSettingsPatch) -> bool {
        let Some(clip) = self.clip(id) else {
            debug!(clip_id = %id, "ignoring settings update for unknown clip");
            return false;
        };
        let base_duration = clip.base_duration;

        let current = self.settings(id);
        let requested = patch.apply_to(&current);
        let clamped = requested.clamped(base_duration);

        if clamped != requested {
            debug!(
                clip_id = %id,
                requested = ?requested,
                stored = ?clamped,
                "clamped edit settings into valid range"
            );
        }

        if clamped == current {
            return false;
        }

        self.settings.insert(id, clamped);
        self.revision += 1;
        true
    }

    /// Replace the clip list (a new clip became ready, or one was removed).
    ///
    /// Settings for clips that no longer exist are dropped; survivors keep
    /// theirs. Order is authoritative from the caller.
    pub fn set_clips(&mut self, mut clips: Vec<Clip>) {
        clips.sort_by_key(|clip| clip.order);
        self.settings
            .retain(|id, _| clips.iter().any(|clip| clip.id == *id));
        self.clips = clips;
        self.revision += 1;
    }

    /// Build the derived timeline index for the current state.
    pub fn build_index(&self) -> TimelineIndex {
        TimelineIndex::build(&self.clips, &self.settings)
    }
}
