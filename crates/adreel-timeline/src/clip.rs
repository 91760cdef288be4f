//! Clip types for the composed timeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum span of source media (seconds) that trims must leave playable.
pub const MIN_SOURCE_SPAN: f64 = 0.1;

/// Minimum playback speed multiplier.
pub const SPEED_MIN: f64 = 0.5;

/// Maximum playback speed multiplier.
pub const SPEED_MAX: f64 = 2.0;

/// One generated video clip, corresponding to a single narrative shot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    /// Stable identifier (matches the shot it was generated for)
    pub id: Uuid,
    /// Display label
    pub title: String,
    /// Opaque handle/URL to the underlying video resource; owned by the
    /// storage collaborator, never mutated by the engine
    pub media_ref: String,
    /// Nominal duration in seconds reported at generation time (> 0);
    /// treated as authoritative
    pub base_duration: f64,
    /// Position in the authored sequence (dense, unique per timeline)
    pub order: u32,
}

impl Clip {
    /// Create a new clip for a ready shot asset.
    pub fn new(
        id: Uuid,
        title: impl Into<String>,
        media_ref: impl Into<String>,
        base_duration: f64,
        order: u32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            media_ref: media_ref.into(),
            base_duration,
            order,
        }
    }
}

/// Non-destructive edit settings for a clip (preview-only; never applied to
/// the exported media bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipEditSettings {
    /// Seconds excluded from the start of the source
    pub trim_start: f64,
    /// Seconds excluded from the end of the source
    pub trim_end: f64,
    /// Playback rate applied to the trimmed span
    pub speed: f64,
}

impl Default for ClipEditSettings {
    fn default() -> Self {
        Self {
            trim_start: 0.0,
            trim_end: 0.0,
            speed: 1.0,
        }
    }
}

impl ClipEditSettings {
    /// Clamp these settings into the valid range for a clip of the given
    /// base duration.
    ///
    /// Clamp order: speed into [`SPEED_MIN`, `SPEED_MAX`]; trims to >= 0;
    /// then, if the trims would leave less than [`MIN_SOURCE_SPAN`] of
    /// source, `trim_end` is reduced before `trim_start` until the invariant
    /// holds. Clamping is silent — the store always produces a valid state.
    pub fn clamped(&self, base_duration: f64) -> Self {
        let speed = self.speed.clamp(SPEED_MIN, SPEED_MAX);
        let mut trim_start = self.trim_start.max(0.0);
        let mut trim_end = self.trim_end.max(0.0);

        let max_total_trim = (base_duration - MIN_SOURCE_SPAN).max(0.0);
        if trim_start + trim_end > max_total_trim {
            trim_end = (max_total_trim - trim_start).max(0.0);
            if trim_start + trim_end > max_total_trim {
                trim_start = max_total_trim;
            }
        }

        Self {
            trim_start,
            trim_end,
            speed,
        }
    }

    /// The clip's contribution to the composed timeline:
    /// `(base − trim_start − trim_end) / speed`.
    ///
    /// Always > 0 for settings that satisfy the trim invariant.
    pub fn effective_duration(&self, base_duration: f64) -> f64 {
        (base_duration - self.trim_start - self.trim_end) / self.speed
    }

    /// Source time of the first playable instant.
    pub fn source_in(&self) -> f64 {
        self.trim_start
    }

    /// Source time at which the playable span ends (`base − trim_end`).
    pub fn source_out(&self, base_duration: f64) -> f64 {
        base_duration - self.trim_end
    }
}

/// Partial update for [`ClipEditSettings`]; unset fields keep their value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ClipSettingsPatch {
    pub trim_start: Option<f64>,
    pub trim_end: Option<f64>,
    pub speed: Option<f64>,
}

impl ClipSettingsPatch {
    /// Patch that sets the trim-in point.
    pub fn with_trim_start(mut self, seconds: f64) -> Self {
        self.trim_start = Some(seconds);
        self
    }

    /// Patch that sets the trim-out point.
    pub fn with_trim_end(mut self, seconds: f64) -> Self {
        self.trim_end = Some(seconds);
        self
    }

    /// Patch that sets the speed multiplier.
    pub fn with_speed(mut self, multiplier: f64) -> Self {
        self.speed = Some(multiplier);
        self
    }

    /// Merge this patch over existing settings (no clamping).
    pub fn apply_to(&self, settings: &ClipEditSettings) -> ClipEditSettings {
        ClipEditSettings {
            trim_start: self.trim_start.unwrap_or(settings.trim_start),
            trim_end: self.trim_end.unwrap_or(settings.trim_end),
            speed: self.speed.unwrap_or(settings.speed),
        }
    }
}
