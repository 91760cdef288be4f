//! Shot manifest ingestion with versioning.
//!
//! The generation/storage layer supplies the authored shot list as versioned
//! JSON, refreshed out-of-band. The engine treats it as read-only input and
//! keeps only shots that carry a ready video asset.

use adreel_core::{EngineError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::clip::Clip;

/// Current manifest schema version.
pub const MANIFEST_VERSION: u32 = 1;

/// A ready generated video asset for a shot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyVideo {
    /// Opaque handle/URL owned by the storage collaborator
    pub url: String,
    /// Duration in seconds reported at generation time
    pub duration_seconds: f64,
}

/// One authored narrative shot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotEntry {
    /// Stable shot id; becomes the clip id
    pub shot_id: Uuid,
    /// Display label
    pub title: String,
    /// Position in the authored sequence
    pub order: u32,
    /// At most one ready generated video per shot
    #[serde(default)]
    pub video: Option<ReadyVideo>,
}

/// Versioned shot list from the generation/storage layer.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShotManifest {
    /// Schema version
    pub version: u32,
    /// Authored shots in any order; `order` fields decide the sequence
    pub shots: Vec<ShotEntry>,
}

impl ShotManifest {
    /// Parse a manifest from JSON bytes, rejecting newer schema versions.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let manifest: Self = serde_json::from_slice(data)
            .map_err(|e| EngineError::Serialization(format!("Invalid shot manifest: {e}")))?;

        if manifest.version > MANIFEST_VERSION {
            return Err(EngineError::Serialization(format!(
                "Shot manifest version {} is newer than supported version {}",
                manifest.version, MANIFEST_VERSION
            )));
        }

        Ok(manifest)
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| EngineError::Serialization(format!("Failed to serialize manifest: {e}")))
    }

    /// Clips for every shot with a usable ready video, in authored order.
    ///
    /// Shots without a video, or with a nonpositive reported duration, are
    /// skipped — they have nothing the timeline can play.
    pub fn into_clips(self) -> Vec<Clip> {
        let mut clips: Vec<Clip> = self
            .shots
            .into_iter()
            .filter_map(|shot| {
                let video = shot.video?;
                if video.duration_seconds <= 0.0 {
                    warn!(
                        shot_id = %shot.shot_id,
                        duration = video.duration_seconds,
                        "skipping ready video with nonpositive reported duration"
                    );
                    return None;
                }
                Some(Clip::new(
                    shot.shot_id,
                    shot.title,
                    video.url,
                    video.duration_seconds,
                    shot.order,
                ))
            })
            .collect();

        clips.sort_by_key(|clip| clip.order);
        clips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, order: u32, video: Option<ReadyVideo>) -> ShotEntry {
        ShotEntry {
            shot_id: Uuid::new_v4(),
            title: title.to_string(),
            order,
            video,
        }
    }

    fn ready(url: &str, duration: f64) -> Option<ReadyVideo> {
        Some(ReadyVideo {
            url: url.to_string(),
            duration_seconds: duration,
        })
    }

    #[test]
    fn test_into_clips_keeps_only_ready_shots() {
        let manifest = ShotManifest {
            version: MANIFEST_VERSION,
            shots: vec![
                entry("opening", 0, ready("https://cdn.test/opening.mp4", 6.0)),
                entry("pending", 1, None),
                entry("closing", 2, ready("https://cdn.test/closing.mp4", 5.0)),
            ],
        };

        let clips = manifest.into_clips();
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[0].title, "opening");
        assert_eq!(clips[1].title, "closing");
    }

    #[test]
    fn test_into_clips_sorted_by_order() {
        let manifest = ShotManifest {
            version: MANIFEST_VERSION,
            shots: vec![
                entry("last", 5, ready("https://cdn.test/last.mp4", 4.0)),
                entry("first", 1, ready("https://cdn.test/first.mp4", 6.0)),
            ],
        };

        let clips = manifest.into_clips();
        assert_eq!(clips[0].title, "first");
        assert_eq!(clips[1].title, "last");
    }

    #[test]
    fn test_into_clips_skips_nonpositive_duration() {
        let manifest = ShotManifest {
            version: MANIFEST_VERSION,
            shots: vec![entry("broken", 0, ready("https://cdn.test/broken.mp4", 0.0))],
        };
        assert!(manifest.into_clips().is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let manifest = ShotManifest {
            version: MANIFEST_VERSION,
            shots: vec![entry("opening", 0, ready("https://cdn.test/opening.mp4", 6.0))],
        };

        let bytes = manifest.to_json().unwrap();
        let parsed = ShotManifest::from_json(&bytes).unwrap();
        assert_eq!(parsed.shots.len(), 1);
        assert_eq!(parsed.shots[0].title, "opening");
    }

    #[test]
    fn test_newer_version_rejected() {
        let manifest = ShotManifest {
            version: MANIFEST_VERSION + 1,
            shots: vec![],
        };
        let bytes = manifest.to_json().unwrap();
        assert!(ShotManifest::from_json(&bytes).is_err());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(ShotManifest::from_json(b"not json").is_err());
    }
}
