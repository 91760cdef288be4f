//! AdReel Timeline - Composed timeline data model
//!
//! Implements the virtual preview timeline over generated clips:
//! - Clips and non-destructive per-clip edit settings (trim, speed)
//! - The clip store (single source of truth, validated mutation)
//! - The derived timeline index (cumulative offsets, time mapping)
//! - Shot manifest ingestion from the generation/storage layer

pub mod clip;
pub mod index;
pub mod manifest;
pub mod store;

pub use clip::{
    Clip, ClipEditSettings, ClipSettingsPatch, MIN_SOURCE_SPAN, SPEED_MAX, SPEED_MIN,
};
pub use index::{Segment, TimelineIndex, TimelinePosition};
pub use manifest::{ReadyVideo, ShotEntry, ShotManifest};
pub use store::ClipStore;
