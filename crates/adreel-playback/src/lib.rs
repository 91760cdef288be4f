//! AdReel Playback - Playback controller state machine
//!
//! Drives play/pause/seek and trim-aware auto-advance across clip boundaries
//! over the derived timeline. The controller exclusively owns the single
//! active media renderer handle; renderer callbacks are serialized onto the
//! caller's thread and fenced by a seek generation, so a late callback from a
//! superseded seek can never overwrite a newer position.

pub mod controller;
pub mod renderer;

pub use controller::{PlaybackController, PlaybackPhase, PlaybackStatus};
pub use renderer::{MediaRenderer, RendererEvent};
