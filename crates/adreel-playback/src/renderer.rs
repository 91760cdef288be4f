//! Media renderer abstraction.
//!
//! The renderer is the external video surface (an HTML video element, a
//! native decoder view, a test double). The controller is its only owner:
//! no other component reads or writes renderer state.

/// Commands the controller issues to the active media renderer.
///
/// `play` and `seek` carry the controller's current seek generation; the
/// renderer adapter must echo the most recently received generation on every
/// event it reports, so the controller can discard callbacks that belong to
/// a superseded command stream.
pub trait MediaRenderer {
    /// Switch the active media source. Playback position is undefined until
    /// the next `play` or `seek` command.
    fn set_source(&mut self, media_ref: &str);

    /// Begin playback from the given source time.
    fn play(&mut self, source_time: f64, generation: u64);

    /// Pause playback, holding the current position.
    fn pause(&mut self);

    /// Seek to the given source time. The renderer reports
    /// [`RendererEvent::SeekCompleted`] once the position is established.
    fn seek(&mut self, source_time: f64, generation: u64);
}

/// Asynchronous callbacks from the renderer, delivered on the controller's
/// thread. Each carries the generation of the command stream it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RendererEvent {
    /// Periodic position report during playback, in source time.
    Position { generation: u64, source_time: f64 },
    /// A previously commanded seek has been established.
    SeekCompleted { generation: u64 },
    /// The underlying media reached its natural end.
    Ended { generation: u64 },
}

impl RendererEvent {
    /// Generation of the command stream this event belongs to.
    pub fn generation(&self) -> u64 {
        match self {
            Self::Position { generation, .. }
            | Self::SeekCompleted { generation }
            | Self::Ended { generation } => *generation,
        }
    }
}
