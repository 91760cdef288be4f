//! Error types for the export subsystem.

use thiserror::Error;
use uuid::Uuid;

/// A fetch failure scoped to a single clip. Reported as data, not thrown,
/// so batch operations can say "N of M succeeded" and offer a retry of just
/// the failed clips.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("clip {clip_id} ({title}): {reason}")]
pub struct ClipFetchFailure {
    /// Clip that failed to fetch
    pub clip_id: Uuid,
    /// Display label, for the failure report
    pub title: String,
    /// Human-readable reason
    pub reason: String,
}

/// Errors from export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A single-clip download failed. Scoped to that clip; sibling
    /// operations are unaffected.
    #[error("failed to fetch clip: {0}")]
    ClipFetch(ClipFetchFailure),

    /// Every requested clip failed to fetch; no bundle was produced.
    #[error("export failed: all {} requested clips failed to fetch", failures.len())]
    ExportFailed { failures: Vec<ClipFetchFailure> },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for export operations.
pub type ExportResult<T> = std::result::Result<T, ExportError>;
