//! Export coordination: single-clip download and bundled archive export.
//!
//! Exported bytes are the raw, untrimmed, unsped-up source media — trim and
//! speed edits shape in-app preview playback only. Callers presenting an
//! export UI should state this next to the download action.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use adreel_timeline::Clip;

use crate::error::{ClipFetchFailure, ExportError, ExportResult};
use crate::fetch::MediaFetch;

/// Default cap on simultaneous media fetches during a bundle export.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// A fetched clip ready to be saved locally.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedClip {
    /// Deterministic filename derived from clip order and title
    pub filename: String,
    /// Raw media bytes
    pub bytes: Vec<u8>,
}

impl DownloadedClip {
    /// Save into a directory, creating it if needed. Returns the file path.
    pub async fn write_to(&self, dir: &Path) -> ExportResult<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.filename);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

/// Result of a bundle export: the archive plus any per-clip failures.
///
/// Partial success is not an error for the bundle itself; the failures are
/// reported alongside so the caller can offer a retry of just those clips.
#[derive(Debug)]
pub struct BundleOutput {
    /// Zip archive bytes. Entries use the Stored method — the payloads are
    /// already-compressed video.
    pub archive: Vec<u8>,
    /// Archive entry names, in clip order
    pub entries: Vec<String>,
    /// Clips that could not be fetched
    pub failures: Vec<ClipFetchFailure>,
}

impl BundleOutput {
    /// True when some requested clips are missing from the archive.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Write the archive to a file path.
    pub async fn write_to(&self, path: &Path) -> ExportResult<()> {
        tokio::fs::write(path, &self.archive).await?;
        Ok(())
    }
}

/// Fetches raw clip media and produces downloadable output.
///
/// Bundle fetches run with bounded concurrency and `allSettled` semantics:
/// one clip's failure never cancels the others, and there is no explicit
/// cancellation — in-flight fetches run to completion or failure and are
/// aggregated afterwards.
pub struct ExportCoordinator<F> {
    fetcher: F,
    max_concurrent_fetches: usize,
}

impl<F: MediaFetch> ExportCoordinator<F> {
    /// Coordinator over the given fetch capability.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }

    /// Override the concurrent-fetch cap (minimum 1).
    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = limit.max(1);
        self
    }

    /// Fetch a single clip's bytes for a local save.
    ///
    /// On failure, returns [`ExportError::ClipFetch`] scoped to this clip;
    /// nothing else is affected.
    pub async fn download_clip(&self, clip: &Clip) -> ExportResult<DownloadedClip> {
        debug!(clip_id = %clip.id, media_ref = %clip.media_ref, "downloading clip");
        match self.fetcher.fetch(&clip.media_ref).await {
            Ok(bytes) => Ok(DownloadedClip {
                filename: clip_filename(clip),
                bytes,
            }),
            Err(err) => {
                warn!(clip_id = %clip.id, error = %err, "clip fetch failed");
                Err(ExportError::ClipFetch(failure(clip, err.to_string())))
            }
        }
    }

    /// Fetch the requested clips and assemble a zip bundle.
    ///
    /// Successes and failures are collected independently. If zero clips
    /// succeed the whole operation fails with [`ExportError::ExportFailed`];
    /// otherwise the bundle is produced and the failures are reported
    /// alongside it.
    pub async fn export_bundle(&self, clips: &[Clip]) -> ExportResult<BundleOutput> {
        info!(requested = clips.len(), "starting bundle export");
        let semaphore = Semaphore::new(self.max_concurrent_fetches);

        let fetches = clips.iter().map(|clip| {
            let semaphore = &semaphore;
            async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|_| failure(clip, "fetch slot unavailable"))?;
                self.fetcher
                    .fetch(&clip.media_ref)
                    .await
                    .map(|bytes| (clip, bytes))
                    .map_err(|err| failure(clip, err.to_string()))
            }
        });
        let results = join_all(fetches).await;

        let mut fetched = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(ok) => fetched.push(ok),
                Err(fail) => {
                    warn!(clip_id = %fail.clip_id, reason = %fail.reason, "bundle fetch failed");
                    failures.push(fail);
                }
            }
        }

        if fetched.is_empty() {
            return Err(ExportError::ExportFailed { failures });
        }

        // entry order follows the authored clip order, not completion order
        fetched.sort_by_key(|(clip, _)| clip.order);

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        let mut used_names = HashSet::new();
        let mut entries = Vec::with_capacity(fetched.len());

        for (clip, bytes) in &fetched {
            let name = unique_name(&clip_filename(clip), &mut used_names);
            writer.start_file(name.clone(), options)?;
            writer.write_all(bytes)?;
            entries.push(name);
        }
        let archive = writer.finish()?.into_inner();

        info!(
            bundled = entries.len(),
            failed = failures.len(),
            "bundle export finished"
        );
        Ok(BundleOutput {
            archive,
            entries,
            failures,
        })
    }
}

fn failure(clip: &Clip, reason: impl Into<String>) -> ClipFetchFailure {
    ClipFetchFailure {
        clip_id: clip.id,
        title: clip.title.clone(),
        reason: reason.into(),
    }
}

/// Deterministic filename for a clip: 1-based order prefix plus sanitized
/// title, with the extension taken from the media ref.
fn clip_filename(clip: &Clip) -> String {
    format!(
        "{:02}_{}.{}",
        clip.order + 1,
        sanitize_title(&clip.title),
        extension_for(&clip.media_ref)
    )
}

fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "clip".to_string()
    } else {
        trimmed.to_string()
    }
}

fn extension_for(media_ref: &str) -> String {
    let path = media_ref.split(['?', '#']).next().unwrap_or(media_ref);
    path.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 4 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "mp4".to_string())
}

fn unique_name(base: &str, used: &mut HashSet<String>) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }
    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (base, None),
    };
    let mut n = 2;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{stem}_{n}.{ext}"),
            None => format!("{stem}_{n}"),
        };
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
