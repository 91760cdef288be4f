//! AdReel Export - Download and bundle coordination
//!
//! Fetches raw clip media with bounded concurrency and assembles zip
//! bundles, tolerating partial failures. Exported bytes are always the raw,
//! untrimmed, unsped-up source: preview trim/speed edits are not applied to
//! downloaded files.

pub mod bundle;
pub mod error;
pub mod fetch;

pub use bundle::{
    BundleOutput, DownloadedClip, ExportCoordinator, DEFAULT_MAX_CONCURRENT_FETCHES,
};
pub use error::{ClipFetchFailure, ExportError, ExportResult};
pub use fetch::{FetchError, HttpFetcher, MediaFetch};
